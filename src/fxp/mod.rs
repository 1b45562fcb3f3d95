// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fixed-point format and conversions.

pub mod qformat;
pub mod ops;
