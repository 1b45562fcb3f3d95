// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Readers for on-disk vector dataset formats.

pub mod fvecs;
