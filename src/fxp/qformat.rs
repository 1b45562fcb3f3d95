// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Q16.16 layout constants.

/// Number of fractional bits for Fixed-Point representation (Q16.16).
pub const FRAC_BITS: u32 = 16;

/// Scaling factor for Fixed-Point representation (1 << FRAC_BITS).
pub const SCALE: i32 = 1 << FRAC_BITS;

/// `SCALE` as the float the quantizer multiplies by.
pub const SCALE_F64: f64 = SCALE as f64;
