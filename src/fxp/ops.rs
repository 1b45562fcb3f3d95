//! Float → fixed-point conversion.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::{OverflowPolicy, QuantizeParams};
use crate::types::scalar::FxpScalar;

/// Converts one float32 component under `params`.
///
/// The component is clipped (if configured), widened to `f64`, scaled and
/// rounded half-to-even. The product of an `f32` and a power-of-two scale is
/// exact in `f64`, so rounding sees the true value.
///
/// NaN becomes 0 under both overflow policies.
pub fn quantize_component(x: f32, params: &QuantizeParams) -> FxpScalar {
    let clipped = match params.clip_abs {
        Some(c) => x.clamp(-c, c),
        None => x,
    };
    let rounded = (clipped as f64 * params.fixed_scale).round_ties_even();
    FxpScalar(narrow(rounded, params.overflow))
}

/// Narrows an already-rounded value to `i32`.
pub fn narrow(rounded: f64, policy: OverflowPolicy) -> i32 {
    match policy {
        // `as` saturates float → int casts.
        OverflowPolicy::Saturate => rounded as i32,
        // Truncating i64 → i32 keeps the low 32 bits. Values beyond the i64
        // range (infinities) saturate first.
        OverflowPolicy::Wrap => (rounded as i64) as i32,
    }
}

