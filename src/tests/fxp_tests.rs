// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::{OverflowPolicy, QuantizeParams};
use crate::fxp::ops::{narrow, quantize_component};
use crate::fxp::qformat::SCALE;
use crate::types::scalar::FxpScalar;

fn q(x: f32) -> i32 {
    quantize_component(x, &QuantizeParams::q16_16()).0
}

#[test]
fn test_fxp_conversions() {
    assert_eq!(q(1.0), SCALE);
    assert_eq!(q(-1.0), -SCALE);
    assert_eq!(q(-2.5), -2 * SCALE - SCALE / 2);
    assert_eq!(q(0.0), 0);
    // 0.3f32 * 65536 = 19660.80078125
    assert_eq!(q(0.3), 19661);
}

#[test]
fn test_ties_round_to_even() {
    let ulp = 1.0 / SCALE as f32;
    assert_eq!(q(0.5 * ulp), 0);
    assert_eq!(q(1.5 * ulp), 2);
    assert_eq!(q(2.5 * ulp), 2);
    assert_eq!(q(3.5 * ulp), 4);
    assert_eq!(q(-0.5 * ulp), 0);
    assert_eq!(q(-1.5 * ulp), -2);
    assert_eq!(q(-2.5 * ulp), -2);
}

#[test]
fn test_clip_bounds_components() {
    let params = QuantizeParams::q16_16().with_clip(1.0);
    assert_eq!(quantize_component(3.0, &params).0, SCALE);
    assert_eq!(quantize_component(-7.0, &params).0, -SCALE);
    assert_eq!(quantize_component(0.5, &params).0, SCALE / 2);
    assert_eq!(quantize_component(f32::INFINITY, &params).0, SCALE);

    let zero = QuantizeParams::q16_16().with_clip(0.0);
    assert_eq!(quantize_component(123.0, &zero).0, 0);
}

#[test]
fn test_custom_scale() {
    let params = QuantizeParams::q16_16().with_scale(256.0);
    assert_eq!(quantize_component(1.5, &params).0, 384);
}

#[test]
fn test_overflow_wraps_by_default() {
    // 32768 * 2^16 = 2^31
    assert_eq!(q(32768.0), i32::MIN);
    // 40000 * 2^16 = 2_621_440_000 = 2^32 - 1_673_527_296
    assert_eq!(q(40000.0), -1_673_527_296);
    assert_eq!(q(-40000.0), 1_673_527_296);
}

#[test]
fn test_overflow_saturates_on_request() {
    let params = QuantizeParams::q16_16().with_overflow(OverflowPolicy::Saturate);
    assert_eq!(quantize_component(32768.0, &params).0, i32::MAX);
    assert_eq!(quantize_component(-40000.0, &params).0, i32::MIN);
    assert_eq!(quantize_component(f32::INFINITY, &params).0, i32::MAX);
    assert_eq!(quantize_component(f32::NEG_INFINITY, &params).0, i32::MIN);
}

#[test]
fn test_non_finite_inputs() {
    assert_eq!(q(f32::NAN), 0);
    assert_eq!(narrow(f64::NAN, OverflowPolicy::Saturate), 0);
    // Infinity saturates to i64::MAX first; its low 32 bits are all ones.
    assert_eq!(q(f32::INFINITY), -1);
    assert_eq!(q(f32::NEG_INFINITY), 0);
}

#[test]
fn test_scalar_magnitude() {
    assert_eq!(FxpScalar(-SCALE).magnitude(), SCALE as u32);
    assert_eq!(FxpScalar(i32::MIN).magnitude(), 2_147_483_648);
    assert_eq!(FxpScalar::ONE.to_le_bytes(), [0, 0, 1, 0]);
}
