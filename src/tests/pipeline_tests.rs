// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::{ConversionParams, QuantizeParams};
use crate::error::TranscodeError;
use crate::fixtures::{constant_records, decode_f32, decode_i32, fvecs_bytes, push_record, ramp_records};
use crate::meta::RunAccumulator;
use crate::pipeline::Transcoder;
use crate::quant::RecordStage;

fn fixed(dim: u32) -> ConversionParams {
    ConversionParams::new(dim).with_quantization(QuantizeParams::q16_16())
}

#[test]
fn test_two_record_q16_example() {
    let mut records = constant_records(1, 128, 1.0);
    records.extend(constant_records(1, 128, -1.0));
    let input = fvecs_bytes(&records);

    let params = fixed(128);
    let mut out = Vec::new();
    let summary = Transcoder::new(&params).unwrap().run(&input[..], &mut out).unwrap();

    let values = decode_i32(&out);
    assert_eq!(values.len(), 256);
    assert!(values[..128].iter().all(|&v| v == 65536));
    assert!(values[128..].iter().all(|&v| v == -65536));

    let meta = &summary.metadata;
    assert_eq!(meta.vectors, 2);
    assert_eq!(meta.bytes, 1024);
    assert_eq!(meta.fixed.as_ref().unwrap().max_abs_fixed, 65536);
    assert!(!summary.stopped_by_limit);
}

#[test]
fn test_pass_through_is_identity() {
    let records = ramp_records(5, 8);
    let input = fvecs_bytes(&records);

    let params = ConversionParams::new(8);
    let mut out = Vec::new();
    let summary = Transcoder::new(&params).unwrap().run(&input[..], &mut out).unwrap();

    let expected: Vec<u32> = records.iter().flatten().map(|v| v.to_bits()).collect();
    let actual: Vec<u32> = decode_f32(&out).iter().map(|v| v.to_bits()).collect();
    assert_eq!(actual, expected);
    assert!(summary.metadata.fixed.is_none());
}

#[test]
fn test_byte_count_identity() {
    for dim in [1u32, 3, 128] {
        let input = fvecs_bytes(&ramp_records(7, dim as usize));
        for params in [ConversionParams::new(dim), fixed(dim)] {
            let mut out = Vec::new();
            let summary = Transcoder::new(&params).unwrap().run(&input[..], &mut out).unwrap();
            let meta = summary.metadata;
            assert_eq!(meta.vectors * u64::from(dim) * 4, meta.bytes);
            assert_eq!(meta.bytes, out.len() as u64);
        }
    }
}

#[test]
fn test_limit_is_soft_stop() {
    let input = fvecs_bytes(&ramp_records(10, 4));

    let params = ConversionParams::new(4).with_limit(3);
    let mut out = Vec::new();
    let summary = Transcoder::new(&params).unwrap().run(&input[..], &mut out).unwrap();
    assert_eq!(summary.metadata.vectors, 3);
    assert_eq!(out.len(), 3 * 16);
    assert!(summary.stopped_by_limit);

    // Exactly `limit` records: the limit is hit before end-of-stream is seen.
    let exact = fvecs_bytes(&ramp_records(2, 4));
    let params = ConversionParams::new(4).with_limit(2);
    let summary = Transcoder::new(&params).unwrap().run(&exact[..], Vec::new()).unwrap();
    assert_eq!(summary.metadata.vectors, 2);
    assert!(summary.stopped_by_limit);

    // Garbage past the limit is never read.
    let mut dirty = fvecs_bytes(&ramp_records(2, 4));
    dirty.extend_from_slice(&[0xFF, 0xFF]);
    let params = ConversionParams::new(4).with_limit(2);
    let summary = Transcoder::new(&params).unwrap().run(&dirty[..], Vec::new()).unwrap();
    assert_eq!(summary.metadata.vectors, 2);

    // Limit above the record count reads to the end.
    let params = ConversionParams::new(4).with_limit(50);
    let summary = Transcoder::new(&params).unwrap().run(&input[..], Vec::new()).unwrap();
    assert_eq!(summary.metadata.vectors, 10);
    assert!(!summary.stopped_by_limit);
}

#[test]
fn test_zero_limit_writes_nothing() {
    let input = fvecs_bytes(&ramp_records(3, 4));
    let params = fixed(4).with_limit(0);
    let mut out = Vec::new();
    let summary = Transcoder::new(&params).unwrap().run(&input[..], &mut out).unwrap();
    assert!(out.is_empty());
    assert_eq!(summary.metadata.vectors, 0);
    assert_eq!(summary.metadata.fixed.unwrap().max_abs_fixed, 0);
}

#[test]
fn test_truncated_payload_writes_nothing_for_that_record() {
    let mut input = fvecs_bytes(&ramp_records(2, 4));
    push_record(&mut input, 4, &[1.0, 2.0]);

    let params = ConversionParams::new(4);
    let mut out = Vec::new();
    let err = Transcoder::new(&params).unwrap().run(&input[..], &mut out).unwrap_err();

    match err {
        TranscodeError::CorruptPayload { index, expected, found } => {
            assert_eq!(index, 2);
            assert_eq!(expected, 16);
            assert_eq!(found, 8);
        }
        other => panic!("expected CorruptPayload, got {:?}", other),
    }
    assert_eq!(out.len(), 2 * 16);
}

#[test]
fn test_truncated_header_fails() {
    let mut input = fvecs_bytes(&ramp_records(1, 2));
    input.extend_from_slice(&[2, 0, 0]);

    let params = ConversionParams::new(2);
    let err = Transcoder::new(&params).unwrap().run(&input[..], Vec::new()).unwrap_err();
    assert!(matches!(err, TranscodeError::CorruptHeader { index: 1, available: 3 }));
}

#[test]
fn test_dimension_mismatch_stops_run() {
    let mut input = Vec::new();
    push_record(&mut input, 4, &[1.0; 4]);
    push_record(&mut input, 3, &[2.0; 3]);
    push_record(&mut input, 4, &[3.0; 4]);

    let params = fixed(4);
    let mut out = Vec::new();
    let err = Transcoder::new(&params).unwrap().run(&input[..], &mut out).unwrap_err();

    match err {
        TranscodeError::DimensionMismatch { index, found, expected } => {
            assert_eq!(index, 1);
            assert_eq!(found, 3);
            assert_eq!(expected, 4);
        }
        other => panic!("expected DimensionMismatch, got {:?}", other),
    }
    assert_eq!(decode_i32(&out), vec![65536; 4]);
}

#[test]
fn test_dimension_checked_before_payload() {
    // A huge declared dim with no payload behind it is a mismatch, not a short read.
    let mut input = Vec::new();
    push_record(&mut input, i32::MAX, &[]);

    let params = ConversionParams::new(128);
    let err = Transcoder::new(&params).unwrap().run(&input[..], Vec::new()).unwrap_err();
    assert!(matches!(err, TranscodeError::DimensionMismatch { index: 0, .. }));
}

#[test]
fn test_clipping_bounds_output() {
    let input = fvecs_bytes(&[vec![10.0, -10.0, 0.25, -0.5]]);
    let params = ConversionParams::new(4).with_quantization(QuantizeParams::q16_16().with_clip(0.5));

    let mut out = Vec::new();
    let summary = Transcoder::new(&params).unwrap().run(&input[..], &mut out).unwrap();

    assert_eq!(decode_i32(&out), vec![32768, -32768, 16384, -32768]);
    let fixed = summary.metadata.fixed.unwrap();
    assert_eq!(fixed.max_abs_fixed, 32768);
    assert_eq!(fixed.clip_abs, Some(0.5));
}

#[test]
fn test_invalid_params_rejected() {
    let bad = [
        ConversionParams::new(0),
        ConversionParams::new(u32::MAX),
        ConversionParams::new(4).with_quantization(QuantizeParams::q16_16().with_clip(-1.0)),
        ConversionParams::new(4).with_quantization(QuantizeParams::q16_16().with_clip(f32::NAN)),
        ConversionParams::new(4).with_quantization(QuantizeParams::q16_16().with_scale(0.0)),
        ConversionParams::new(4).with_quantization(QuantizeParams::q16_16().with_scale(f64::INFINITY)),
    ];
    for params in &bad {
        assert!(matches!(
            Transcoder::new(params),
            Err(TranscodeError::InvalidParameter(_))
        ));
    }
}

/// Replaces every byte with its bitwise complement.
struct Invert;

impl RecordStage for Invert {
    fn apply(&self, payload: &mut [u8], _acc: &mut RunAccumulator) {
        payload.iter_mut().for_each(|b| *b = !*b);
    }
}

#[test]
fn test_injected_stage() {
    let input = fvecs_bytes(&[vec![0.0, 0.0]]);
    let params = ConversionParams::new(2);

    let mut out = Vec::new();
    let summary = Transcoder::with_stage(&params, Box::new(Invert))
        .unwrap()
        .run(&input[..], &mut out)
        .unwrap();

    assert_eq!(out, vec![0xFF; 8]);
    assert!(summary.metadata.fixed.is_none());
}

#[test]
fn test_progress_interval_does_not_affect_output() {
    let input = fvecs_bytes(&ramp_records(5, 2));
    let mut a = Vec::new();
    let mut b = Vec::new();
    Transcoder::new(&ConversionParams::new(2).with_progress_interval(1))
        .unwrap()
        .run(&input[..], &mut a)
        .unwrap();
    Transcoder::new(&ConversionParams::new(2).with_progress_interval(0))
        .unwrap()
        .run(&input[..], &mut b)
        .unwrap();
    assert_eq!(a, b);
}
