// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-record transform stages.
//!
//! The pipeline is the same for both output flavours; the stage decides what
//! a validated float32 payload turns into before it is written.

use byteorder::{ByteOrder, LittleEndian};

use crate::config::{ConversionParams, QuantizeParams};
use crate::fxp::ops::quantize_component;
use crate::meta::RunAccumulator;

pub trait RecordStage {
    /// Rewrites one validated payload in place. Output length equals input length.
    fn apply(&self, payload: &mut [u8], acc: &mut RunAccumulator);

    /// Fixed-point settings, if this stage produces Q16.16 output.
    fn quantization(&self) -> Option<&QuantizeParams> {
        None
    }
}

/// Identity stage: float32 payloads are written unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl RecordStage for PassThrough {
    fn apply(&self, _payload: &mut [u8], _acc: &mut RunAccumulator) {}
}

/// float32 → Q16.16 `i32`, little-endian, in place.
#[derive(Clone, Copy, Debug)]
pub struct FixedPointQuantizer {
    params: QuantizeParams,
}

impl FixedPointQuantizer {
    pub fn new(params: QuantizeParams) -> Self {
        Self { params }
    }
}

impl RecordStage for FixedPointQuantizer {
    fn apply(&self, payload: &mut [u8], acc: &mut RunAccumulator) {
        let mut record_max = 0u32;
        for chunk in payload.chunks_exact_mut(4) {
            let x = LittleEndian::read_f32(chunk);
            let q = quantize_component(x, &self.params);
            LittleEndian::write_i32(chunk, q.0);
            record_max = record_max.max(q.magnitude());
        }
        acc.observe_magnitude(record_max);
    }

    fn quantization(&self) -> Option<&QuantizeParams> {
        Some(&self.params)
    }
}

/// Picks the stage a parameter set asks for.
pub fn stage_for(params: &ConversionParams) -> Box<dyn RecordStage> {
    match params.quantize {
        Some(q) => Box::new(FixedPointQuantizer::new(q)),
        None => Box::new(PassThrough),
    }
}
