// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants and per-run conversion parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscodeError};
use crate::fxp::qformat::SCALE_F64;

/// Records between two progress log events.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Literal written as `fixed_format` in the `.meta` artifact.
pub const FIXED_FORMAT: &str = "q16.16_int32_le";

/// What happens when a scaled component does not fit in an `i32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the low 32 bits of the rounded integer (two's complement wrap).
    #[default]
    Wrap,
    /// Clamp to `i32::MIN..=i32::MAX`.
    Saturate,
}

/// Settings of the fixed-point stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuantizeParams {
    #[serde(default = "default_fixed_scale")]
    pub fixed_scale: f64,
    #[serde(default)]
    pub clip_abs: Option<f32>,
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

fn default_fixed_scale() -> f64 {
    SCALE_F64
}

fn default_progress_interval() -> u64 {
    DEFAULT_PROGRESS_INTERVAL
}

impl Default for QuantizeParams {
    fn default() -> Self {
        Self::q16_16()
    }
}

impl QuantizeParams {
    /// Plain Q16.16: scale 2^16, no clipping, wrapping overflow.
    pub fn q16_16() -> Self {
        Self {
            fixed_scale: SCALE_F64,
            clip_abs: None,
            overflow: OverflowPolicy::Wrap,
        }
    }

    pub fn with_scale(mut self, fixed_scale: f64) -> Self {
        self.fixed_scale = fixed_scale;
        self
    }

    pub fn with_clip(mut self, clip_abs: f32) -> Self {
        self.clip_abs = Some(clip_abs);
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fixed_scale.is_finite() || self.fixed_scale <= 0.0 {
            return Err(TranscodeError::InvalidParameter(format!(
                "fixed_scale must be finite and positive, got {}",
                self.fixed_scale
            )));
        }
        if let Some(c) = self.clip_abs {
            if !c.is_finite() || c < 0.0 {
                return Err(TranscodeError::InvalidParameter(format!(
                    "clip_abs must be finite and non-negative, got {}",
                    c
                )));
            }
        }
        Ok(())
    }
}

/// Immutable configuration for one input → output run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversionParams {
    pub expected_dim: u32,
    #[serde(default)]
    pub limit: Option<u64>,
    /// `None` selects the pass-through variant.
    #[serde(default)]
    pub quantize: Option<QuantizeParams>,
    /// `0` disables progress events.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

impl ConversionParams {
    pub fn new(expected_dim: u32) -> Self {
        Self {
            expected_dim,
            limit: None,
            quantize: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_quantization(mut self, quantize: QuantizeParams) -> Self {
        self.quantize = Some(quantize);
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Bytes per output record.
    pub fn record_bytes(&self) -> usize {
        self.expected_dim as usize * 4
    }

    pub fn validate(&self) -> Result<()> {
        if self.expected_dim == 0 || self.expected_dim > i32::MAX as u32 {
            return Err(TranscodeError::InvalidParameter(format!(
                "expected_dim must be in 1..={}, got {}",
                i32::MAX,
                self.expected_dim
            )));
        }
        if let Some(q) = &self.quantize {
            q.validate()?;
        }
        Ok(())
    }
}
