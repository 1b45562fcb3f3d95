// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Dimensional consistency across a stream.

use crate::error::{Result, TranscodeError};

/// Enforces one fixed dimension for every record of a run.
#[derive(Clone, Copy, Debug)]
pub struct RecordValidator {
    expected_dim: u32,
}

impl RecordValidator {
    pub fn new(expected_dim: u32) -> Self {
        Self { expected_dim }
    }

    /// Payload length every accepted record carries.
    pub fn payload_len(&self) -> usize {
        self.expected_dim as usize * 4
    }

    /// Checks the declared `dim` of record `index`.
    pub fn check(&self, index: u64, dim: i32) -> Result<()> {
        if i64::from(dim) != i64::from(self.expected_dim) {
            return Err(TranscodeError::DimensionMismatch {
                index,
                found: dim,
                expected: self.expected_dim,
            });
        }
        Ok(())
    }
}
