// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscodeError {
    /// The stream ended 1..=3 bytes into a dimension prefix.
    #[error("Corrupt file: incomplete dim at vector {index} ({available} of 4 bytes)")]
    CorruptHeader { index: u64, available: usize },

    /// The stream ended inside a record payload.
    #[error("Corrupt file: incomplete data for vector {index}: expected {expected} bytes, found {found}")]
    CorruptPayload {
        index: u64,
        expected: usize,
        found: usize,
    },

    #[error("Vector {index} has dim={found}, expected {expected}")]
    DimensionMismatch { index: u64, found: i32, expected: u32 },

    #[error("Vector {index} declares a negative dimension ({dim})")]
    NegativeDimension { index: u64, dim: i32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Layout mismatch: metadata declares {expected} bytes, file holds {found}")]
    LayoutMismatch { expected: u64, found: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl TranscodeError {
    /// Index of the offending record, for the decode-time variants.
    pub fn record_index(&self) -> Option<u64> {
        match self {
            TranscodeError::CorruptHeader { index, .. }
            | TranscodeError::CorruptPayload { index, .. }
            | TranscodeError::DimensionMismatch { index, .. }
            | TranscodeError::NegativeDimension { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Missing byte count for a truncated payload.
    pub fn shortfall(&self) -> Option<usize> {
        match self {
            TranscodeError::CorruptPayload { expected, found, .. } => Some(expected - found),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TranscodeError>;
