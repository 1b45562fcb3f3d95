// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Run accounting and the `.meta` sibling artifact.
//!
//! The output stream carries no header, so consumers read the `.meta` file
//! first. It is line-oriented `key=value`:
//!
//! ```text
//! vectors=2
//! dimension=128
//! bytes=1024
//! size_MB=0.00
//! fixed_scale=65536.0        (quantized only)
//! fixed_format=q16.16_int32_le
//! max_abs_fixed=65536
//! clip_abs=1.5               (only when clipping was configured)
//! ```

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{QuantizeParams, FIXED_FORMAT};
use crate::error::{Result, TranscodeError};

/// Mutable counters scoped to a single conversion.
#[derive(Debug, Clone, Default)]
pub struct RunAccumulator {
    vectors_written: u64,
    total_bytes_written: u64,
    max_abs_fixed: u32,
    hasher: blake3::Hasher,
}

impl RunAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for one record's output bytes.
    pub fn record_write(&mut self, payload: &[u8]) {
        self.vectors_written += 1;
        self.total_bytes_written += payload.len() as u64;
        self.hasher.update(payload);
    }

    pub fn observe_magnitude(&mut self, magnitude: u32) {
        self.max_abs_fixed = self.max_abs_fixed.max(magnitude);
    }

    pub fn vectors_written(&self) -> u64 {
        self.vectors_written
    }

    pub fn total_bytes_written(&self) -> u64 {
        self.total_bytes_written
    }

    pub fn max_abs_fixed(&self) -> u32 {
        self.max_abs_fixed
    }

    /// Closes the run: metadata for the `.meta` file plus the output digest.
    pub fn finish(
        self,
        dimension: u32,
        quantize: Option<&QuantizeParams>,
    ) -> (Metadata, blake3::Hash) {
        let fixed = quantize.map(|q| FixedMetadata {
            fixed_scale: q.fixed_scale,
            fixed_format: FIXED_FORMAT.to_string(),
            max_abs_fixed: self.max_abs_fixed,
            clip_abs: q.clip_abs,
        });
        let metadata = Metadata {
            vectors: self.vectors_written,
            dimension,
            bytes: self.total_bytes_written,
            fixed,
        };
        (metadata, self.hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedMetadata {
    pub fixed_scale: f64,
    pub fixed_format: String,
    pub max_abs_fixed: u32,
    pub clip_abs: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub vectors: u64,
    pub dimension: u32,
    pub bytes: u64,
    /// Present for Q16.16 outputs.
    pub fixed: Option<FixedMetadata>,
}

impl Metadata {
    /// Size in MiB, as reported by `size_MB`.
    pub fn size_mb(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }

    /// Bytes per output record.
    pub fn record_bytes(&self) -> u64 {
        u64::from(self.dimension) * 4
    }

    pub fn is_fixed_point(&self) -> bool {
        self.fixed.is_some()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "vectors={}", self.vectors);
        let _ = writeln!(out, "dimension={}", self.dimension);
        let _ = writeln!(out, "bytes={}", self.bytes);
        let _ = writeln!(out, "size_MB={:.2}", self.size_mb());
        if let Some(fixed) = &self.fixed {
            let _ = writeln!(out, "fixed_scale={:?}", fixed.fixed_scale);
            let _ = writeln!(out, "fixed_format={}", fixed.fixed_format);
            let _ = writeln!(out, "max_abs_fixed={}", fixed.max_abs_fixed);
            if let Some(c) = fixed.clip_abs {
                let _ = writeln!(out, "clip_abs={:?}", c);
            }
        }
        out
    }

    /// Parses `render` output. Unknown keys and `size_MB` are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut fields = HashMap::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                TranscodeError::InvalidMetadata(format!("line {}: expected key=value", lineno + 1))
            })?;
            fields.insert(key.trim(), value.trim());
        }

        let vectors = required(&fields, "vectors")?;
        let dimension = required(&fields, "dimension")?;
        let bytes = required(&fields, "bytes")?;

        let fixed = match fields.get("fixed_format") {
            Some(format) => Some(FixedMetadata {
                fixed_scale: required(&fields, "fixed_scale")?,
                fixed_format: format.to_string(),
                max_abs_fixed: required(&fields, "max_abs_fixed")?,
                clip_abs: optional(&fields, "clip_abs")?,
            }),
            None => None,
        };

        Ok(Self {
            vectors,
            dimension,
            bytes,
            fixed,
        })
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

/// `<output>.meta`: the output path with its extension replaced.
pub fn meta_path_for(output: impl AsRef<Path>) -> PathBuf {
    output.as_ref().with_extension("meta")
}

fn required<T: std::str::FromStr>(fields: &HashMap<&str, &str>, key: &str) -> Result<T> {
    optional(fields, key)?
        .ok_or_else(|| TranscodeError::InvalidMetadata(format!("missing key `{}`", key)))
}

fn optional<T: std::str::FromStr>(fields: &HashMap<&str, &str>, key: &str) -> Result<Option<T>> {
    match fields.get(key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| TranscodeError::InvalidMetadata(format!("bad value for `{}`: {}", key, raw))),
        None => Ok(None),
    }
}
