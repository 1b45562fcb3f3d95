// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Memory-mapped, offset-indexed view over a transcoded output.
//!
//! Record `i` lives at `i * dimension * 4`. The file has no header; layout
//! comes from the `.meta` sibling. Fixed-point records are exposed as raw
//! Q16.16 integers only.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{Result, TranscodeError};
use crate::meta::{meta_path_for, Metadata};

pub struct FlatFile {
    mmap: Mmap,
    metadata: Metadata,
}

impl FlatFile {
    /// Opens `bin` with the metadata found at `<bin>.meta`.
    pub fn open(bin: impl AsRef<Path>) -> Result<Self> {
        let meta = meta_path_for(bin.as_ref());
        Self::open_with_meta(bin, meta)
    }

    pub fn open_with_meta(bin: impl AsRef<Path>, meta: impl AsRef<Path>) -> Result<Self> {
        let metadata = Metadata::read_from(meta)?;
        let file = File::open(bin)?;
        // SAFETY: the mapping is read-only; outputs are never edited in place.
        let mmap = unsafe { Mmap::map(&file)? };

        let expected = metadata
            .vectors
            .checked_mul(metadata.record_bytes())
            .ok_or_else(|| {
                TranscodeError::InvalidMetadata(format!(
                    "vectors={} * dimension={} * 4 overflows",
                    metadata.vectors, metadata.dimension
                ))
            })?;
        if metadata.bytes != expected {
            return Err(TranscodeError::InvalidMetadata(format!(
                "bytes={} but vectors * dimension * 4 = {}",
                metadata.bytes, expected
            )));
        }
        if mmap.len() as u64 != metadata.bytes {
            return Err(TranscodeError::LayoutMismatch {
                expected: metadata.bytes,
                found: mmap.len() as u64,
            });
        }

        Ok(Self { mmap, metadata })
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.metadata.vectors as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_fixed_point(&self) -> bool {
        self.metadata.is_fixed_point()
    }

    /// Raw bytes of record `i`.
    pub fn record_bytes(&self, i: usize) -> Option<&[u8]> {
        if i >= self.len() {
            return None;
        }
        let stride = self.metadata.record_bytes() as usize;
        let start = i * stride;
        self.mmap.get(start..start + stride)
    }

    /// Record `i` of a pass-through output.
    pub fn record_f32(&self, i: usize) -> Option<&[f32]> {
        if self.is_fixed_point() {
            return None;
        }
        bytemuck::try_cast_slice(self.record_bytes(i)?).ok()
    }

    /// Record `i` of a fixed-point output, as raw Q16.16 integers.
    pub fn record_i32(&self, i: usize) -> Option<&[i32]> {
        if !self.is_fixed_point() {
            return None;
        }
        bytemuck::try_cast_slice(self.record_bytes(i)?).ok()
    }
}
