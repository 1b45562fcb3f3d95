// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use byteorder::{ByteOrder, LittleEndian};

pub mod scalar;

/// One decoded `.fvecs` record, payload still in wire form.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Position in the input stream, starting at 0.
    pub index: u64,
    /// Dimension as declared inline by the record.
    pub dim: i32,
    /// `dim * 4` little-endian float32 bytes.
    pub payload: Vec<u8>,
}

impl RawRecord {
    /// Interprets the payload as float32 components.
    pub fn components(&self) -> Vec<f32> {
        let mut out = vec![0f32; self.payload.len() / 4];
        LittleEndian::read_f32_into(&self.payload[..out.len() * 4], &mut out);
        out
    }
}
