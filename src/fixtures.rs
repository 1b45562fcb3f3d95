// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! `.fvecs` builders for tests and demos.

use std::fs;
use std::io;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

/// Encodes records as `[dim i32][dim × f32]`, each with its own length as dim.
pub fn fvecs_bytes(records: &[Vec<f32>]) -> Vec<u8> {
    let mut wtr = Vec::new();
    for record in records {
        push_record(&mut wtr, record.len() as i32, record);
    }
    wtr
}

/// Appends one record with an explicit declared dimension.
pub fn push_record(wtr: &mut Vec<u8>, dim: i32, values: &[f32]) {
    // Writes into a Vec cannot fail.
    wtr.write_i32::<LittleEndian>(dim).unwrap();
    for v in values {
        wtr.write_f32::<LittleEndian>(*v).unwrap();
    }
}

/// `count` records of `dim` components, all equal to `value`.
pub fn constant_records(count: usize, dim: usize, value: f32) -> Vec<Vec<f32>> {
    vec![vec![value; dim]; count]
}

/// `count` records whose components vary with record and position.
pub fn ramp_records(count: usize, dim: usize) -> Vec<Vec<f32>> {
    (0..count)
        .map(|r| {
            (0..dim)
                .map(|c| (r as f32) * 0.5 - (c as f32) * 0.25)
                .collect()
        })
        .collect()
}

pub fn write_fvecs(path: impl AsRef<Path>, records: &[Vec<f32>]) -> io::Result<()> {
    fs::write(path, fvecs_bytes(records))
}

/// Decodes a flat little-endian f32 stream.
pub fn decode_f32(bytes: &[u8]) -> Vec<f32> {
    let mut out = vec![0f32; bytes.len() / 4];
    LittleEndian::read_f32_into(&bytes[..out.len() * 4], &mut out);
    out
}

/// Decodes a flat little-endian i32 stream.
pub fn decode_i32(bytes: &[u8]) -> Vec<i32> {
    let mut out = vec![0i32; bytes.len() / 4];
    LittleEndian::read_i32_into(&bytes[..out.len() * 4], &mut out);
    out
}
