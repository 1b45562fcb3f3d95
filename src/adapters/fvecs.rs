// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Streaming `.fvecs` record reader.
//!
//! Format: `[dim: i32 LE][dim × f32 LE]` repeated, no file header, no footer.
//! The record count is implicit; the stream must end exactly on a record
//! boundary.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, TranscodeError};
use crate::types::RawRecord;

pub struct FvecsReader<R> {
    reader: R,
    index: u64,
    failed: bool,
}

impl FvecsReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let f = File::open(path)?;
        Ok(Self::new(BufReader::new(f)))
    }
}

impl<R: Read> FvecsReader<R> {
    /// `reader` must be positioned at a record boundary.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            index: 0,
            failed: false,
        }
    }

    /// Index of the next record to be decoded.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Reads the 4-byte dimension prefix of the next record.
    ///
    /// `Ok(None)` is a clean end of stream: zero bytes were left.
    pub fn read_dim(&mut self) -> Result<Option<i32>> {
        let mut buf = [0u8; 4];
        match read_full(&mut self.reader, &mut buf)? {
            0 => Ok(None),
            4 => Ok(Some(LittleEndian::read_i32(&buf))),
            available => Err(TranscodeError::CorruptHeader {
                index: self.index,
                available,
            }),
        }
    }

    /// Reads the `dim * 4` payload bytes following a prefix into `buf`.
    ///
    /// `buf` is cleared first. Its capacity is reused across records, and it
    /// only grows as bytes actually arrive, so a bogus `dim` in a truncated
    /// file does not allocate up front.
    pub fn read_payload(&mut self, dim: i32, buf: &mut Vec<u8>) -> Result<()> {
        if dim < 0 {
            return Err(TranscodeError::NegativeDimension {
                index: self.index,
                dim,
            });
        }
        let expected = dim as usize * 4;
        buf.clear();
        let found = (&mut self.reader).take(expected as u64).read_to_end(buf)?;
        if found != expected {
            return Err(TranscodeError::CorruptPayload {
                index: self.index,
                expected,
                found,
            });
        }
        self.index += 1;
        Ok(())
    }

    /// Decodes one whole record without any dimension policy.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>> {
        let index = self.index;
        let dim = match self.read_dim()? {
            Some(d) => d,
            None => return Ok(None),
        };
        let mut payload = Vec::new();
        self.read_payload(dim, &mut payload)?;
        Ok(Some(RawRecord {
            index,
            dim,
            payload,
        }))
    }
}

impl<R: Read> Iterator for FvecsReader<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Fills `buf` until it is full or the stream reports EOF.
/// Returns the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
