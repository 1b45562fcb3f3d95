// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! fvecs-transcode: streaming `.fvecs` → flat binary transcoder with optional
//! Q16.16 fixed-point re-quantization.
//!
//! Every record is pulled through one pipeline:
//! reader → validator → [quantizer] → writer → run accumulator, and a `.meta`
//! sibling describing the run is emitted once the stream is exhausted.

pub mod config;
pub mod error;
pub mod fxp;
pub mod types;
pub mod adapters;
pub mod validate;
pub mod quant;
pub mod meta;
pub mod pipeline;
pub mod flat;
pub mod fixtures;

pub use config::{ConversionParams, OverflowPolicy, QuantizeParams};
pub use error::{Result, TranscodeError};
pub use meta::{Metadata, RunAccumulator};
pub use pipeline::{convert_corpus, convert_file, ConversionJob, RunSummary, Transcoder};

#[cfg(test)]
pub mod tests;
