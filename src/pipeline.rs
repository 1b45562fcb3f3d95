// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Conversion driver.
//!
//! One run: `START → READING → VALIDATING → DECODING → [QUANTIZING] → WRITING`
//! per record, then `FINALIZING → DONE`. READING covers the dimension prefix,
//! DECODING the payload. Any decode or validation error moves
//! the run to `FAILED`. Bytes already written are not rolled back, and no
//! `.meta` is produced for a failed run; removing the partial output is up to
//! the caller.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::adapters::fvecs::FvecsReader;
use crate::config::ConversionParams;
use crate::error::Result;
use crate::meta::{meta_path_for, Metadata, RunAccumulator};
use crate::quant::{stage_for, RecordStage};
use crate::validate::RecordValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Reading,
    Decoding,
    Validating,
    Quantizing,
    Writing,
    Finalizing,
    Done,
    Failed,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub metadata: Metadata,
    /// BLAKE3 of every byte written to the output stream.
    pub digest: blake3::Hash,
    /// True if the run stopped because `vectors_written` reached `limit`.
    /// An input holding exactly `limit` records also reports true.
    pub stopped_by_limit: bool,
}

pub struct Transcoder<'a> {
    params: &'a ConversionParams,
    stage: Box<dyn RecordStage>,
}

impl<'a> Transcoder<'a> {
    /// Validates `params` and selects the stage they describe.
    pub fn new(params: &'a ConversionParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            stage: stage_for(params),
        })
    }

    /// Uses a caller-provided stage instead of the one `params` describes.
    pub fn with_stage(params: &'a ConversionParams, stage: Box<dyn RecordStage>) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, stage })
    }

    /// Streams every record of `input` into `output`.
    ///
    /// `output` is not flushed; wrap it in a `BufWriter` and flush after.
    pub fn run<R: Read, W: Write>(&self, input: R, mut output: W) -> Result<RunSummary> {
        let mut reader = FvecsReader::new(input);
        let mut acc = RunAccumulator::new();
        let mut state = RunState::Start;

        match self.pump(&mut reader, &mut output, &mut acc, &mut state) {
            Ok(stopped_by_limit) => {
                enter(&mut state, RunState::Finalizing);
                let (metadata, digest) =
                    acc.finish(self.params.expected_dim, self.stage.quantization());
                enter(&mut state, RunState::Done);
                Ok(RunSummary {
                    metadata,
                    digest,
                    stopped_by_limit,
                })
            }
            Err(e) => {
                warn!(
                    last_state = ?state,
                    vectors_written = acc.vectors_written(),
                    bytes_written = acc.total_bytes_written(),
                    "conversion failed: {}",
                    e
                );
                enter(&mut state, RunState::Failed);
                Err(e)
            }
        }
    }

    /// Record loop. Returns whether the run was cut short by `limit`.
    fn pump<R: Read, W: Write>(
        &self,
        reader: &mut FvecsReader<R>,
        output: &mut W,
        acc: &mut RunAccumulator,
        state: &mut RunState,
    ) -> Result<bool> {
        let validator = RecordValidator::new(self.params.expected_dim);
        let quantizing = self.stage.quantization().is_some();
        let mut payload = Vec::with_capacity(validator.payload_len());

        loop {
            if let Some(limit) = self.params.limit {
                if acc.vectors_written() >= limit {
                    info!(limit, "reached limit, stopping early");
                    return Ok(true);
                }
            }

            enter(state, RunState::Reading);
            let index = reader.index();
            let dim = match reader.read_dim()? {
                Some(dim) => dim,
                None => {
                    debug!(records = index, "clean end of stream");
                    return Ok(false);
                }
            };

            // The dimension is checked before the payload is read, so a
            // mismatching record never costs a `dim * 4` read.
            enter(state, RunState::Validating);
            validator.check(index, dim)?;

            enter(state, RunState::Decoding);
            reader.read_payload(dim, &mut payload)?;

            if quantizing {
                enter(state, RunState::Quantizing);
            }
            self.stage.apply(&mut payload, acc);

            enter(state, RunState::Writing);
            output.write_all(&payload)?;
            acc.record_write(&payload);

            let written = acc.vectors_written();
            if self.params.progress_interval > 0 && written % self.params.progress_interval == 0 {
                info!(vectors = written, "converted {} vectors", written);
            }
        }
    }
}

fn enter(state: &mut RunState, next: RunState) {
    trace!(from = ?*state, to = ?next, "state transition");
    *state = next;
}

/// Converts one `.fvecs` file and writes `<output>.meta` next to the output.
///
/// The input is opened before the output is created, so a missing input
/// leaves nothing behind. Parent directories of `output` must exist.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    params: &ConversionParams,
) -> Result<RunSummary> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let transcoder = Transcoder::new(params)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        expected_dim = params.expected_dim,
        fixed_point = params.quantize.is_some(),
        "converting"
    );

    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);

    let summary = match transcoder.run(reader, &mut writer) {
        Ok(summary) => summary,
        Err(e) => {
            warn!(output = %output.display(), "partial output left on disk");
            return Err(e);
        }
    };
    writer.flush()?;
    drop(writer);

    let meta_path = meta_path_for(output);
    summary.metadata.write_to(&meta_path)?;

    info!(
        vectors = summary.metadata.vectors,
        bytes = summary.metadata.bytes,
        size_mb = %format!("{:.2}", summary.metadata.size_mb()),
        meta = %meta_path.display(),
        "done"
    );
    Ok(summary)
}

/// One input → output pair with its own parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub params: ConversionParams,
}

/// Runs independent jobs one after the other (e.g. base then query).
/// Stops at the first failure; earlier outputs are kept.
pub fn convert_corpus(jobs: &[ConversionJob]) -> Result<Vec<RunSummary>> {
    let mut summaries = Vec::with_capacity(jobs.len());
    for job in jobs {
        summaries.push(convert_file(&job.input, &job.output, &job.params)?);
    }
    Ok(summaries)
}
