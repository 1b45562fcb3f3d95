use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use fvecs_transcode::ConversionJob;

/// A job file: independent file pairs converted in order.
///
/// ```json
/// { "jobs": [
///     { "input": "sift/base.fvecs", "output": "data/base.bin",
///       "params": { "expected_dim": 128 } },
///     { "input": "sift/query.fvecs", "output": "data/query.bin",
///       "params": { "expected_dim": 128, "limit": 10, "quantize": {} } }
/// ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusFile {
    pub jobs: Vec<ConversionJob>,
}

pub fn load(path: &Path) -> anyhow::Result<CorpusFile> {
    let text = fs::read_to_string(path).with_context(|| format!("reading job file {}", path.display()))?;
    let corpus: CorpusFile = serde_json::from_str(&text).with_context(|| format!("parsing job file {}", path.display()))?;
    Ok(corpus)
}

pub fn run(path: &Path) -> anyhow::Result<()> {
    let corpus = load(path)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Input", "Output", "Vectors", "Size (MB)", "Encoding"]);

    for job in &corpus.jobs {
        super::ensure_parent(&job.output)?;
    }
    let summaries = fvecs_transcode::convert_corpus(&corpus.jobs)
        .with_context(|| format!("running jobs from {}", path.display()))?;

    for (job, summary) in corpus.jobs.iter().zip(&summaries) {
        let meta = &summary.metadata;
        let encoding = match &meta.fixed {
            Some(fixed) => fixed.fixed_format.clone(),
            None => "f32_le".to_string(),
        };
        table.add_row(vec![
            job.input.display().to_string(),
            job.output.display().to_string(),
            meta.vectors.to_string(),
            format!("{:.2}", meta.size_mb()),
            encoding,
        ]);
    }

    println!("{table}\n");
    Ok(())
}
