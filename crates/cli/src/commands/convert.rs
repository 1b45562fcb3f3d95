use anyhow::Context;
use std::path::Path;

use fvecs_transcode::meta::meta_path_for;
use fvecs_transcode::{convert_file, ConversionParams, RunSummary};

pub fn run(input: &Path, output: &Path, params: &ConversionParams) -> anyhow::Result<RunSummary> {
    super::ensure_parent(output)?;

    let summary = convert_file(input, output, params).with_context(|| {
        format!("converting {} -> {}", input.display(), output.display())
    })?;

    let meta = &summary.metadata;
    println!("✅ Done: {} vectors written to {}", meta.vectors, output.display());
    println!("   Meta info: {}", meta_path_for(output).display());
    println!("   Total size: {:.2} MB", meta.size_mb());
    if let Some(fixed) = &meta.fixed {
        println!("   Format: {} (max |fixed| = {})", fixed.fixed_format, fixed.max_abs_fixed);
    }
    println!("   BLAKE3: {}", summary.digest.to_hex());

    Ok(summary)
}
