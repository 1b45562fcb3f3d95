pub mod convert;
pub mod corpus;
pub mod inspect;

use std::fs;
use std::path::Path;

use anyhow::Context;

/// Creates the directory an output file will land in.
pub(crate) fn ensure_parent(output: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    Ok(())
}
