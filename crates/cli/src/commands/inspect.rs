use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::{Path, PathBuf};

use fvecs_transcode::flat::FlatFile;
use fvecs_transcode::meta::meta_path_for;

/// Components shown when printing a single record.
const PREVIEW_LEN: usize = 8;

pub fn run(bin: &Path, meta: Option<PathBuf>, record: Option<usize>) -> anyhow::Result<()> {
    let meta_path = meta.unwrap_or_else(|| meta_path_for(bin));
    let flat = FlatFile::open_with_meta(bin, &meta_path)
        .with_context(|| format!("opening {} with {}", bin.display(), meta_path.display()))?;
    let m = flat.metadata();

    println!("\nFlat File Report");
    println!("----------------");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);

    table.add_row(vec!["File".to_string(), bin.display().to_string()]);
    table.add_row(vec!["Meta".to_string(), meta_path.display().to_string()]);
    table.add_row(vec!["Vectors".to_string(), m.vectors.to_string()]);
    table.add_row(vec!["Dimension".to_string(), m.dimension.to_string()]);
    table.add_row(vec!["Bytes".to_string(), m.bytes.to_string()]);
    table.add_row(vec!["Size (MB)".to_string(), format!("{:.2}", m.size_mb())]);
    match &m.fixed {
        Some(fixed) => {
            table.add_row(vec!["Encoding".to_string(), fixed.fixed_format.clone()]);
            table.add_row(vec!["Scale".to_string(), format!("{:?}", fixed.fixed_scale)]);
            table.add_row(vec!["Max |fixed|".to_string(), fixed.max_abs_fixed.to_string()]);
            table.add_row(vec![
                "Clip".to_string(),
                fixed.clip_abs.map(|c| format!("{:?}", c)).unwrap_or_else(|| "none".to_string()),
            ]);
        }
        None => {
            table.add_row(vec!["Encoding".to_string(), "f32_le".to_string()]);
        }
    }
    println!("{table}\n");

    if let Some(i) = record {
        let preview = if flat.is_fixed_point() {
            flat.record_i32(i).map(|r| format_preview(r))
        } else {
            flat.record_f32(i).map(|r| format_preview(r))
        };
        match preview {
            Some(text) => println!("record[{}] = {}", i, text),
            None => anyhow::bail!("record {} out of range (file holds {})", i, flat.len()),
        }
    }

    Ok(())
}

fn format_preview<T: std::fmt::Debug>(values: &[T]) -> String {
    let shown: Vec<String> = values.iter().take(PREVIEW_LEN).map(|v| format!("{:?}", v)).collect();
    if values.len() > PREVIEW_LEN {
        format!("[{}, … +{}]", shown.join(", "), values.len() - PREVIEW_LEN)
    } else {
        format!("[{}]", shown.join(", "))
    }
}
