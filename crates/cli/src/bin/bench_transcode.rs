use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::time::Instant;

use fvecs_transcode::{ConversionParams, QuantizeParams, Transcoder};

// Standard SIFT1M is 128 dims
const DIM: u32 = 128;

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/sift/sift/sift_base.fvecs".to_string());
    println!("🚀 Starting Transcode Benchmark on {}...", path);

    let file_len = std::fs::metadata(&path)
        .with_context(|| format!("Failed to stat {}", path))?
        .len();

    // ==========================================================
    // TEST 1: RAW I/O (Baseline)
    // ==========================================================
    println!("\nTest 1: Raw Read (No Parsing)...");
    let start_io = Instant::now();
    let mut reader = BufReader::new(File::open(&path)?);
    let copied = io::copy(&mut reader, &mut io::sink())?;
    let time_io = start_io.elapsed();
    report(copied, time_io.as_secs_f64());

    // ==========================================================
    // TEST 2: PASS-THROUGH (Decode + Validate + Write)
    // ==========================================================
    println!("\nTest 2: Pass-through f32...");
    let plain = ConversionParams::new(DIM).with_progress_interval(0);
    let time_plain = timed_run(&path, &plain)?;
    report(file_len, time_plain);

    // ==========================================================
    // TEST 3: Q16.16 (Decode + Validate + Quantize + Write)
    // ==========================================================
    println!("\nTest 3: Q16.16 fixed point...");
    let fixed = ConversionParams::new(DIM)
        .with_progress_interval(0)
        .with_quantization(QuantizeParams::q16_16());
    let time_fixed = timed_run(&path, &fixed)?;
    report(file_len, time_fixed);

    println!("--------------------------------------------------");
    println!("📉 COST ANALYSIS:");
    println!("   - Raw I/O:        {:.4}s", time_io.as_secs_f64());
    println!("   - Pass-through:   {:.4}s", time_plain);
    println!("   - Quantize cost:  {:.4}s", (time_fixed - time_plain).max(0.0));
    println!("--------------------------------------------------");

    Ok(())
}

fn timed_run(path: &str, params: &ConversionParams) -> Result<f64> {
    let input: Box<dyn Read> = Box::new(BufReader::new(File::open(path)?));
    let start = Instant::now();
    let summary = Transcoder::new(params)?.run(input, io::sink())?;
    let secs = start.elapsed().as_secs_f64();
    println!("   - Vectors: {} | BLAKE3: {}", summary.metadata.vectors, summary.digest.to_hex());
    Ok(secs)
}

fn report(bytes: u64, secs: f64) {
    println!(
        "   -> Time: {:.4}s | {:.2} GB/s",
        secs,
        (bytes as f64 / 1_024.0 / 1_024.0 / 1_024.0) / secs
    );
}
