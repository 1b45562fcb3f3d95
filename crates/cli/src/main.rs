use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fvecs_transcode::{ConversionParams, OverflowPolicy, QuantizeParams};
use fvecs_transcode_cli::commands::{convert, corpus, inspect};
use fvecs_transcode_cli::telemetry;

#[derive(Parser)]
#[command(name = "fvecs2bin")]
#[command(about = "Convert .fvecs datasets into flat f32 or Q16.16 binaries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one .fvecs file and write a .meta next to the output
    Convert {
        /// Input .fvecs file
        input: PathBuf,

        /// Output .bin file (parent directories are created)
        #[arg(long, short)]
        output: PathBuf,

        /// Dimension every record must declare
        #[arg(long, default_value_t = 128)]
        dim: u32,

        /// Stop after this many vectors
        #[arg(long, short)]
        limit: Option<u64>,

        /// Emit Q16.16 int32 instead of float32
        #[arg(long)]
        fixed: bool,

        /// Fixed-point scale factor
        #[arg(long, requires = "fixed")]
        scale: Option<f64>,

        /// Clamp components to [-clip, clip] before scaling
        #[arg(long, requires = "fixed")]
        clip: Option<f32>,

        /// Saturate out-of-range values instead of wrapping
        #[arg(long, requires = "fixed")]
        saturate: bool,
    },
    /// Run the conversions listed in a JSON job file, in order
    Corpus {
        job_file: PathBuf,
    },
    /// Show the layout of a converted file
    Inspect {
        bin_path: PathBuf,

        /// Metadata file (defaults to <bin_path>.meta)
        #[arg(long)]
        meta: Option<PathBuf>,

        /// Print this record
        #[arg(long, short)]
        record: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            dim,
            limit,
            fixed,
            scale,
            clip,
            saturate,
        } => {
            let mut params = ConversionParams::new(dim);
            params.limit = limit;
            if fixed {
                let mut q = QuantizeParams::q16_16();
                if let Some(s) = scale {
                    q = q.with_scale(s);
                }
                if let Some(c) = clip {
                    q = q.with_clip(c);
                }
                if saturate {
                    q = q.with_overflow(OverflowPolicy::Saturate);
                }
                params = params.with_quantization(q);
            }
            tracing::debug!(?params, "parsed conversion parameters");
            convert::run(&input, &output, &params).map(|_| ())
        }
        Commands::Corpus { job_file } => corpus::run(&job_file),
        Commands::Inspect {
            bin_path,
            meta,
            record,
        } => inspect::run(&bin_path, meta, record),
    }
}
