//! Stream2Graph CLI - offline pipeline runner and dataset readiness check.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stream2graph::evaluator::{self, dataset, EvalThresholds};
use stream2graph::session::Session;
use stream2graph::transcript::{parse_chunks, replay_chunks, ReplayConfig, TranscriptFormat};
use stream2graph::waitk::WaitKConfig;

#[derive(Parser)]
#[command(name = "stream2graph")]
#[command(about = "Transcript-to-graph streaming core: offline pipeline runner and dataset checks", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a transcript file through the pipeline and print the
    /// resulting payload as JSON.
    Run {
        /// Path to the transcript file.
        transcript: PathBuf,
        /// Transcript wire format.
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,
        /// Pace replay against wall-clock time using the transcript's
        /// own timestamps instead of running as fast as possible.
        #[arg(long)]
        realtime: bool,
        /// Realtime speed factor; >1.0 replays faster than the transcript
        /// clock. Ignored unless `--realtime` is set.
        #[arg(long, default_value_t = 1.0)]
        time_scale: f64,
        /// Stop after this many chunks; 0 means no bound.
        #[arg(long, default_value_t = 0)]
        max_chunks: usize,
        /// Also evaluate the resulting payload against threshold gates.
        #[arg(long)]
        evaluate: bool,
    },

    /// Score a directory of CSCW dialogue records for dataset readiness.
    DatasetReadiness {
        /// Directory containing `*.json` records.
        dataset_dir: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Json,
    Jsonl,
    FreeForm,
}

impl From<FormatArg> for TranscriptFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => TranscriptFormat::Json,
            FormatArg::Jsonl => TranscriptFormat::Jsonl,
            FormatArg::FreeForm => TranscriptFormat::FreeForm,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            transcript,
            format,
            realtime,
            time_scale,
            max_chunks,
            evaluate,
        } => {
            let raw = std::fs::read_to_string(&transcript)?;
            let chunks = parse_chunks(&raw, format.into())?;

            let mut session = Session::new(WaitKConfig::default());
            let replay_config = ReplayConfig {
                realtime,
                time_scale,
                max_chunks,
            };
            replay_chunks(&chunks, replay_config, |chunk| {
                session.ingest_chunk(chunk.clone());
            })
            .await;
            session.flush();

            let mut payload = session.snapshot();
            payload.meta.mode = "offline_replay".to_string();

            if evaluate {
                let report = evaluator::evaluate_payload(&payload, EvalThresholds::default());
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
        }

        Commands::DatasetReadiness { dataset_dir } => {
            let evaluation = dataset::score_dataset_readiness(&dataset_dir)?;
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
    }

    Ok(())
}
