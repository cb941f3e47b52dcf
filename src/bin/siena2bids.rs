use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use siena2bids::{ConversionConfig, Converter, FsBidsWriter};

#[derive(Parser, Debug)]
#[command(name = "siena2bids", version, about = "Convert the Siena Scalp EEG dataset to BIDS")]
struct Args {
    /// Dataset root containing the PNxx subject directories
    #[arg(long)]
    source: Option<PathBuf>,

    /// Output BIDS root
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// BIDS session label
    #[arg(long)]
    session: Option<String>,

    /// BIDS task label
    #[arg(long)]
    task: Option<String>,

    /// Directory-name prefix of subject folders
    #[arg(long)]
    subject_prefix: Option<String>,

    /// Recording file extension, without the dot
    #[arg(long)]
    extension: Option<String>,
}

fn build_config(args: Args) -> Result<ConversionConfig> {
    let mut config = match &args.config {
        Some(path) => ConversionConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            if args.source.is_none() || args.output.is_none() {
                bail!("--source and --output are required without --config");
            }
            ConversionConfig::default()
        }
    };

    if let Some(source) = args.source {
        config.source_root = source;
    }
    if let Some(output) = args.output {
        config.bids_root = output;
    }
    if let Some(session) = args.session {
        config.session = session;
    }
    if let Some(task) = args.task {
        config.task = task;
    }
    if let Some(prefix) = args.subject_prefix {
        config.subject_prefix = prefix;
    }
    if let Some(extension) = args.extension {
        config.recording_extension = extension;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = build_config(Args::parse())?;
    tracing::info!(
        source = %config.source_root.display(),
        output = %config.bids_root.display(),
        "starting conversion"
    );

    let sink = FsBidsWriter::new(&config.bids_root);
    let summary = Converter::new(config, sink).run()?;

    println!(
        "Converted {} recordings from {} subjects ({} failed, {} seizures attached)",
        summary.recordings_converted,
        summary.subjects,
        summary.recordings_failed(),
        summary.events_attached
    );
    for (path, reason) in &summary.failures {
        println!("  failed: {} ({})", path.display(), reason);
    }

    Ok(())
}
