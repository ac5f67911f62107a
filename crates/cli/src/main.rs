use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediacraft_core::{
    default_config_path, load_config, load_config_or_default, organize_series, validate_config,
    Config, ConversionProcessor, Extractor, FfmpegEngine, Notifier, Orchestrator,
    ProcessorConfig, ProfileResolver, SanitizedConfig, TelegramNotifier,
};

/// How long to wait for outstanding notifications before exiting.
const NOTIFICATION_FLUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// Batch media transcoding with archive reassembly and ffmpeg profiles.
#[derive(Debug, Parser)]
#[command(name = "mediacraft", version, disable_version_flag = true)]
struct Cli {
    /// Convert inputs, given as `path` or `path@profile`.
    #[arg(short = 'c', long = "convert", value_name = "INPUT", num_args = 1..)]
    convert: Vec<String>,

    /// Sort a series folder into season folders.
    #[arg(short = 'o', long = "order", value_name = "DIR")]
    order: Option<PathBuf>,

    /// Configuration file.
    #[arg(long, value_name = "PATH", env = "MEDIACRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// Print each result as a JSON line.
    #[arg(long)]
    json: bool,

    /// Print version.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every requested action succeeded.
async fn run(cli: Cli) -> Result<bool> {
    if cli.convert.is_empty() && cli.order.is_none() {
        bail!("No action given; use --convert <INPUT> or --order <DIR> (see --help)");
    }

    let config = load(cli.config.as_deref())?;
    validate_config(&config).context("Configuration validation failed")?;
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default()
    );

    let mut success = true;

    if !cli.convert.is_empty() {
        let processor = build_processor(&config)?;

        for raw in &cli.convert {
            match processor.process(raw).await {
                Ok(outcome) => {
                    for (result, summary) in outcome.results.iter().zip(&outcome.summaries) {
                        println!("{}", summary);
                        if cli.json {
                            println!("{}", serde_json::to_string(result)?);
                        }
                    }
                }
                Err(e) => {
                    error!("Request '{}' failed: {:#}", raw, anyhow::Error::new(e));
                    success = false;
                }
            }
        }

        let delivered = processor
            .flush_notifications(NOTIFICATION_FLUSH_TIMEOUT)
            .await;
        if delivered > 0 {
            info!("Delivered {} notification(s)", delivered);
        }
    }

    if let Some(dir) = &cli.order {
        let extractor = Extractor::new(config.extractor.clone());
        let report = organize_series(dir, &extractor, &config.mediacraft.season_dir_prefix)
            .await
            .with_context(|| format!("Failed to organize {:?}", dir))?;

        for (season, files) in &report.seasons {
            println!("Season {}: {} file(s)", season, files.len());
        }
        if cli.json {
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    Ok(success)
}

/// Loads the explicit config file, or the default one when present.
fn load(explicit: Option<&std::path::Path>) -> Result<Config> {
    match explicit {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => match default_config_path() {
            Some(path) => load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path)),
            None => {
                warn!("No home directory, using default configuration");
                Ok(Config::default())
            }
        },
    }
}

fn build_processor(config: &Config) -> Result<ConversionProcessor<FfmpegEngine>> {
    let engine = FfmpegEngine::new(config.converter.clone());
    let processor = ConversionProcessor::new(
        ProcessorConfig::from(config),
        Orchestrator::new(engine, config.converter.clone()),
        Extractor::new(config.extractor.clone()),
        ProfileResolver::new(config.profiles.clone()),
    );

    if !config.mediacraft.notifications {
        return Ok(processor);
    }
    let Some((token, chat_id)) = config.telegram.credentials() else {
        warn!("Notifications enabled without Telegram credentials");
        return Ok(processor);
    };
    let notifier: Arc<dyn Notifier> = Arc::new(
        TelegramNotifier::new(token, chat_id).context("Failed to create Telegram notifier")?,
    );
    info!("Using notifier: {}", notifier.name());
    Ok(processor.with_notifier(notifier))
}
