//! `page-patcher` command line entry point.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use page_patcher::adapters::generation::build_generator;
use page_patcher::adapters::telemetry::TracingPatchEventCallback;
use page_patcher::application::{ApplyEditCommand, ApplyEditConfig, ApplyEditHandler};
use page_patcher::config::{AppConfig, LoggingConfig};

#[derive(Debug, Parser)]
#[command(name = "page-patcher")]
#[command(about = "Apply a natural-language edit to an HTML page", long_about = None)]
#[command(version)]
struct Cli {
    /// HTML document to edit
    #[arg(short, long)]
    document: PathBuf,

    /// Change request, e.g. "make the footer darker"
    #[arg(short, long)]
    instruction: String,

    /// Write the edited document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    let document = match tokio::fs::read_to_string(&cli.document).await {
        Ok(document) => document,
        Err(e) => {
            error!(path = %cli.document.display(), error = %e, "Failed to read document");
            return ExitCode::FAILURE;
        }
    };

    let generator = match build_generator(&config.ai) {
        Ok(generator) => generator,
        Err(e) => {
            error!(error = %e, "Failed to set up text generator");
            return ExitCode::FAILURE;
        }
    };

    let handler = ApplyEditHandler::new(generator)
        .with_config(ApplyEditConfig::from(&config.patch))
        .with_event_callback(Arc::new(TracingPatchEventCallback::new()));

    let result = match handler
        .handle(ApplyEditCommand::new(document, cli.instruction))
        .await
    {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        edit_id = %result.edit_id,
        tier = %result.tier,
        attempts = result.attempts.len(),
        "Edit complete"
    );

    match cli.output {
        Some(path) => {
            if let Err(e) = tokio::fs::write(&path, &result.document).await {
                error!(path = %path.display(), error = %e, "Failed to write document");
                return ExitCode::FAILURE;
            }
        }
        None => print!("{}", result.document),
    }

    ExitCode::SUCCESS
}
