//! restful-sample: HTTP entry point.

use std::process::ExitCode;

use clap::Parser;
use server::app::{shutdown_signal, App, StartupError};
use server::cli::Cli;
use server::{config, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The subscriber may not be installed yet.
            eprintln!("restful-sample: {e}");
            tracing::error!(error = %e, "startup failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let mut config = config::load(cli.config.as_deref())?;
    config.apply(cli.overrides());

    telemetry::init_logging(&config.log)?;
    if let Ok(json) = serde_json::to_string(&config) {
        tracing::debug!(config = %json, "configuration loaded");
    }

    let metrics = if config.metrics.enabled {
        Some(telemetry::install_metrics()?)
    } else {
        None
    };

    let app = App::build(config, metrics).await?;
    app.run(shutdown_signal()).await
}
