use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use weather_core::{Config, Units, WeatherService, provider_from_config};

use crate::routes;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Listen address, e.g. "0.0.0.0:5000". Overrides config and environment.
        #[arg(long)]
        bind: Option<String>,

        /// Config file to use instead of the platform default.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Interactively store the OpenWeather API key and units.
    Configure {
        /// Config file to use instead of the platform default.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { bind, config } => serve(bind, config).await,
            Command::Configure { config } => configure(config),
        }
    }
}

fn config_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Config::config_file_path(),
    }
}

async fn serve(bind: Option<String>, config: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path(config)?;
    let mut config = Config::load_from(&path)?.with_env_overrides();
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    let provider = provider_from_config(&config)?;
    let service = WeatherService::new(Arc::from(provider));

    let app = routes::routes()
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    tracing::info!(
        addr = %config.server.bind,
        units = %config.openweather.units,
        config = %path.display(),
        "weather backend listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error")?;

    tracing::info!("weather backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

fn configure(config: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path(config)?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = Select::new("Units:", Units::all().to_vec())
        .prompt()
        .context("Failed to read units")?;

    config.set_api_key(api_key.trim().to_string());
    config.openweather.units = units;
    config.save_to(&path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}
