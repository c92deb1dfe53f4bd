use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use clima_core::{
    Config, FetchError, WeatherQuery, WeatherResult, WeatherService,
    config::DEFAULT_ENDPOINT,
};
use inquire::{Password, PasswordDisplayMode, Text};
use tokio::sync::oneshot;
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Current weather for a city or location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and defaults.
    Configure,

    /// Show current weather for a city.
    City {
        /// City name; falls back to the configured default city.
        name: Option<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show current weather for a latitude/longitude pair.
    Coords {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::City { name, json } => {
                let config = Config::load_with_env()?;
                let name = resolve_city(name.as_deref(), &config)?;
                let service = WeatherService::new(config.service_config()?);
                debug!(endpoint = %service.config().endpoint, "fetching weather by city");

                let result = service.fetch_by_city(&name).await;
                print_outcome(result, json)
            }
            Command::Coords { latitude, longitude, json } => {
                let config = Config::load_with_env()?;
                let service = WeatherService::new(config.service_config()?);
                debug!(endpoint = %service.config().endpoint, "fetching weather by coordinates");

                // Callback form: the result arrives on a runtime worker and is
                // forwarded back to this task before printing.
                let (tx, rx) = oneshot::channel();
                service.spawn_fetch(WeatherQuery::coordinates(latitude, longitude), move |res| {
                    let _ = tx.send(res);
                });
                let result = rx.await.context("Weather fetch task ended without a result")?;
                print_outcome(result, json)
            }
        }
    }
}

/// Pick the city to query; blank input is rejected.
fn resolve_city(name: Option<&str>, config: &Config) -> anyhow::Result<String> {
    let name = name.unwrap_or_else(|| config.default_city()).trim();
    if name.is_empty() {
        bail!("Enter the city name");
    }
    Ok(name.to_string())
}

fn print_outcome(result: Result<WeatherResult, FetchError>, json: bool) -> anyhow::Result<()> {
    let weather = match result {
        Ok(weather) => weather,
        Err(err) => {
            let message = err.user_message();
            debug!("weather fetch failed: {:?}", anyhow::Error::new(err));
            bail!(message);
        }
    };

    if json {
        println!("{}", render::weather_json(&weather)?);
    } else {
        println!("{}", render::weather_line(&weather, &Local::now()));
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    let current_endpoint = config.endpoint.clone().unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let endpoint = Text::new("Weather endpoint:")
        .with_default(&current_endpoint)
        .prompt()
        .context("Failed to read endpoint")?;

    let default_city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Failed to read default city")?;

    config.api_key = Some(api_key.trim().to_string());
    config.endpoint =
        Some(endpoint.trim().to_string()).filter(|e| !e.is_empty() && e != DEFAULT_ENDPOINT);
    config.default_city = Some(default_city.trim().to_string()).filter(|c| !c.is_empty());

    // Validate key and endpoint before persisting.
    config.service_config()?;
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}
