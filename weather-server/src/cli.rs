use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use weather_core::{Config, QueryMode, WeatherRecord, WeatherService};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather over HTTP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and query mode in the config file.
    Configure,

    /// Serve `POST /` returning current weather as JSON.
    Serve {
        /// Address to bind, overriding the config file.
        #[arg(long)]
        listen: Option<String>,
    },

    /// Print current weather for a city.
    Show {
        /// City name.
        city: String,

        /// Description language: en, hi or de.
        #[arg(long)]
        lang: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Serve { listen } => {
                let service = Arc::new(WeatherService::from_config(&config)?);
                let addr = listen.as_deref().unwrap_or(config.listen_addr());
                crate::http::serve(addr, service).await?;
            }
            Command::Show { city, lang } => {
                let service = WeatherService::from_config(&config)?;
                let record = service
                    .fetch(&city, lang.as_deref())
                    .await
                    .map_err(|e| anyhow::anyhow!("{} (status {})", e, e.status_code()))?;
                print!("{}", render(&record));
            }
        }

        Ok(())
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let modes: Vec<&str> = QueryMode::all().iter().map(QueryMode::as_str).collect();
    let mode = Select::new("Query mode:", modes)
        .prompt()
        .context("Failed to read query mode")?;

    config.set_api_key(key.trim().to_string());
    config.set_query_mode(QueryMode::try_from(mode)?);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn render(record: &WeatherRecord) -> String {
    format!(
        "{}: {}\n  Temperature: {:.2}°C .. {:.2}°C\n  Humidity:    {}%\n  Pressure:    {} hPa\n  Wind:        {} m/s {} ({}°)\n",
        record.city,
        record.description,
        record.temperature.min,
        record.temperature.max,
        record.humidity,
        record.pressure,
        record.wind.speed,
        record.wind.direction,
        record.wind.degree,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{Temperature, Wind};

    #[test]
    fn parses_show_with_language() {
        let cli = Cli::try_parse_from(["weather", "show", "Berlin", "--lang", "de"]).unwrap();
        match cli.command {
            Command::Show { city, lang } => {
                assert_eq!(city, "Berlin");
                assert_eq!(lang.as_deref(), Some("de"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_serve_listen_override() {
        let cli = Cli::try_parse_from(["weather", "serve", "--listen", "0.0.0.0:9000"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { listen: Some(ref l) } if l == "0.0.0.0:9000"));
    }

    #[test]
    fn render_lists_every_field() {
        let record = WeatherRecord {
            city: "Berlin".into(),
            description: "Klarer Himmel".into(),
            temperature: Temperature { min: 3.5, max: 7.25 },
            humidity: 70,
            pressure: 1015,
            wind: Wind { speed: 4.1, direction: "↙ SW".into(), degree: 220.0 },
        };

        let out = render(&record);
        assert!(out.starts_with("Berlin: Klarer Himmel"));
        assert!(out.contains("3.50°C .. 7.25°C"));
        assert!(out.contains("70%"));
        assert!(out.contains("1015 hPa"));
        assert!(out.contains("↙ SW (220°)"));
    }
}
