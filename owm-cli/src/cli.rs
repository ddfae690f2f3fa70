use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, Select};
use owm_core::{Config, Location, OpenWeatherMap};
use tracing::debug;

use crate::display;

const UNIT_CHOICES: &[&str] = &["metric", "imperial", "standard"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "owm", version, about = "Current weather from OpenWeatherMap")]
pub struct Cli {
    #[command(flatten)]
    pub opts: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Unit system passed to the provider, e.g. "metric" or "imperial".
    #[arg(long, global = true)]
    pub units: Option<String>,

    /// API key; overrides the config file and OWM_API_KEY.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Print the decoded response as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and preferred unit system.
    Configure,

    /// Current weather by city name, e.g. "London" or "London,uk".
    City { name: String },

    /// Current weather by geographic coordinates.
    Coords {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Current weather by postal code, e.g. "94040" or "94040,us".
    Zip { code: String },

    /// Current weather by OpenWeatherMap city id.
    Id { id: u64 },

    /// 5 day / 3 hour forecast for a city.
    Forecast { name: String },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let location = match self.command {
            Command::Configure => return configure(),
            Command::City { name } => Location::City(name),
            Command::Coords { lat, lon } => Location::Coordinates { lat, lon },
            Command::Zip { code } => Location::Zip(code),
            Command::Id { id } => Location::CityId(id),
            Command::Forecast { name } => {
                let client = client(&self.opts)?;
                let forecast = client
                    .forecast(&Location::City(name.clone()))
                    .with_context(|| format!("Failed to fetch forecast for {name}"))?;
                if self.opts.json {
                    println!("{}", serde_json::to_string_pretty(&forecast)?);
                } else {
                    print!("{}", display::Forecast::new(&forecast, client.config().units()));
                }
                return Ok(());
            }
        };

        let client = client(&self.opts)?;
        let weather = client
            .current_weather(&location)
            .with_context(|| format!("Failed to fetch weather for {location}"))?;

        if self.opts.json {
            println!("{}", serde_json::to_string_pretty(&weather)?);
        } else {
            print!("{}", display::Current::new(&weather, client.config().units()));
        }

        Ok(())
    }
}

/// Config file, then environment, then flags.
fn resolve_config(opts: &GlobalOpts) -> Result<Config> {
    let mut config = Config::load()?;
    config.apply_env();
    config.apply_overrides(opts.api_key.clone(), opts.units.clone());
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn client(opts: &GlobalOpts) -> Result<OpenWeatherMap> {
    let config = resolve_config(opts)?;
    Ok(OpenWeatherMap::new(config)?)
}

fn configure() -> Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = Select::new("Unit system:", UNIT_CHOICES.to_vec())
        .prompt()
        .context("Failed to read unit system")?;

    config.api_key = api_key.trim().to_string();
    config.units = Some(units.to_string());
    config.save_to(&path)?;

    println!("Saved configuration to {}", path.display());

    Ok(())
}
