//! Blocking client for the OpenWeatherMap current weather API.
//!
//! This crate defines:
//! - Configuration (API key, unit system) and its on-disk form
//! - Request construction for the four lookup modes
//! - A single-shot HTTP transport and the JSON decoder
//! - Typed response records
//!
//! It is used by `owm-cli`, but can also be reused by other binaries or services.
//!
//! ```no_run
//! use owm_core::{Config, OpenWeatherMap};
//!
//! let client = OpenWeatherMap::new(Config::new("API_KEY").with_units("metric"))?;
//! let weather = client.current_weather_from_city("London,uk")?;
//! println!("{}: {}", weather.name, weather.main.temp);
//! # Ok::<(), owm_core::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod request;

pub use client::OpenWeatherMap;
pub use config::Config;
pub use error::{Error, Result};
pub use model::{
    City, Clouds, Condition, Coord, ForecastEntry, ForecastResponse, Main, Precipitation, Sys,
    WeatherResponse, Wind,
};
pub use request::{Endpoint, Location};
