use std::{io::Read, time::Duration};

use reqwest::blocking::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    Config, Error,
    error::Result,
    model::{ForecastResponse, WeatherResponse},
    request::{DEFAULT_BASE_URL, Endpoint, Location, build_url, redacted},
};

/// Upper bound on a whole request, connect to last byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking OpenWeatherMap client.
///
/// Every call performs exactly one GET; nothing is cached or retried. The
/// configuration is read-only after construction, so a client can be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct OpenWeatherMap {
    config: Config,
    base_url: String,
    http: Client,
}

impl OpenWeatherMap {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(config: Config, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            config,
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    /// Send requests to another API root, e.g. a proxy or a test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn current_weather(&self, location: &Location) -> Result<WeatherResponse> {
        self.get(Endpoint::Weather, location)
    }

    pub fn current_weather_from_city(&self, city: &str) -> Result<WeatherResponse> {
        self.current_weather(&Location::City(city.to_string()))
    }

    pub fn current_weather_from_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherResponse> {
        self.current_weather(&Location::Coordinates { lat, lon })
    }

    pub fn current_weather_from_zip(&self, zip: &str) -> Result<WeatherResponse> {
        self.current_weather(&Location::Zip(zip.to_string()))
    }

    pub fn current_weather_from_city_id(&self, id: u64) -> Result<WeatherResponse> {
        self.current_weather(&Location::CityId(id))
    }

    /// 5 day forecast in 3 hour steps. Only the first page the provider returns.
    pub fn forecast(&self, location: &Location) -> Result<ForecastResponse> {
        self.get(Endpoint::Forecast, location)
    }

    fn get<T: DeserializeOwned>(&self, endpoint: Endpoint, location: &Location) -> Result<T> {
        let url = build_url(&self.base_url, endpoint, location, &self.config)?;
        let body = self.fetch(url)?;
        decode(&body)
    }

    fn fetch(&self, url: reqwest::Url) -> Result<Vec<u8>> {
        debug!(url = %redacted(&url), "sending request");

        let mut res = self.http.get(url).send()?;

        let status = res.status();
        let mut body = Vec::new();
        res.read_to_end(&mut body)?;

        debug!(%status, bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }
}

/// Decode a response body. No field is range-checked.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Provider error message if the body is its JSON error document, else the raw body.
fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ApiError>(body) {
        Ok(err) => err.message,
        Err(_) => truncate_body(&String::from_utf8_lossy(body)),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
