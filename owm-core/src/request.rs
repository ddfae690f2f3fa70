use std::fmt;

use url::Url;

use crate::{Config, Error, error::Result};

/// Default API root; endpoints are appended as path segments.
pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";

const API_KEY_PARAM: &str = "APPID";

/// The ways a location can be looked up.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Free-form city name, optionally with state and country: "London,uk".
    City(String),
    Coordinates { lat: f64, lon: f64 },
    /// Postal code, optionally followed by a country code: "94040,us".
    Zip(String),
    CityId(u64),
}

impl Location {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Location::City(name) => vec![("q", name.clone())],
            Location::Coordinates { lat, lon } => {
                vec![("lat", format!("{lat:.6}")), ("lon", format!("{lon:.6}"))]
            }
            Location::Zip(code) => vec![("zip", code.clone())],
            Location::CityId(id) => vec![("id", id.to_string())],
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::City(name) => write!(f, "{name}"),
            Location::Coordinates { lat, lon } => write!(f, "{lat}, {lon}"),
            Location::Zip(code) => write!(f, "zip {code}"),
            Location::CityId(id) => write!(f, "city #{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Current weather.
    Weather,
    /// 5 day / 3 hour forecast.
    Forecast,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Weather => "weather",
            Endpoint::Forecast => "forecast",
        }
    }
}

/// Build the request URL for `location`.
///
/// Fails with [`Error::MissingApiKey`] before doing anything else when the
/// key is empty. `units` is only added when configured and non-empty; the
/// key always goes last.
pub fn build_url(
    base: &str,
    endpoint: Endpoint,
    location: &Location,
    config: &Config,
) -> Result<Url> {
    if !config.has_api_key() {
        return Err(Error::MissingApiKey);
    }

    let root = base.trim_end_matches('/');
    let mut url = Url::parse(&format!("{root}/{}", endpoint.path()))?;

    {
        let mut query = url.query_pairs_mut();
        for (name, value) in location.query_pairs() {
            query.append_pair(name, &value);
        }
        if let Some(units) = config.units() {
            query.append_pair("units", units);
        }
        query.append_pair(API_KEY_PARAM, &config.api_key);
    }

    Ok(url)
}

/// The URL with the API key masked, for logs.
pub fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY_PARAM {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
