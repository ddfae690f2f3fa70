use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinates of the location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

/// One entry of the `weather` array: a condition group and its description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    /// Condition group, e.g. "Rain" or "Clouds".
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Core measurements. Temperatures are in the requested unit system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Main {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    pub pressure: i64,
    pub humidity: i64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sea_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grnd_level: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    /// Direction in meteorological degrees.
    #[serde(default)]
    pub deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

/// Cloud coverage in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: i64,
}

/// Rain or snow volume in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h", default, skip_serializing_if = "Option::is_none")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h", default, skip_serializing_if = "Option::is_none")]
    pub three_hours: Option<f64>,
}

/// System metadata: country and sun times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sys {
    #[serde(rename = "type")]
    pub kind: i64,
    pub id: i64,
    /// Typed as a float by the provider even though it is called "message".
    pub message: f64,
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

impl Sys {
    pub fn sunrise_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sunrise)
    }

    pub fn sunset_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sunset)
    }
}

/// Current weather for one location, as returned by `/weather`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub coord: Coord,
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub base: String,
    pub main: Main,
    /// Visibility in metres.
    #[serde(default)]
    pub visibility: i64,
    pub wind: Wind,
    pub clouds: Clouds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<Precipitation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow: Option<Precipitation>,
    /// Observation time, unix seconds UTC.
    pub dt: i64,
    /// Shift from UTC in seconds.
    #[serde(default)]
    pub timezone: i64,
    /// City id.
    pub id: i64,
    pub name: String,
    pub sys: Sys,
    #[serde(default)]
    pub cod: i64,
}

impl WeatherResponse {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.dt)
    }

    /// The primary condition, if the provider sent any.
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub coord: Coord,
    #[serde(default)]
    pub country: String,
}

/// One 3-hour step of the forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: Main,
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub clouds: Clouds,
    pub wind: Wind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<Precipitation>,
    #[serde(default)]
    pub dt_txt: String,
}

impl ForecastEntry {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.dt)
    }
}

/// 5 day / 3 hour forecast, as returned by `/forecast`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub city: City,
    #[serde(default)]
    pub cnt: i64,
    pub list: Vec<ForecastEntry>,
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
