use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use owm_core::{ForecastResponse, WeatherResponse};

/// Temperature and wind speed suffixes for a unit system.
fn unit_labels(units: Option<&str>) -> (&'static str, &'static str) {
    match units {
        Some("metric") => ("°C", "m/s"),
        Some("imperial") => ("°F", "mph"),
        _ => ("K", "m/s"),
    }
}

/// Local time at the location, falling back to UTC for a bogus offset.
fn local_time(ts: Option<DateTime<Utc>>, offset_secs: i64) -> String {
    let Some(ts) = ts else {
        return "-".to_string();
    };
    match i32::try_from(offset_secs).ok().and_then(FixedOffset::east_opt) {
        Some(offset) => ts.with_timezone(&offset).format("%H:%M").to_string(),
        None => ts.format("%H:%M UTC").to_string(),
    }
}

/// Human-readable summary of the current weather.
pub struct Current<'a> {
    weather: &'a WeatherResponse,
    units: Option<&'a str>,
}

impl<'a> Current<'a> {
    pub fn new(weather: &'a WeatherResponse, units: Option<&'a str>) -> Self {
        Self { weather, units }
    }
}

impl fmt::Display for Current<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.weather;
        let (deg, speed) = unit_labels(self.units);

        if w.sys.country.is_empty() {
            write!(f, "{}", w.name)?;
        } else {
            write!(f, "{}, {}", w.name, w.sys.country)?;
        }
        writeln!(f, " ({:.2}, {:.2})", w.coord.lat, w.coord.lon)?;

        let condition = w.condition().map(|c| c.description.as_str());
        writeln!(f, "  {}", condition.unwrap_or("Unknown"))?;
        writeln!(
            f,
            "  Temperature: {:.1}{deg} (feels like {:.1}{deg}, min {:.1}{deg}, max {:.1}{deg})",
            w.main.temp, w.main.feels_like, w.main.temp_min, w.main.temp_max
        )?;
        writeln!(f, "  Humidity:    {}%", w.main.humidity)?;
        writeln!(f, "  Pressure:    {} hPa", w.main.pressure)?;
        writeln!(
            f,
            "  Wind:        {:.1} {speed} at {:.0}°",
            w.wind.speed, w.wind.deg
        )?;
        writeln!(f, "  Clouds:      {}%", w.clouds.all)?;
        if let Some(rain) = w.rain.and_then(|r| r.one_hour.or(r.three_hours)) {
            writeln!(f, "  Rain:        {rain:.1} mm")?;
        }
        if let Some(snow) = w.snow.and_then(|s| s.one_hour.or(s.three_hours)) {
            writeln!(f, "  Snow:        {snow:.1} mm")?;
        }
        writeln!(f, "  Visibility:  {} m", w.visibility)?;
        writeln!(
            f,
            "  Sun:         rises {}, sets {}",
            local_time(w.sys.sunrise_at(), w.timezone),
            local_time(w.sys.sunset_at(), w.timezone)
        )?;
        writeln!(
            f,
            "  Observed:    {}",
            local_time(w.observed_at(), w.timezone)
        )
    }
}

/// One line per forecast step.
pub struct Forecast<'a> {
    forecast: &'a ForecastResponse,
    units: Option<&'a str>,
}

impl<'a> Forecast<'a> {
    pub fn new(forecast: &'a ForecastResponse, units: Option<&'a str>) -> Self {
        Self { forecast, units }
    }
}

impl fmt::Display for Forecast<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (deg, speed) = unit_labels(self.units);
        let city = &self.forecast.city;

        writeln!(f, "{}, {}", city.name, city.country)?;
        for entry in &self.forecast.list {
            let when = entry
                .time()
                .map(|t| t.format("%a %d %b %H:%M").to_string())
                .unwrap_or_else(|| entry.dt_txt.clone());
            let condition = entry
                .weather
                .first()
                .map(|c| c.description.as_str())
                .unwrap_or("Unknown");
            writeln!(
                f,
                "  {when}  {:>6.1}{deg}  {:>4.1} {speed}  {condition}",
                entry.main.temp, entry.wind.speed
            )?;
        }

        Ok(())
    }
}
