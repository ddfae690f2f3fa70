use thiserror::Error as ThisError;

/// Errors returned by the weather client.
#[derive(Debug, ThisError)]
pub enum Error {
    /// No API key configured. Raised before any network access.
    #[error("No API key configured.\nHint: run `owm configure` or set OWM_API_KEY.")]
    MissingApiKey,

    /// Connection, timeout or protocol failure while talking to the provider.
    #[error("Failed to send request to OpenWeatherMap: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be read to the end.
    #[error("Failed to read OpenWeatherMap response body: {0}")]
    Io(#[from] std::io::Error),

    /// The body is not valid JSON or does not match the response schema.
    #[error("Failed to parse OpenWeatherMap JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The provider answered with a non-success status.
    #[error("OpenWeatherMap request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
