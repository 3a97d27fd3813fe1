//! Open-Meteo forecast client.
//!
//! One GET per run, no retry. A non-success status or a body that does
//! not match the expected shape is fatal — the pipeline must abort
//! rather than load partial or stale data.

use serde::Deserialize;
use std::time::Duration;

/// Forecast endpoint.
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Hourly variables requested from the API.
const HOURLY_VARIABLES: &str = "temperature_2m,relative_humidity_2m";

/// Defensive request timeout; the API has no SLA and the run must not hang.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from forecast API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Wire format of the forecast response (only the fields we use).
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub hourly: HourlyForecast,
}

/// Parallel hourly series as returned by the API. The arrays are
/// documented to be equal length; the transformer enforces it.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyForecast {
    /// ISO 8601 timestamps.
    pub time: Vec<String>,
    /// Degrees Celsius.
    pub temperature_2m: Vec<f64>,
    /// Relative humidity, percent.
    pub relative_humidity_2m: Vec<f64>,
}

/// A minimal Open-Meteo client.
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the hourly temperature and humidity series for one location.
    pub async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<HourlyForecast> {
        let response = self
            .client
            .get(FORECAST_URL)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("timezone", timezone.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let forecast: ForecastResponse = response.json().await?;
        Ok(forecast.hourly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_deserialization() {
        let json_str = r#"{
            "latitude": 22.5726,
            "longitude": 88.3639,
            "hourly_units": {"temperature_2m": "°C"},
            "hourly": {
                "time": ["2025-01-01T00:00", "2025-01-01T01:00"],
                "temperature_2m": [20.1, 20.5],
                "relative_humidity_2m": [80.0, 78.0]
            }
        }"#;
        let resp: ForecastResponse = serde_json::from_str(json_str).unwrap();
        assert_eq!(resp.hourly.time.len(), 2);
        assert_eq!(resp.hourly.temperature_2m, vec![20.1, 20.5]);
        assert_eq!(resp.hourly.relative_humidity_2m, vec![80.0, 78.0]);
    }

    #[test]
    fn response_missing_series_is_an_error() {
        // A shape mismatch must surface as a parse error, not defaults.
        let json_str = r#"{"hourly": {"time": ["2025-01-01T00:00"]}}"#;
        assert!(serde_json::from_str::<ForecastResponse>(json_str).is_err());
    }

    #[test]
    fn client_builds() {
        OpenMeteoClient::new().unwrap();
    }
}
