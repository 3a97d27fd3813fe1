//! Hourly weather ETL pipeline.
//!
//! One run per invocation, strictly forward:
//! - Fetch the hourly forecast (temperature + relative humidity) from Open-Meteo
//! - Convert timestamps to the configured timezone and keep the next 7 days
//! - Upsert the batch into a local SQLite table, keyed by timestamp
//! - Re-render the chart, static HTML page and README, then git commit & push
//!
//! Fetch, transform and load failures abort the run. Publishing is
//! best-effort: a failed commit or push is logged and swallowed.

pub mod config;
pub mod fetch;
pub mod pipeline;
pub mod publish;
pub mod store;
pub mod transform;

pub use config::{Config, ConfigError};
pub use fetch::{ApiError, HourlyForecast, OpenMeteoClient};
pub use pipeline::{run, RunSummary};
pub use publish::{PublishError, PublishOutcome};
pub use store::{StoreError, WeatherDb};
pub use transform::{transform, TransformError, WeatherSample};
