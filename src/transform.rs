//! Raw forecast series into timestamped samples.
//!
//! Timestamps are parsed as UTC and converted to the configured offset.
//! Every sample in a batch shares a single `extracted_at` stamp, captured
//! once per run by the caller, so the whole batch records identical
//! provenance. Samples past the 7-day forward window are dropped.

use crate::fetch::HourlyForecast;
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};

/// Samples further than this many days ahead of "now" are discarded.
pub const FORWARD_WINDOW_DAYS: i64 = 7;

/// Errors from the transform stage.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error(
        "parallel series length mismatch: time={time}, temperature={temperature}, humidity={humidity}"
    )]
    LengthMismatch {
        time: usize,
        temperature: usize,
        humidity: usize,
    },

    #[error("bad timestamp {0:?}")]
    BadTimestamp(String),
}

/// One hourly observation, ready to load.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    /// Local time in the configured timezone. Unique key in the store.
    pub time: DateTime<FixedOffset>,
    pub temperature_c: f64,
    pub humidity: f64,
    /// When the run that produced this row extracted it.
    pub extracted_at: DateTime<FixedOffset>,
}

/// Build the ordered sample batch for one run.
///
/// `now` is injected rather than read from the wall clock so window
/// filtering and provenance stamping are deterministic under test.
pub fn transform(
    raw: &HourlyForecast,
    offset: FixedOffset,
    now: DateTime<FixedOffset>,
) -> Result<Vec<WeatherSample>, TransformError> {
    if raw.time.len() != raw.temperature_2m.len()
        || raw.time.len() != raw.relative_humidity_2m.len()
    {
        return Err(TransformError::LengthMismatch {
            time: raw.time.len(),
            temperature: raw.temperature_2m.len(),
            humidity: raw.relative_humidity_2m.len(),
        });
    }

    let cutoff = now + Duration::days(FORWARD_WINDOW_DAYS);

    let mut samples = Vec::with_capacity(raw.time.len());
    for ((ts, &temperature_c), &humidity) in raw
        .time
        .iter()
        .zip(&raw.temperature_2m)
        .zip(&raw.relative_humidity_2m)
    {
        let time = parse_utc(ts)?.with_timezone(&offset);
        if time > cutoff {
            continue;
        }
        samples.push(WeatherSample {
            time,
            temperature_c,
            humidity,
            extracted_at: now,
        });
    }
    Ok(samples)
}

/// Parse an API timestamp as UTC.
///
/// Open-Meteo returns minute precision without an offset
/// (`2025-01-01T00:00`); a trailing `Z` or a seconds field are accepted
/// too.
fn parse_utc(ts: &str) -> Result<DateTime<Utc>, TransformError> {
    let naive = ts.strip_suffix('Z').unwrap_or(ts);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S"))
        .map(|dt| dt.and_utc())
        .map_err(|_| TransformError::BadTimestamp(ts.to_string()))
}
