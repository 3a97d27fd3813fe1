//! Run configuration: location, storage paths, and site text.
//!
//! All parameters have defaults matching the Kolkata deployment; a YAML
//! file can override any subset. Loaded once at process start and passed
//! into each stage, so tests can inject their own paths and coordinates.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration for one ETL run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub location: LocationConfig,
    pub storage: StorageConfig,
    pub site: SiteConfig,
}

/// Where to fetch the forecast for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone name, sent to the forecast API.
    pub timezone: String,
    /// UTC offset of `timezone`, e.g. `"+05:30"`. Used for local time
    /// conversion; kept fixed so stored RFC 3339 strings sort
    /// chronologically.
    pub utc_offset: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: 22.5726,
            longitude: 88.3639,
            timezone: "Asia/Kolkata".to_string(),
            utc_offset: "+05:30".to_string(),
        }
    }
}

impl LocationConfig {
    /// Parse `utc_offset` into a chrono offset.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset
            .parse::<FixedOffset>()
            .map_err(|e| ConfigError::InvalidOffset(format!("{}: {}", self.utc_offset, e)))
    }
}

/// Where the SQLite database lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/weather.db"),
        }
    }
}

/// Published artifacts: chart, HTML page, README, and the git checkout
/// they live in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory served as the static site (chart + index.html).
    pub docs_dir: PathBuf,
    /// README regenerated at the repository root.
    pub readme_path: PathBuf,
    /// Local git checkout to commit and push from.
    pub repo_dir: PathBuf,
    /// Chart file name inside `docs_dir`.
    pub chart_file: String,
    /// Page and chart title.
    pub title: String,
    /// Attribution line drawn inside the chart and in the page footer.
    pub attribution: String,
    /// Base URL where `docs_dir` is published, used for the README
    /// image link.
    pub pages_base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            readme_path: PathBuf::from("README.md"),
            repo_dir: PathBuf::from("."),
            chart_file: "kolkata_weather.png".to_string(),
            title: "Kolkata 7-Day Hourly Weather Forecast".to_string(),
            attribution: "© 2025 Created by Arijit Guchhait".to_string(),
            pages_base_url: "https://aguchhait-stack.github.io/etl_kolkata_weather".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn chart_path(&self) -> PathBuf {
        self.docs_dir.join(&self.chart_file)
    }

    pub fn html_path(&self) -> PathBuf {
        self.docs_dir.join("index.html")
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),
}
