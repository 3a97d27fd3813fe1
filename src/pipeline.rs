//! The ETL run: fetch → transform → load → publish.
//!
//! Control flows strictly forward, no retries. Fetch, transform and
//! store errors propagate to the caller and abort the run before any
//! artifact is touched. The git publish step is best-effort: its
//! failures are logged and swallowed.

use crate::config::Config;
use crate::fetch::OpenMeteoClient;
use crate::publish::{self, PublishOutcome};
use crate::store::WeatherDb;
use crate::transform::transform;
use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use std::path::Path;

/// Commit message used for every publish.
const COMMIT_MESSAGE: &str = "Update weather plot with temperature, humidity, and footer";

/// What one run did.
#[derive(Debug)]
pub struct RunSummary {
    /// Samples upserted this run.
    pub rows_loaded: usize,
    /// Rows in the table after the load (aged-out rows accumulate).
    pub rows_total: usize,
    /// Latest timestamp in the table.
    pub latest: Option<DateTime<FixedOffset>>,
    /// Whether the chart image was replaced.
    pub chart_changed: bool,
    /// Git outcome; `None` when skipped or failed.
    pub publish: Option<PublishOutcome>,
}

/// Execute one full ETL run.
pub async fn run(config: &Config, skip_publish: bool) -> anyhow::Result<RunSummary> {
    let offset = config.location.offset()?;
    // Captured once so the whole batch shares one provenance stamp.
    let now = Utc::now().with_timezone(&offset);

    let client = OpenMeteoClient::new()?;
    let raw = client
        .fetch_hourly(
            config.location.latitude,
            config.location.longitude,
            &config.location.timezone,
        )
        .await
        .context("weather API fetch failed")?;

    let samples = transform(&raw, offset, now)?;

    let mut db = WeatherDb::open(&config.storage.db_path)?;
    let rows_loaded = db.upsert_batch(&samples)?;
    let all = db.all_samples()?;
    let latest = all.last().map(|s| s.time);

    log::info!(
        "Weather data loaded into {} | rows: {} | last timestamp: {}",
        config.storage.db_path.display(),
        rows_loaded,
        latest.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".into()),
    );

    let Some(latest_time) = latest else {
        log::warn!("Table is empty after load, nothing to publish");
        return Ok(RunSummary {
            rows_loaded,
            rows_total: 0,
            latest: None,
            chart_changed: false,
            publish: None,
        });
    };

    std::fs::create_dir_all(&config.site.docs_dir)?;

    let chart_path = config.site.chart_path();
    let chart_changed = publish::render_chart(
        &all,
        &config.site.title,
        &config.site.attribution,
        &chart_path,
    )?;
    if chart_changed {
        log::info!("Weather plot saved to {}", chart_path.display());
    } else {
        log::info!("Weather plot unchanged, keeping published image");
    }

    publish::write_html(&config.site, latest_time)?;
    publish::write_readme(&config.site, latest_time)?;
    log::info!("index.html and README updated (ts={})", publish::cache_bust(latest_time));

    let publish = if skip_publish {
        log::info!("Publish skipped by request");
        None
    } else {
        let html_path = config.site.html_path();
        let files: Vec<&Path> = vec![
            chart_path.as_path(),
            html_path.as_path(),
            config.site.readme_path.as_path(),
        ];
        match publish::commit_and_push(&config.site.repo_dir, &files, COMMIT_MESSAGE) {
            Ok(PublishOutcome::Committed) => {
                log::info!("Git commit & push completed");
                Some(PublishOutcome::Committed)
            }
            Ok(PublishOutcome::NothingToCommit) => {
                log::info!("No artifact changes, nothing to commit");
                Some(PublishOutcome::NothingToCommit)
            }
            Err(e) => {
                // Publishing is best-effort; the data load already succeeded.
                log::warn!("Git publish failed: {}", e);
                None
            }
        }
    };

    Ok(RunSummary {
        rows_loaded,
        rows_total: all.len(),
        latest,
        chart_changed,
        publish,
    })
}
