//! Static page and README generation.
//!
//! Both documents are rewritten in full on every run. The image URL
//! carries a `?ts=` cache-busting parameter derived from the latest
//! sample's timestamp so caches revalidate after a publish.

use super::Result;
use crate::config::SiteConfig;
use chrono::{DateTime, FixedOffset};

/// Cache-busting query value for the latest sample.
pub fn cache_bust(latest: DateTime<FixedOffset>) -> String {
    latest.format("%Y%m%d_%H%M").to_string()
}

fn render_html(site: &SiteConfig, latest: DateTime<FixedOffset>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <style>
    body {{ font-family: Arial, sans-serif; text-align: center; margin: 40px; }}
    footer {{ margin-top: 40px; font-size: 14px; color: #555; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p>Last updated: {last_updated}</p>
  <img src="{chart}?ts={bust}" alt="Weather Forecast" width="1000">
  <footer>{attribution}</footer>
</body>
</html>
"#,
        title = site.title,
        last_updated = latest.format("%Y-%m-%d %H:%M"),
        chart = site.chart_file,
        bust = cache_bust(latest),
        attribution = site.attribution,
    )
}

fn render_readme(site: &SiteConfig, latest: DateTime<FixedOffset>) -> String {
    format!(
        r#"## 📊 Latest Weather Plot

![Weather Forecast]({base}/{chart}?ts={bust})

# {title}

An ETL pipeline that extracts hourly weather data, loads it into an
SQLite database, and regenerates this plot and the static page on every
run. Runs hourly from cron and pushes updates to the repository.

Last updated: {last_updated}

Check the live site here: [{title}]({base}/)
"#,
        base = site.pages_base_url,
        chart = site.chart_file,
        bust = cache_bust(latest),
        title = site.title,
        last_updated = latest.format("%Y-%m-%d %H:%M"),
    )
}

/// Regenerate `index.html` under the docs directory.
pub fn write_html(site: &SiteConfig, latest: DateTime<FixedOffset>) -> Result<()> {
    std::fs::write(site.html_path(), render_html(site, latest))?;
    Ok(())
}

/// Regenerate the README at its configured path.
pub fn write_readme(site: &SiteConfig, latest: DateTime<FixedOffset>) -> Result<()> {
    std::fs::write(&site.readme_path, render_readme(site, latest))?;
    Ok(())
}
