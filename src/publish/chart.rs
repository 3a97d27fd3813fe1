//! Dual-axis forecast chart.
//!
//! Temperature on the left axis (red), humidity on the right (blue),
//! shared time axis, combined legend, attribution footer inside the
//! image. The render goes to a temp file first; the published path is
//! only replaced when the bytes actually changed, so an unchanged
//! forecast produces no publish diff.

use super::{PublishError, Result};
use crate::transform::WeatherSample;
use chrono::NaiveDateTime;
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

const CHART_WIDTH: u32 = 1200;
const CHART_HEIGHT: u32 = 620;
const FOOTER_HEIGHT: u32 = 28;

/// Render the chart and atomically replace `path` if the image changed.
///
/// Returns `true` when the file was replaced, `false` when the fresh
/// render was byte-identical to what is already published.
pub fn render_chart(
    samples: &[WeatherSample],
    title: &str,
    footer: &str,
    path: &Path,
) -> Result<bool> {
    if samples.is_empty() {
        return Err(PublishError::NoData);
    }

    let tmp = tmp_path(path);
    draw(samples, title, footer, &tmp)?;
    replace_if_changed(&tmp, path)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    // BitMapBackend picks the image format from the file extension, so
    // the temp render must keep the destination's extension.
    if let Some(ext) = path.extension() {
        os.push(".");
        os.push(ext);
    }
    PathBuf::from(os)
}

fn draw(samples: &[WeatherSample], title: &str, footer: &str, out: &Path) -> Result<()> {
    let times: Vec<NaiveDateTime> = samples.iter().map(|s| s.time.naive_local()).collect();
    let t0 = times[0];
    let mut t1 = *times.last().unwrap_or(&t0);
    if t0 == t1 {
        // A single sample still needs a non-empty axis.
        t1 = t0 + chrono::Duration::hours(1);
    }

    let (temp_lo, temp_hi) = padded_range(samples.iter().map(|s| s.temperature_c));
    let (hum_lo, hum_hi) = padded_range(samples.iter().map(|s| s.humidity));

    let root = BitMapBackend::new(out, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PublishError::Chart(e.to_string()))?;
    let (plot_area, footer_area) = root.split_vertically((CHART_HEIGHT - FOOTER_HEIGHT) as i32);

    let x_range: RangedDateTime<NaiveDateTime> = (t0..t1).into();
    let x_range_secondary: RangedDateTime<NaiveDateTime> = (t0..t1).into();

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .right_y_label_area_size(55)
        .build_cartesian_2d(x_range, temp_lo..temp_hi)
        .map_err(|e| PublishError::Chart(e.to_string()))?
        .set_secondary_coord(x_range_secondary, hum_lo..hum_hi);

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|t: &NaiveDateTime| t.format("%d %b %H:%M").to_string())
        .y_desc("Temperature (°C)")
        .draw()
        .map_err(|e| PublishError::Chart(e.to_string()))?;

    chart
        .configure_secondary_axes()
        .y_desc("Humidity (%)")
        .draw()
        .map_err(|e| PublishError::Chart(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            samples
                .iter()
                .map(|s| (s.time.naive_local(), s.temperature_c)),
            RED.stroke_width(2),
        ))
        .map_err(|e| PublishError::Chart(e.to_string()))?
        .label("Temperature (°C)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .draw_series(
            samples
                .iter()
                .map(|s| Circle::new((s.time.naive_local(), s.temperature_c), 2, RED.filled())),
        )
        .map_err(|e| PublishError::Chart(e.to_string()))?;

    chart
        .draw_secondary_series(LineSeries::new(
            samples.iter().map(|s| (s.time.naive_local(), s.humidity)),
            BLUE.stroke_width(2),
        ))
        .map_err(|e| PublishError::Chart(e.to_string()))?
        .label("Humidity (%)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()
        .map_err(|e| PublishError::Chart(e.to_string()))?;

    let footer_style = ("sans-serif", 14)
        .into_font()
        .color(&RGBColor(120, 120, 120))
        .pos(Pos::new(HPos::Center, VPos::Center));
    footer_area
        .draw_text(
            footer,
            &footer_style,
            (CHART_WIDTH as i32 / 2, FOOTER_HEIGHT as i32 / 2),
        )
        .map_err(|e| PublishError::Chart(e.to_string()))?;

    root.present()
        .map_err(|e| PublishError::Chart(e.to_string()))?;
    Ok(())
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    // Flat series still need a non-empty axis.
    let pad = ((hi - lo) * 0.1).max(1.0);
    (lo - pad, hi + pad)
}

/// Byte-compare the fresh render against the published file.
///
/// Identical: drop the temp file, keep the old file untouched. Changed
/// (or first render): rename into place so readers never observe a
/// partially written image.
fn replace_if_changed(tmp: &Path, dest: &Path) -> Result<bool> {
    let fresh = std::fs::read(tmp)?;
    if dest.exists() {
        let published = std::fs::read(dest)?;
        if published == fresh {
            std::fs::remove_file(tmp)?;
            return Ok(false);
        }
    }
    std::fs::rename(tmp, dest)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use tempfile::tempdir;

    fn samples(temps: &[f64]) -> Vec<WeatherSample> {
        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let extracted_at = offset.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        temps
            .iter()
            .enumerate()
            .map(|(i, &t)| WeatherSample {
                time: offset.with_ymd_and_hms(2025, 1, 1, i as u32, 0, 0).unwrap(),
                temperature_c: t,
                humidity: 80.0 - i as f64,
                extracted_at,
            })
            .collect()
    }

    #[test]
    fn first_render_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let changed = render_chart(&samples(&[20.0, 21.0, 22.5]), "t", "f", &path).unwrap();
        assert!(changed);
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        // No temp file left behind
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn identical_rerender_does_not_replace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let data = samples(&[20.0, 21.0, 22.5]);
        assert!(render_chart(&data, "t", "f", &path).unwrap());
        let first = std::fs::read(&path).unwrap();

        assert!(!render_chart(&data, "t", "f", &path).unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), first);
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn changed_data_replaces_with_fresh_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.png");
        assert!(render_chart(&samples(&[20.0, 21.0, 22.5]), "t", "f", &path).unwrap());
        let first = std::fs::read(&path).unwrap();

        assert!(render_chart(&samples(&[10.0, 11.0, 30.0]), "t", "f", &path).unwrap());
        let second = std::fs::read(&path).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn empty_sample_set_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.png");
        assert!(matches!(
            render_chart(&[], "t", "f", &path),
            Err(PublishError::NoData)
        ));
    }

    #[test]
    fn single_sample_renders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.png");
        assert!(render_chart(&samples(&[20.0]), "t", "f", &path).unwrap());
    }
}
