//! Projected vs actual mobility chart.
//!
//! Pairs the engine's projected curve with optional user-entered progress.
//! The series can be rendered as a terminal chart or written out as CSV for
//! an external plotting tool.

use crate::{Recommendation, Result, UserProgress};
use std::fs::File;
use std::path::Path;

pub const MIN_CHART_WIDTH: usize = 10;
pub const MAX_CHART_WIDTH: usize = 200;

/// One week of the chart
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ChartPoint {
    pub week: u32,
    pub projected: f64,
    pub actual: Option<f64>,
}

/// Week-indexed chart series
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressChart {
    pub points: Vec<ChartPoint>,
}

impl ProgressChart {
    pub fn new(recommendation: &Recommendation, progress: Option<&UserProgress>) -> Self {
        let points = recommendation
            .projected_mobility
            .iter()
            .map(|p| ChartPoint {
                week: p.week,
                projected: p.percentage,
                actual: progress.and_then(|u| u.week(p.week)),
            })
            .collect();
        Self { points }
    }

    pub fn has_actual(&self) -> bool {
        self.points.iter().any(|p| p.actual.is_some())
    }

    /// Render as horizontal bars where `width` cells equal 100%
    ///
    /// `width` is clamped to `MIN_CHART_WIDTH..=MAX_CHART_WIDTH`.
    pub fn render_text(&self, width: usize) -> String {
        let width = width.clamp(MIN_CHART_WIDTH, MAX_CHART_WIDTH);
        let mut out = String::new();

        out.push_str("Projected Mobility Improvement (%)\n");
        for point in &self.points {
            out.push_str(&format!(
                "  Week {} │ projected {} {:>5.1}%\n",
                point.week,
                bar(point.projected, width, '█'),
                point.projected
            ));
            if let Some(actual) = point.actual {
                out.push_str(&format!(
                    "         │ actual    {} {:>5.1}%\n",
                    bar(actual, width, '▒'),
                    actual
                ));
            }
        }

        out
    }

    /// Write the series as `week,projected,actual` CSV
    ///
    /// Weeks without an actual value leave that column empty.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        for point in &self.points {
            writer.serialize(point)?;
        }

        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        file.sync_all()?;

        tracing::info!("Wrote {} chart rows to {:?}", self.points.len(), path);
        Ok(())
    }
}

fn bar(percentage: f64, width: usize, fill: char) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    let mut s: String = std::iter::repeat(fill).take(filled).collect();
    s.extend(std::iter::repeat(' ').take(width - filled));
    s
}
