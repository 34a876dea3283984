//! Plain-text export of a rehabilitation plan.
//!
//! The export is a flat `Label: value` block, one field per line, offered to
//! users as `rehabilitation_plan.txt`.

use crate::{Error, PatientProfile, Recommendation, Result};
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name used for exported plans
pub const PLAN_FILE_NAME: &str = "rehabilitation_plan.txt";

/// MIME type of exported plans
pub const PLAN_MIME_TYPE: &str = "text/plain";

const PLAN_TITLE: &str = "Custom Rehabilitation Plan";

/// Render the profile and recommendation as a text block
///
/// Field order: profile inputs, then exercise, frequency, duration and the
/// weekly projection.
pub fn render_plan(profile: &PatientProfile, recommendation: &Recommendation) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", PLAN_TITLE);
    let _ = writeln!(out);
    let _ = writeln!(out, "Age: {}", profile.age);
    let _ = writeln!(out, "Injury Type: {}", profile.injury_type);
    let _ = writeln!(out, "Pain Level: {}", profile.pain_level);
    let _ = writeln!(out, "Mobility Range: {}%", profile.mobility_range);
    let _ = writeln!(out, "Weight: {} kg", profile.weight);
    let _ = writeln!(out, "Activity Level: {}", profile.activity_level);
    let _ = writeln!(out, "Exercise Type: {}", recommendation.exercise);
    let _ = writeln!(out, "Frequency: {}", recommendation.frequency_text());
    let _ = writeln!(out, "Duration per Session: {}", recommendation.duration_text());

    for point in &recommendation.projected_mobility {
        let _ = writeln!(
            out,
            "Week {} Projected Mobility: {:.1}%",
            point.week, point.percentage
        );
    }

    out
}

/// Write the rendered plan to `dir/rehabilitation_plan.txt`
///
/// The file is written to a temp file in the same directory, synced, and
/// renamed into place. Returns the final path.
pub fn write_plan(
    dir: &Path,
    profile: &PatientProfile,
    recommendation: &Recommendation,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(PLAN_FILE_NAME);

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(render_plan(profile, recommendation).as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(&path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported plan to {:?}", path);
    Ok(path)
}
