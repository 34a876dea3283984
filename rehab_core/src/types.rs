//! Core domain types for the rehabilitation plan engine.
//!
//! This module defines the data contract around the engine:
//! - Patient profile inputs and their documented domains
//! - Injury and activity enumerations
//! - The derived recommendation record
//! - User-entered progress used for chart overlays

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Number of weeks covered by a projection and by user progress
pub const PROGRAM_WEEKS: usize = 4;

pub const AGE_RANGE: RangeInclusive<u32> = 18..=80;
pub const PAIN_RANGE: RangeInclusive<u32> = 1..=10;
pub const MOBILITY_RANGE: RangeInclusive<u32> = 0..=100;
pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 30.0..=200.0;
pub const PROGRESS_RANGE: RangeInclusive<f64> = 0.0..=100.0;

// ============================================================================
// Enumerations
// ============================================================================

/// Injured body region
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InjuryType {
    Knee,
    Shoulder,
    Back,
}

impl InjuryType {
    pub const ALL: [InjuryType; 3] = [InjuryType::Knee, InjuryType::Shoulder, InjuryType::Back];

    pub fn label(&self) -> &'static str {
        match self {
            InjuryType::Knee => "Knee",
            InjuryType::Shoulder => "Shoulder",
            InjuryType::Back => "Back",
        }
    }
}

impl fmt::Display for InjuryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InjuryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "knee" => Ok(InjuryType::Knee),
            "shoulder" => Ok(InjuryType::Shoulder),
            "back" => Ok(InjuryType::Back),
            other => Err(Error::InvalidProfile(format!(
                "unknown injury type '{}' (expected knee, shoulder or back)",
                other
            ))),
        }
    }
}

/// Self-reported activity level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    ModeratelyActive,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 3] = [
        ActivityLevel::Sedentary,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
        }
    }

    /// Session duration multiplier as an integer percentage (1.0 / 1.2 / 1.5)
    pub fn factor_percent(&self) -> u32 {
        match self {
            ActivityLevel::Sedentary => 100,
            ActivityLevel::ModeratelyActive => 120,
            ActivityLevel::VeryActive => 150,
        }
    }

    pub fn factor(&self) -> f64 {
        f64::from(self.factor_percent()) / 100.0
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "moderately_active" | "moderate" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" | "very" => Ok(ActivityLevel::VeryActive),
            _ => Err(Error::InvalidProfile(format!(
                "unknown activity level '{}' (expected sedentary, moderately-active or very-active)",
                s.trim()
            ))),
        }
    }
}

// ============================================================================
// Patient Profile
// ============================================================================

/// Patient inputs for a single recommendation request
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    /// Age in years, [18, 80]
    pub age: u32,
    pub injury_type: InjuryType,
    /// Self-reported pain, [1, 10]
    pub pain_level: u32,
    /// Current range of motion as a percentage, [0, 100]
    pub mobility_range: u32,
    /// Body weight in kilograms, [30, 200].
    ///
    /// Collected and exported, but no recommendation formula reads it yet.
    pub weight: f64,
    pub activity_level: ActivityLevel,
}

impl PatientProfile {
    /// Build a profile, rejecting any field outside its domain
    pub fn new(
        age: u32,
        injury_type: InjuryType,
        pain_level: u32,
        mobility_range: u32,
        weight: f64,
        activity_level: ActivityLevel,
    ) -> Result<Self> {
        let profile = Self {
            age,
            injury_type,
            pain_level,
            mobility_range,
            weight,
            activity_level,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check every numeric field against its documented range.
    ///
    /// All violations are reported together in a single `InvalidProfile`.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !AGE_RANGE.contains(&self.age) {
            errors.push(format!(
                "age {} out of range [{}, {}]",
                self.age,
                AGE_RANGE.start(),
                AGE_RANGE.end()
            ));
        }
        if !PAIN_RANGE.contains(&self.pain_level) {
            errors.push(format!(
                "pain level {} out of range [{}, {}]",
                self.pain_level,
                PAIN_RANGE.start(),
                PAIN_RANGE.end()
            ));
        }
        if !MOBILITY_RANGE.contains(&self.mobility_range) {
            errors.push(format!(
                "mobility range {} out of range [{}, {}]",
                self.mobility_range,
                MOBILITY_RANGE.start(),
                MOBILITY_RANGE.end()
            ));
        }
        // NaN fails `contains` as well
        if !WEIGHT_RANGE_KG.contains(&self.weight) {
            errors.push(format!(
                "weight {} out of range [{}, {}]",
                self.weight,
                WEIGHT_RANGE_KG.start(),
                WEIGHT_RANGE_KG.end()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidProfile(errors.join("; ")))
        }
    }
}

// ============================================================================
// Recommendation
// ============================================================================

/// One point of the projected mobility curve
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MobilityPoint {
    pub week: u32,
    pub percentage: f64,
}

/// Exercise plan derived from a `PatientProfile`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub exercise: String,
    pub frequency_per_week: u32,
    pub duration_minutes: u32,
    pub projected_mobility: Vec<MobilityPoint>,
}

impl Recommendation {
    pub fn frequency_text(&self) -> String {
        format!("{} times a week", self.frequency_per_week)
    }

    pub fn duration_text(&self) -> String {
        format!("{} minutes per session", self.duration_minutes)
    }
}

// ============================================================================
// User Progress
// ============================================================================

/// Actual mobility percentages entered by the user, one per week.
///
/// Never compared against the projection; only displayed beside it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct UserProgress {
    weeks: [f64; PROGRAM_WEEKS],
}

impl UserProgress {
    pub fn new(values: &[f64]) -> Result<Self> {
        if values.len() != PROGRAM_WEEKS {
            return Err(Error::InvalidProgress(format!(
                "expected {} weekly values, got {}",
                PROGRAM_WEEKS,
                values.len()
            )));
        }

        let mut weeks = [0.0; PROGRAM_WEEKS];
        for (idx, value) in values.iter().enumerate() {
            if !PROGRESS_RANGE.contains(value) {
                return Err(Error::InvalidProgress(format!(
                    "week {} value {} out of range [0, 100]",
                    idx + 1,
                    value
                )));
            }
            weeks[idx] = *value;
        }

        Ok(Self { weeks })
    }

    pub fn values(&self) -> &[f64; PROGRAM_WEEKS] {
        &self.weeks
    }

    /// Value for a 1-based week number
    pub fn week(&self, week: u32) -> Option<f64> {
        let idx = usize::try_from(week).ok()?.checked_sub(1)?;
        self.weeks.get(idx).copied()
    }
}

impl TryFrom<Vec<f64>> for UserProgress {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(&values)
    }
}

impl From<UserProgress> for Vec<f64> {
    fn from(progress: UserProgress) -> Self {
        progress.weeks.to_vec()
    }
}

impl FromStr for UserProgress {
    type Err = Error;

    /// Parse a comma separated list such as `12,18,25.5,30`
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    Error::InvalidProgress(format!("'{}' is not a number", part.trim()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(&values)
    }
}
