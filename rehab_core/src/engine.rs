//! Recommendation engine for rehabilitation plans.
//!
//! The engine is a fixed lookup table plus arithmetic formulas:
//! - Exercise selected by injury type
//! - Weekly frequency scaled by pain level
//! - Session duration scaled by mobility range and activity level
//! - A linear four-week mobility projection

use crate::{
    ActivityLevel, InjuryType, MobilityPoint, PatientProfile, Recommendation, Result,
    PROGRAM_WEEKS,
};

/// Exercise prescribed for an injury type
pub fn exercise_for(injury: InjuryType) -> &'static str {
    match injury {
        InjuryType::Knee => "Low-impact leg exercises",
        InjuryType::Shoulder => "Arm and shoulder mobility drills",
        // Fallback category
        InjuryType::Back => "Core stability exercises",
    }
}

/// Sessions per week: `3 + pain_level / 3` (3..=6 over the valid pain range)
pub fn frequency_per_week(pain_level: u32) -> u32 {
    3 + pain_level / 3
}

/// Minutes per session: `floor((20 + mobility_range / 5) * activity factor)`
///
/// The factor is applied as an integer percentage so truncation is exact.
pub fn duration_minutes(mobility_range: u32, activity: ActivityLevel) -> u32 {
    let base = 20 + mobility_range / 5;
    base * activity.factor_percent() / 100
}

/// Straight-line forecast at 20/40/60/80% of the current mobility range.
///
/// Placeholder curve: age, pain and weight do not influence it.
pub fn project_mobility(mobility_range: u32) -> Vec<MobilityPoint> {
    (1..=PROGRAM_WEEKS as u32)
        .map(|week| MobilityPoint {
            week,
            percentage: f64::from(mobility_range) * 0.2 * f64::from(week),
        })
        .collect()
}

/// Compute the recommendation for a patient profile
///
/// ## Rules
///
/// 1. **Exercise**: Knee → leg work, Shoulder → mobility drills, Back → core stability
/// 2. **Frequency**: pain 1-2 → 3x, 3-5 → 4x, 6-8 → 5x, 9-10 → 6x per week
/// 3. **Duration**: 20-40 base minutes, x1.0 / x1.2 / x1.5 by activity level
/// 4. **Projection**: four weekly points at 20% steps of the mobility range
///
/// Fails with `Error::InvalidProfile` if any field is outside its domain.
/// Pure: identical profiles always produce identical recommendations.
pub fn compute_recommendation(profile: &PatientProfile) -> Result<Recommendation> {
    profile.validate()?;

    let exercise = exercise_for(profile.injury_type);
    let frequency = frequency_per_week(profile.pain_level);
    let duration = duration_minutes(profile.mobility_range, profile.activity_level);

    tracing::info!(
        "Recommending {:?} for {} injury: {}x/week, {} min/session",
        exercise,
        profile.injury_type,
        frequency,
        duration
    );

    Ok(Recommendation {
        exercise: exercise.to_string(),
        frequency_per_week: frequency,
        duration_minutes: duration,
        projected_mobility: project_mobility(profile.mobility_range),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn create_test_profile() -> PatientProfile {
        PatientProfile {
            age: 30,
            injury_type: InjuryType::Knee,
            pain_level: 5,
            mobility_range: 50,
            weight: 70.0,
            activity_level: ActivityLevel::ModeratelyActive,
        }
    }

    #[test]
    fn test_reference_scenario() {
        crate::logging::init_test();
        let rec = compute_recommendation(&create_test_profile()).unwrap();

        assert_eq!(rec.exercise, "Low-impact leg exercises");
        assert_eq!(rec.frequency_per_week, 4);
        assert_eq!(rec.frequency_text(), "4 times a week");
        assert_eq!(rec.duration_minutes, 36);
        assert_eq!(rec.duration_text(), "36 minutes per session");

        let percentages: Vec<f64> = rec.projected_mobility.iter().map(|p| p.percentage).collect();
        assert_eq!(percentages, vec![10.0, 20.0, 30.0, 40.0]);
        let weeks: Vec<u32> = rec.projected_mobility.iter().map(|p| p.week).collect();
        assert_eq!(weeks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_minimum_scenario() {
        let profile = PatientProfile {
            pain_level: 1,
            mobility_range: 0,
            activity_level: ActivityLevel::Sedentary,
            ..create_test_profile()
        };
        let rec = compute_recommendation(&profile).unwrap();

        assert_eq!(rec.frequency_per_week, 3);
        assert_eq!(rec.duration_minutes, 20);
        assert!(rec.projected_mobility.iter().all(|p| p.percentage == 0.0));
        assert_eq!(rec.projected_mobility.len(), 4);
    }

    #[test]
    fn test_exercise_table() {
        let expected = [
            (InjuryType::Knee, "Low-impact leg exercises"),
            (InjuryType::Shoulder, "Arm and shoulder mobility drills"),
            (InjuryType::Back, "Core stability exercises"),
        ];
        for (injury, exercise) in expected {
            let profile = PatientProfile {
                injury_type: injury,
                ..create_test_profile()
            };
            assert_eq!(compute_recommendation(&profile).unwrap().exercise, exercise);
        }
    }

    #[test]
    fn test_frequency_bands() {
        let expected = [3, 3, 4, 4, 4, 5, 5, 5, 6, 6];
        for (pain, freq) in (1..=10).zip(expected) {
            assert_eq!(frequency_per_week(pain), freq, "pain level {}", pain);
            assert_eq!(frequency_per_week(pain), 3 + pain / 3);
        }
    }

    #[test]
    fn test_duration_matches_formula_everywhere() {
        for mobility in 0..=100u32 {
            for activity in ActivityLevel::ALL {
                let base = f64::from(20 + mobility / 5);
                let reference = (base * f64::from(activity.factor_percent()) / 100.0 + 1e-9).floor();
                assert_eq!(
                    f64::from(duration_minutes(mobility, activity)),
                    reference,
                    "mobility {} activity {:?}",
                    mobility,
                    activity
                );
            }
        }
    }

    #[test]
    fn test_duration_examples() {
        assert_eq!(duration_minutes(50, ActivityLevel::ModeratelyActive), 36);
        assert_eq!(duration_minutes(0, ActivityLevel::Sedentary), 20);
        assert_eq!(duration_minutes(100, ActivityLevel::Sedentary), 40);
        assert_eq!(duration_minutes(100, ActivityLevel::VeryActive), 60);
        // base 21 * 1.2 = 25.2
        assert_eq!(duration_minutes(5, ActivityLevel::ModeratelyActive), 25);
        // base 21 * 1.5 = 31.5
        assert_eq!(duration_minutes(9, ActivityLevel::VeryActive), 31);
    }

    #[test]
    fn test_projection_linear_and_increasing() {
        for mobility in 0..=100u32 {
            let points = project_mobility(mobility);
            assert_eq!(points.len(), 4);

            for (k, point) in points.iter().enumerate() {
                let expected = f64::from(mobility) * 0.2 * (k as f64 + 1.0);
                assert!((point.percentage - expected).abs() < 1e-9);
            }

            for pair in points.windows(2) {
                if mobility > 0 {
                    assert!(pair[1].percentage > pair[0].percentage);
                } else {
                    assert_eq!(pair[1].percentage, pair[0].percentage);
                }
            }

            let last = points[3].percentage;
            assert!(last <= f64::from(mobility) * 0.8 + 1e-9);
        }
    }

    #[test]
    fn test_idempotent() {
        let profile = create_test_profile();
        let first = compute_recommendation(&profile).unwrap();
        let second = compute_recommendation(&profile).unwrap();
        assert_eq!(first, second);
        for (a, b) in first.projected_mobility.iter().zip(&second.projected_mobility) {
            assert_eq!(a.percentage.to_bits(), b.percentage.to_bits());
        }
    }

    #[test]
    fn test_weight_does_not_affect_result() {
        let light = PatientProfile {
            weight: 45.0,
            ..create_test_profile()
        };
        let heavy = PatientProfile {
            weight: 150.0,
            ..create_test_profile()
        };
        assert_eq!(
            compute_recommendation(&light).unwrap(),
            compute_recommendation(&heavy).unwrap()
        );
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let profile = PatientProfile {
            mobility_range: 150,
            ..create_test_profile()
        };
        assert!(matches!(
            compute_recommendation(&profile),
            Err(Error::InvalidProfile(_))
        ));
    }
}
