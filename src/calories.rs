//! Calorie estimation
//!
//! Calories are estimated from the activity's MET coefficient, body weight and
//! duration: `kcal = MET * weight_kg * hours`. Progress is the share of the
//! user's daily burn goal that one activity covers.

use crate::error::WellnessError;
use crate::types::{CalorieEstimateRequest, CalorieEstimateResult, ProfileSnapshot};

/// Round to a fixed number of decimals, halves to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Estimate calories burned (kcal, 2 decimals)
pub fn estimate(
    weight_kg: f64,
    coefficient: f64,
    duration_minutes: u32,
) -> Result<f64, WellnessError> {
    unrounded_estimate(weight_kg, coefficient, duration_minutes).map(|kcal| round_to(kcal, 2))
}

fn unrounded_estimate(
    weight_kg: f64,
    coefficient: f64,
    duration_minutes: u32,
) -> Result<f64, WellnessError> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(WellnessError::InvalidInput(format!(
            "weight must be positive, got {weight_kg}"
        )));
    }
    if !coefficient.is_finite() || coefficient <= 0.0 {
        return Err(WellnessError::InvalidInput(format!(
            "MET coefficient must be positive, got {coefficient}"
        )));
    }
    if duration_minutes < 1 {
        return Err(WellnessError::InvalidInput(
            "duration must be at least one minute".to_string(),
        ));
    }

    let hours = f64::from(duration_minutes) / 60.0;
    let kcal = coefficient * weight_kg * hours;
    if !kcal.is_finite() {
        return Err(WellnessError::InvalidInput(format!(
            "calorie estimate overflows for weight {weight_kg} and {duration_minutes} min"
        )));
    }
    Ok(kcal)
}

/// Percentage of the goal reached, rounded; 0 when there is no goal
pub fn progress_percent(calories_kcal: f64, goal_kcal: u32) -> u32 {
    if goal_kcal == 0 {
        return 0;
    }
    let percent = (calories_kcal / f64::from(goal_kcal) * 100.0).round_ties_even();
    // saturating cast; negative calories never reach here from `estimate`
    percent.max(0.0) as u32
}

/// Estimate an activity for a user profile
///
/// Fails with `WeightRequired` when the profile has no usable weight. Progress
/// is taken from the unrounded estimate; only the reported calories are rounded.
pub fn estimate_activity(
    profile: &ProfileSnapshot,
    request: &CalorieEstimateRequest,
) -> Result<CalorieEstimateResult, WellnessError> {
    let weight_kg = match profile.weight_kg {
        Some(weight) if weight > 0.0 => weight,
        _ => return Err(WellnessError::WeightRequired),
    };

    let unrounded = unrounded_estimate(
        weight_kg,
        request.activity_type.met(),
        request.duration_minutes,
    )?;
    let calories_kcal = round_to(unrounded, 2);

    log::debug!(
        "estimated {} kcal for {} min of {}",
        calories_kcal,
        request.duration_minutes,
        request.activity_type
    );

    Ok(CalorieEstimateResult {
        activity_type: request.activity_type,
        duration_minutes: request.duration_minutes,
        calories_kcal,
        goal_kcal: profile.calorie_goal_kcal,
        progress_percent: progress_percent(unrounded, profile.calorie_goal_kcal),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::met::{ActivityType, MET_TABLE};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_walking_one_hour() {
        // 3.5 * 70 * 1h
        assert_eq!(estimate(70.0, 3.5, 60).unwrap(), 245.0);
    }

    #[test]
    fn test_estimate_rounds_to_two_decimals() {
        // 9.8 * 63.3 * 17/60 = 175.7602...
        assert_eq!(estimate(63.3, 9.8, 17).unwrap(), 175.76);
    }

    #[test]
    fn test_estimate_monotonic_in_duration() {
        for (_, met) in MET_TABLE {
            let mut previous = 0.0;
            for minutes in 1..=240 {
                let calories = estimate(72.5, met, minutes).unwrap();
                assert!(calories >= previous);
                previous = calories;
            }
        }
    }

    #[test]
    fn test_estimate_monotonic_in_weight() {
        for (_, met) in MET_TABLE {
            let mut previous = 0.0;
            for tenth in 1..=1500 {
                let weight = f64::from(tenth) / 10.0;
                let calories = estimate(weight, met, 45).unwrap();
                assert!(calories >= previous);
                previous = calories;
            }
        }
    }

    #[test]
    fn test_estimate_rejects_bad_input() {
        assert!(matches!(
            estimate(0.0, 3.5, 30),
            Err(WellnessError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate(-70.0, 3.5, 30),
            Err(WellnessError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate(f64::NAN, 3.5, 30),
            Err(WellnessError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate(70.0, 0.0, 30),
            Err(WellnessError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate(70.0, 3.5, 0),
            Err(WellnessError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_estimate_rejects_overflowing_product() {
        assert!(matches!(
            estimate(1e308, 9.8, 60),
            Err(WellnessError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate(f64::MAX, 2.5, u32::MAX),
            Err(WellnessError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(245.0, 0), 0);
        assert_eq!(progress_percent(300.0, 300), 100);
        assert_eq!(progress_percent(150.0, 300), 50);
        assert_eq!(progress_percent(600.0, 300), 200);
    }

    #[test]
    fn test_progress_percent_rounds_halves_to_even() {
        // 1.25 / 2 * 100 = 62.5
        assert_eq!(progress_percent(1.25, 2), 62);
        // 1.27 / 2 * 100 = 63.5
        assert_eq!(progress_percent(1.27, 2), 64);
    }

    #[test]
    fn test_estimate_activity() {
        let profile = ProfileSnapshot {
            weight_kg: Some(70.0),
            calorie_goal_kcal: 300,
        };
        let request = CalorieEstimateRequest {
            activity_type: ActivityType::Walking,
            duration_minutes: 60,
        };

        let result = estimate_activity(&profile, &request).unwrap();
        assert_eq!(
            result,
            CalorieEstimateResult {
                activity_type: ActivityType::Walking,
                duration_minutes: 60,
                calories_kcal: 245.0,
                goal_kcal: 300,
                progress_percent: 82,
            }
        );
    }

    #[test]
    fn test_progress_uses_unrounded_calories() {
        // 3.5 * 70.3 / 60 = 4.10083.. kcal, 0.50010..% of 820; rounded kcal would give 0.5%
        let profile = ProfileSnapshot {
            weight_kg: Some(70.3),
            calorie_goal_kcal: 820,
        };
        let request = CalorieEstimateRequest {
            activity_type: ActivityType::Walking,
            duration_minutes: 1,
        };

        let result = estimate_activity(&profile, &request).unwrap();
        assert_eq!(result.calories_kcal, 4.1);
        assert_eq!(result.progress_percent, 1);
    }

    #[test]
    fn test_estimate_activity_overflow_is_invalid_input() {
        let profile = ProfileSnapshot {
            weight_kg: Some(1e308),
            calorie_goal_kcal: 300,
        };
        let request = CalorieEstimateRequest {
            activity_type: ActivityType::Running,
            duration_minutes: 60,
        };

        assert!(matches!(
            estimate_activity(&profile, &request),
            Err(WellnessError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_estimate_activity_with_zero_goal() {
        let profile = ProfileSnapshot {
            weight_kg: Some(80.0),
            calorie_goal_kcal: 0,
        };
        let request = CalorieEstimateRequest {
            activity_type: ActivityType::Running,
            duration_minutes: 30,
        };

        let result = estimate_activity(&profile, &request).unwrap();
        assert_eq!(result.calories_kcal, 392.0);
        assert_eq!(result.progress_percent, 0);
    }

    #[test]
    fn test_estimate_activity_requires_weight() {
        let request = CalorieEstimateRequest {
            activity_type: ActivityType::Yoga,
            duration_minutes: 30,
        };

        for weight_kg in [None, Some(0.0), Some(-5.0)] {
            let profile = ProfileSnapshot {
                weight_kg,
                calorie_goal_kcal: 300,
            };
            assert!(matches!(
                estimate_activity(&profile, &request),
                Err(WellnessError::WeightRequired)
            ));
        }
    }
}
