//! User profile
//!
//! The profile holds the personal details the estimator depends on (weight and
//! the daily burn goal) along with display details and the daily reminder time.

use crate::types::{Gender, ProfileSnapshot};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Daily calorie-burn goal for a fresh profile (kcal)
pub const DEFAULT_CALORIE_GOAL: u32 = 300;

fn default_calorie_goal() -> u32 {
    DEFAULT_CALORIE_GOAL
}

fn default_reminder_hour() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Body weight (kg)
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Daily calorie-burn goal (kcal)
    #[serde(default = "default_calorie_goal", alias = "calorie_goal_kcal")]
    pub calorie_goal: u32,
    /// Time of day for the logging reminder
    #[serde(default = "default_reminder_hour")]
    pub reminder_hour: NaiveTime,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            gender: None,
            date_of_birth: None,
            weight_kg: None,
            calorie_goal: DEFAULT_CALORIE_GOAL,
            reminder_hour: default_reminder_hour(),
        }
    }
}

impl UserProfile {
    /// Age in whole years on `today`, if the date of birth is known
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let born = self.date_of_birth?;
        let mut years = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    /// Weight usable for calorie estimation
    pub fn usable_weight(&self) -> Option<f64> {
        self.weight_kg.filter(|w| w.is_finite() && *w > 0.0)
    }

    /// The read-only slice the calorie estimator consumes
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            weight_kg: self.usable_weight(),
            calorie_goal_kcal: self.calorie_goal,
        }
    }

    /// Load a profile from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the profile to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
