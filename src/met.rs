//! Metabolic equivalent table
//!
//! Each supported activity carries a fixed MET coefficient: the energy cost of
//! the activity relative to resting metabolism. The set of activities is closed
//! and the table is total over it.

use crate::error::WellnessError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Activities with a known MET coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    Walking,
    Jogging,
    Running,
    Cycling,
    Swimming,
    Gym,
    Yoga,
}

/// MET coefficients in display order
pub const MET_TABLE: [(ActivityType, f64); 7] = [
    (ActivityType::Walking, ActivityType::Walking.met()),
    (ActivityType::Jogging, ActivityType::Jogging.met()),
    (ActivityType::Running, ActivityType::Running.met()),
    (ActivityType::Cycling, ActivityType::Cycling.met()),
    (ActivityType::Swimming, ActivityType::Swimming.met()),
    (ActivityType::Gym, ActivityType::Gym.met()),
    (ActivityType::Yoga, ActivityType::Yoga.met()),
];

impl ActivityType {
    /// All activities, in table order
    pub const ALL: [ActivityType; 7] = [
        ActivityType::Walking,
        ActivityType::Jogging,
        ActivityType::Running,
        ActivityType::Cycling,
        ActivityType::Swimming,
        ActivityType::Gym,
        ActivityType::Yoga,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Walking => "Walking",
            ActivityType::Jogging => "Jogging",
            ActivityType::Running => "Running",
            ActivityType::Cycling => "Cycling",
            ActivityType::Swimming => "Swimming",
            ActivityType::Gym => "Gym",
            ActivityType::Yoga => "Yoga",
        }
    }

    /// MET coefficient for this activity
    pub const fn met(&self) -> f64 {
        match self {
            ActivityType::Walking => 3.5,
            ActivityType::Jogging => 7.0,
            ActivityType::Running => 9.8,
            ActivityType::Cycling => 6.0,
            ActivityType::Swimming => 8.0,
            ActivityType::Gym => 5.0,
            ActivityType::Yoga => 2.5,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = WellnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityType::ALL
            .into_iter()
            .find(|activity| activity.as_str() == s)
            .ok_or_else(|| WellnessError::UnknownActivity(s.to_string()))
    }
}

/// Look up the MET coefficient for an activity name
pub fn lookup_met(name: &str) -> Result<f64, WellnessError> {
    name.parse::<ActivityType>().map(|activity| activity.met())
}
