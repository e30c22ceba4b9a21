//! Form input validation
//!
//! Raw form submissions arrive loosely typed: blank selections, free-text
//! activity and mood names, signed integers. This module turns them into the
//! typed requests and records the rest of the crate works with, rejecting
//! anything the forms would not accept.

use crate::met::ActivityType;
use crate::types::{CalorieEstimateRequest, LogRecord, Mood};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Raw wellness log submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogEntryForm {
    #[serde(default)]
    pub water_intake_ml: Option<f64>,
    #[serde(default)]
    pub exercise_type: Option<String>,
    #[serde(default)]
    pub exercise_duration: Option<i64>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub mood_note: Option<String>,
}

/// A validated log submission, not yet stamped with a date
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub water_intake_ml: Option<f64>,
    pub exercise_type: Option<ActivityType>,
    pub exercise_duration_minutes: Option<u32>,
    pub sleep_hours: Option<f64>,
    pub mood: Option<Mood>,
    pub mood_note: String,
}

impl LogEntryForm {
    /// Validate the submission
    pub fn validate(&self) -> Result<LogEntry, ValidationError> {
        let water_intake_ml = match self.water_intake_ml {
            Some(ml) if !ml.is_finite() => {
                return Err(ValidationError::InvalidNumber {
                    field: "water_intake_ml".to_string(),
                    value: ml.to_string(),
                })
            }
            Some(ml) if ml < 0.0 => return Err(ValidationError::NegativeWaterIntake(ml)),
            other => other,
        };

        let exercise_type = match non_blank(self.exercise_type.as_deref()) {
            Some(name) => Some(
                name.parse::<ActivityType>()
                    .map_err(|_| ValidationError::UnknownActivity(name.to_string()))?,
            ),
            None => None,
        };

        let exercise_duration_minutes = match self.exercise_duration {
            Some(minutes) => Some(u32::try_from(minutes).map_err(|_| {
                ValidationError::OutOfRange {
                    field: "exercise_duration".to_string(),
                    minimum: 0,
                    actual: minutes,
                }
            })?),
            None => None,
        };

        let sleep_hours = match self.sleep_hours {
            Some(hours) if !hours.is_finite() => {
                return Err(ValidationError::InvalidNumber {
                    field: "sleep_hours".to_string(),
                    value: hours.to_string(),
                })
            }
            other => other,
        };

        let mood = match non_blank(self.mood.as_deref()) {
            Some(name) => Some(
                Mood::from_tracked(name)
                    .ok_or_else(|| ValidationError::UnknownMood(name.to_string()))?,
            ),
            None => None,
        };

        Ok(LogEntry {
            water_intake_ml,
            exercise_type,
            exercise_duration_minutes,
            sleep_hours,
            mood,
            mood_note: self.mood_note.clone().unwrap_or_default(),
        })
    }
}

impl LogEntry {
    /// Create a new log record for the given day
    pub fn into_record(self, date: NaiveDate, time: Option<NaiveTime>) -> LogRecord {
        let mut record = LogRecord::new(date);
        record.time = time;
        self.apply_to(&mut record);
        record
    }

    /// Overwrite the editable fields of an existing record
    pub fn apply_to(self, record: &mut LogRecord) {
        record.water_intake_ml = self.water_intake_ml;
        record.exercise_type = self.exercise_type;
        record.exercise_duration_minutes = self.exercise_duration_minutes;
        record.sleep_hours = self.sleep_hours;
        record.mood = self.mood;
        record.mood_note = if self.mood_note.is_empty() {
            None
        } else {
            Some(self.mood_note)
        };
    }
}

/// Raw calorie-burn submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieBurnForm {
    pub exercise_type: String,
    pub duration: i64,
}

impl CalorieBurnForm {
    /// Validate the submission into an estimate request
    pub fn validate(&self) -> Result<CalorieEstimateRequest, ValidationError> {
        let name = self.exercise_type.trim();
        let activity_type = name
            .parse::<ActivityType>()
            .map_err(|_| ValidationError::UnknownActivity(name.to_string()))?;

        if self.duration < 1 {
            return Err(ValidationError::OutOfRange {
                field: "duration".to_string(),
                minimum: 1,
                actual: self.duration,
            });
        }
        let duration_minutes =
            u32::try_from(self.duration).map_err(|_| ValidationError::InvalidNumber {
                field: "duration".to_string(),
                value: self.duration.to_string(),
            })?;

        Ok(CalorieEstimateRequest {
            activity_type,
            duration_minutes,
        })
    }
}

impl LogRecord {
    /// Check values of a record loaded from storage or an import file
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ml) = self.water_intake_ml {
            if !ml.is_finite() {
                return Err(ValidationError::InvalidNumber {
                    field: "water_intake_ml".to_string(),
                    value: ml.to_string(),
                });
            }
            if ml < 0.0 {
                return Err(ValidationError::NegativeWaterIntake(ml));
            }
        }

        if let Some(hours) = self.sleep_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(ValidationError::InvalidNumber {
                    field: "sleep_hours".to_string(),
                    value: hours.to_string(),
                });
            }
        }

        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validation errors for form input and log records
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Water intake must be a positive number (got {0})")]
    NegativeWaterIntake(f64),

    #[error("Select a valid choice. {0} is not one of the available activities")]
    UnknownActivity(String),

    #[error("Select a valid choice. {0} is not one of the available moods")]
    UnknownMood(String),

    #[error("{field} must be greater than or equal to {minimum}, got {actual}")]
    OutOfRange {
        field: String,
        minimum: i64,
        actual: i64,
    },

    #[error("{field} is not a valid number: {value}")]
    InvalidNumber { field: String, value: String },
}
