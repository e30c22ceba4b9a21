//! Core types for the wellness core
//!
//! This module defines the records that flow in from the persistence layer
//! (log rows and profile snapshots) and the results handed back for rendering:
//! calorie estimates, comparison charts, and windowed summaries.

use crate::met::ActivityType;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Self-reported mood on a log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
    /// Anything outside the enumerated moods, including a blank selection
    #[serde(untagged)]
    Other(String),
}

impl Mood {
    pub fn as_str(&self) -> &str {
        match self {
            Mood::Happy => "Happy",
            Mood::Neutral => "Neutral",
            Mood::Sad => "Sad",
            Mood::Other(value) => value.as_str(),
        }
    }

    /// Parse one of the enumerated moods; anything else is `None`
    pub fn from_tracked(value: &str) -> Option<Mood> {
        match value {
            "Happy" => Some(Mood::Happy),
            "Neutral" => Some(Mood::Neutral),
            "Sad" => Some(Mood::Sad),
            _ => None,
        }
    }

    pub fn is_tracked(&self) -> bool {
        !matches!(self, Mood::Other(_))
    }
}

/// Gender options on a user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A single daily wellness log row, as loaded by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Storage key, when the row has been persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Day the entry was recorded
    pub date: NaiveDate,
    /// Time of day the entry was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    /// Water intake (ml)
    #[serde(default)]
    pub water_intake_ml: Option<f64>,
    /// Exercise performed, blank when none
    #[serde(default, deserialize_with = "blank_as_none_activity")]
    pub exercise_type: Option<ActivityType>,
    /// Exercise duration (minutes)
    #[serde(default, alias = "exercise_duration")]
    pub exercise_duration_minutes: Option<u32>,
    /// Sleep duration (hours)
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    /// Mood, possibly outside the tracked set
    #[serde(default)]
    pub mood: Option<Mood>,
    /// Free-text note about the mood
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_note: Option<String>,
}

impl LogRecord {
    /// Create an empty log for the given day
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: None,
            date,
            time: None,
            water_intake_ml: None,
            exercise_type: None,
            exercise_duration_minutes: None,
            sleep_hours: None,
            mood: None,
            mood_note: None,
        }
    }
}

fn blank_as_none_activity<'de, D>(deserializer: D) -> Result<Option<ActivityType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// The slice of a user profile the calorie estimator reads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// Body weight (kg); absent until the user fills in their profile
    pub weight_kg: Option<f64>,
    /// Daily calorie-burn goal (kcal)
    pub calorie_goal_kcal: u32,
}

/// A validated request to estimate calories for one activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieEstimateRequest {
    pub activity_type: ActivityType,
    pub duration_minutes: u32,
}

/// Calories burned by one activity, measured against the daily goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieEstimateResult {
    pub activity_type: ActivityType,
    pub duration_minutes: u32,
    /// Calories burned (kcal), rounded to 2 decimals
    pub calories_kcal: f64,
    pub goal_kcal: u32,
    /// Share of the goal reached, 0 when there is no goal
    pub progress_percent: u32,
}

/// One bar of the activity comparison chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub activity_type: ActivityType,
    pub calories_kcal: f64,
}

/// Estimate plus the same-duration comparison across all activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieBurnReport {
    pub result: CalorieEstimateResult,
    pub chart: Vec<ChartEntry>,
}

/// Per-mood frequency over a window of logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodCounts {
    #[serde(rename = "Happy")]
    pub happy: u32,
    #[serde(rename = "Neutral")]
    pub neutral: u32,
    #[serde(rename = "Sad")]
    pub sad: u32,
}

impl MoodCounts {
    /// Record one occurrence; untracked moods are ignored
    pub fn record(&mut self, mood: &Mood) {
        match mood {
            Mood::Happy => self.happy += 1,
            Mood::Neutral => self.neutral += 1,
            Mood::Sad => self.sad += 1,
            Mood::Other(_) => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.happy + self.neutral + self.sad
    }
}

/// Aggregate statistics over a window of logs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Mean water intake (ml), 2 decimals
    pub avg_water_ml: f64,
    /// Mean sleep (hours), 1 decimal
    pub avg_sleep_hours: f64,
    /// Mean exercise duration (minutes), truncated
    pub avg_exercise_duration_minutes: u32,
    pub mood_counts: MoodCounts,
}

/// Summary window, expressed as a number of most recent logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    Week,
    Month,
}

impl SummaryPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryPeriod::Week => "week",
            SummaryPeriod::Month => "month",
        }
    }

    /// Number of most recent logs covered by the window
    pub fn record_count(&self) -> usize {
        match self {
            SummaryPeriod::Week => 7,
            SummaryPeriod::Month => 30,
        }
    }

    /// Interpret a `period` query value: absent or "week" is a week, anything else a month
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            None | Some("week") => SummaryPeriod::Week,
            Some(_) => SummaryPeriod::Month,
        }
    }
}

impl Default for SummaryPeriod {
    fn default() -> Self {
        SummaryPeriod::Week
    }
}

/// A summary together with the window it was computed over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub period: SummaryPeriod,
    /// Logs actually present in the window (at most the period's count)
    pub record_count: usize,
    pub summary: SummaryResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_log_record_deserialize_blank_fields() {
        let json = r#"{
            "date": "2024-03-01",
            "water_intake_ml": 1500.0,
            "exercise_type": "",
            "exercise_duration": 20,
            "sleep_hours": null,
            "mood": ""
        }"#;

        let log: LogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(log.exercise_type, None);
        assert_eq!(log.exercise_duration_minutes, Some(20));
        assert_eq!(log.sleep_hours, None);
        assert_eq!(log.mood, Some(Mood::Other(String::new())));
    }

    #[test]
    fn test_log_record_unknown_exercise_rejected() {
        let json = r#"{"date": "2024-03-01", "exercise_type": "Rowing"}"#;
        assert!(serde_json::from_str::<LogRecord>(json).is_err());
    }

    #[test]
    fn test_mood_deserialize() {
        let happy: Mood = serde_json::from_str("\"Happy\"").unwrap();
        assert_eq!(happy, Mood::Happy);

        let anxious: Mood = serde_json::from_str("\"Anxious\"").unwrap();
        assert_eq!(anxious, Mood::Other("Anxious".to_string()));
        assert!(!anxious.is_tracked());
    }

    #[test]
    fn test_mood_counts_serialize_with_display_names() {
        let counts = MoodCounts {
            happy: 2,
            neutral: 0,
            sad: 1,
        };
        let value = serde_json::to_value(counts).unwrap();
        assert_eq!(value["Happy"], 2);
        assert_eq!(value["Neutral"], 0);
        assert_eq!(value["Sad"], 1);
    }

    #[test]
    fn test_summary_period_from_query() {
        assert_eq!(SummaryPeriod::from_query(None), SummaryPeriod::Week);
        assert_eq!(SummaryPeriod::from_query(Some("week")), SummaryPeriod::Week);
        assert_eq!(SummaryPeriod::from_query(Some("month")), SummaryPeriod::Month);
        assert_eq!(SummaryPeriod::from_query(Some("year")), SummaryPeriod::Month);
        assert_eq!(SummaryPeriod::Week.record_count(), 7);
        assert_eq!(SummaryPeriod::Month.record_count(), 30);
    }
}
