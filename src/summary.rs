//! Windowed summary statistics
//!
//! Averages and mood frequencies over the most recent logs of a user. Missing
//! values are skipped rather than counted as zero, and an empty window yields
//! an all-zero summary.

use crate::calories::round_to;
use crate::types::{LogRecord, MoodCounts, SummaryPeriod, SummaryReport, SummaryResult};
use std::cmp::Ordering;

/// Summarize a sequence of logs
pub fn summarize<'a, I>(logs: I) -> SummaryResult
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut water = RunningMean::default();
    let mut sleep = RunningMean::default();
    let mut exercise = RunningMean::default();
    let mut mood_counts = MoodCounts::default();

    for log in logs {
        if let Some(ml) = log.water_intake_ml {
            water.push(ml);
        }
        if let Some(hours) = log.sleep_hours {
            sleep.push(hours);
        }
        if let Some(minutes) = log.exercise_duration_minutes {
            exercise.push(f64::from(minutes));
        }
        if let Some(mood) = &log.mood {
            mood_counts.record(mood);
        }
    }

    SummaryResult {
        avg_water_ml: round_to(water.mean(), 2),
        avg_sleep_hours: round_to(sleep.mean(), 1),
        // durations are never negative, so truncation is a floor
        avg_exercise_duration_minutes: exercise.mean().trunc() as u32,
        mood_counts,
    }
}

/// Pick the most recent logs for a period, newest first
pub fn select_window(logs: &[LogRecord], period: SummaryPeriod) -> Vec<&LogRecord> {
    let mut ordered: Vec<&LogRecord> = logs.iter().collect();
    ordered.sort_by(|a, b| newest_first(a, b));
    ordered.truncate(period.record_count());
    ordered
}

/// Select the window for `period` and summarize it
pub fn summary_report(logs: &[LogRecord], period: SummaryPeriod) -> SummaryReport {
    let window = select_window(logs, period);
    log::debug!(
        "summarizing {} of {} logs for {} window",
        window.len(),
        logs.len(),
        period.as_str()
    );

    SummaryReport {
        period,
        record_count: window.len(),
        summary: summarize(window),
    }
}

/// Date descending, then time descending; logs without a time sort last within a day
pub(crate) fn newest_first(a: &LogRecord, b: &LogRecord) -> Ordering {
    b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time))
}

#[derive(Default)]
struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mood;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn make_log(d: u32, water: Option<f64>, sleep: Option<f64>, exercise: Option<u32>) -> LogRecord {
        LogRecord {
            water_intake_ml: water,
            sleep_hours: sleep,
            exercise_duration_minutes: exercise,
            ..LogRecord::new(day(d))
        }
    }

    fn with_mood(mut log: LogRecord, mood: Mood) -> LogRecord {
        log.mood = Some(mood);
        log
    }

    #[test]
    fn test_empty_summary() {
        let logs: Vec<LogRecord> = Vec::new();
        let summary = summarize(&logs);
        assert_eq!(
            summary,
            SummaryResult {
                avg_water_ml: 0.0,
                avg_sleep_hours: 0.0,
                avg_exercise_duration_minutes: 0,
                mood_counts: MoodCounts {
                    happy: 0,
                    neutral: 0,
                    sad: 0
                },
            }
        );
    }

    #[test]
    fn test_averages_skip_missing_values() {
        let logs = vec![
            make_log(1, Some(1000.0), Some(7.0), Some(30)),
            make_log(2, None, Some(8.0), None),
            make_log(3, Some(2000.0), None, Some(45)),
        ];

        let summary = summarize(&logs);
        assert_eq!(summary.avg_water_ml, 1500.0);
        assert_eq!(summary.avg_sleep_hours, 7.5);
        // (30 + 45) / 2 = 37.5, truncated
        assert_eq!(summary.avg_exercise_duration_minutes, 37);
    }

    #[test]
    fn test_rounding() {
        let logs = vec![
            make_log(1, Some(1000.0), Some(7.0), Some(10)),
            make_log(2, Some(1000.0), Some(6.0), Some(10)),
            make_log(3, Some(1001.0), Some(6.0), Some(11)),
        ];

        let summary = summarize(&logs);
        // 3001 / 3 = 1000.333...
        assert_eq!(summary.avg_water_ml, 1000.33);
        // 19 / 3 = 6.333...
        assert_eq!(summary.avg_sleep_hours, 6.3);
        // 31 / 3 = 10.33
        assert_eq!(summary.avg_exercise_duration_minutes, 10);
    }

    #[test]
    fn test_mood_counts() {
        let logs = vec![
            with_mood(make_log(1, None, None, None), Mood::Happy),
            with_mood(make_log(2, None, None, None), Mood::Happy),
            with_mood(make_log(3, None, None, None), Mood::Sad),
        ];

        let summary = summarize(&logs);
        assert_eq!(
            summary.mood_counts,
            MoodCounts {
                happy: 2,
                neutral: 0,
                sad: 1
            }
        );
    }

    #[test]
    fn test_untracked_moods_ignored() {
        let logs = vec![
            with_mood(make_log(1, None, None, None), Mood::Neutral),
            with_mood(make_log(2, None, None, None), Mood::Other(String::new())),
            with_mood(make_log(3, None, None, None), Mood::Other("Anxious".into())),
            make_log(4, None, None, None),
        ];

        let summary = summarize(&logs);
        assert_eq!(summary.mood_counts.neutral, 1);
        assert_eq!(summary.mood_counts.total(), 1);
    }

    #[test]
    fn test_select_window_takes_most_recent() {
        let logs: Vec<LogRecord> = (1..=10)
            .map(|d| make_log(d, Some(f64::from(d)), None, None))
            .collect();

        let window = select_window(&logs, SummaryPeriod::Week);
        let days: Vec<NaiveDate> = window.iter().map(|l| l.date).collect();
        assert_eq!(days, (4..=10).rev().map(day).collect::<Vec<_>>());

        let window = select_window(&logs, SummaryPeriod::Month);
        assert_eq!(window.len(), 10);
    }

    #[test]
    fn test_select_window_breaks_ties_by_time() {
        let mut morning = make_log(5, Some(1.0), None, None);
        morning.time = NaiveTime::from_hms_opt(8, 0, 0);
        let mut evening = make_log(5, Some(2.0), None, None);
        evening.time = NaiveTime::from_hms_opt(20, 0, 0);

        let logs = vec![morning, evening];
        let window = select_window(&logs, SummaryPeriod::Week);
        assert_eq!(window[0].water_intake_ml, Some(2.0));
    }

    #[test]
    fn test_summary_report() {
        let logs: Vec<LogRecord> = (1..=10)
            .map(|d| make_log(d, Some(f64::from(d) * 100.0), None, None))
            .collect();

        let report = summary_report(&logs, SummaryPeriod::Week);
        assert_eq!(report.record_count, 7);
        // days 4..=10 -> mean 700
        assert_eq!(report.summary.avg_water_ml, 700.0);

        let report = summary_report(&logs, SummaryPeriod::Month);
        assert_eq!(report.record_count, 10);
        assert_eq!(report.summary.avg_water_ml, 550.0);
    }
}
