//! Request orchestration
//!
//! This module provides the public API the web layer calls. Stateless
//! functions take JSON in and give enveloped JSON back; `WellnessProcessor`
//! keeps one user's profile and log history between calls.

use crate::calories::estimate_activity;
use crate::chart::build_chart;
use crate::encoder::{ReportEncoder, ReportKind};
use crate::error::WellnessError;
use crate::history::{dashboard, DashboardView, Paginator};
use crate::profile::UserProfile;
use crate::schema::{CalorieBurnForm, LogEntry, LogRecordAdapter};
use crate::summary::summary_report;
use crate::types::{
    CalorieBurnReport, CalorieEstimateRequest, LogRecord, ProfileSnapshot, SummaryPeriod,
    SummaryReport,
};

/// Estimate calories for one activity and build the comparison chart
pub fn calorie_burn(
    profile: &ProfileSnapshot,
    request: &CalorieEstimateRequest,
) -> Result<CalorieBurnReport, WellnessError> {
    let result = estimate_activity(profile, request)?;
    // estimate_activity already rejected a missing weight
    let weight_kg = profile.weight_kg.ok_or(WellnessError::WeightRequired)?;
    let chart = build_chart(weight_kg, request.duration_minutes)?;

    Ok(CalorieBurnReport { result, chart })
}

/// Convert a profile JSON and a raw calorie-burn form JSON into a report.
///
/// # Arguments
/// * `profile_json` - User profile (weight, calorie goal, ...)
/// * `form_json` - `{"exercise_type": "...", "duration": N}`
///
/// # Returns
/// Enveloped `CalorieBurnReport` JSON
///
/// # Example
/// ```ignore
/// let report = calorie_burn_to_json(
///     r#"{"weight_kg": 70.0, "calorie_goal": 300}"#.to_string(),
///     r#"{"exercise_type": "Walking", "duration": 60}"#.to_string(),
/// )?;
/// ```
pub fn calorie_burn_to_json(
    profile_json: String,
    form_json: String,
) -> Result<String, WellnessError> {
    let profile = UserProfile::from_json(&profile_json)?;
    let form: CalorieBurnForm = serde_json::from_str(&form_json)?;
    let request = form.validate()?;

    let report = calorie_burn(&profile.snapshot(), &request)?;
    ReportEncoder::new().encode_to_json(ReportKind::CalorieBurn, &report)
}

/// Summarize a log history (JSON array or NDJSON) for a period query.
///
/// `period` follows the query semantics of [`SummaryPeriod::from_query`]:
/// "week" selects 7 logs, anything else 30.
pub fn summary_to_json(logs_json: String, period: String) -> Result<String, WellnessError> {
    let logs = LogRecordAdapter::parse_auto(&logs_json)?;
    let period = SummaryPeriod::from_query(Some(period.as_str()));

    let report = summary_report(&logs, period);
    ReportEncoder::new().encode_to_json(ReportKind::Summary, &report)
}

/// Stateful processor for one user's profile and log history.
///
/// Use this when a caller keeps the processor alive across requests, or
/// loads both profile and history once and renders several views.
pub struct WellnessProcessor {
    profile: UserProfile,
    logs: Vec<LogRecord>,
    paginator: Paginator,
    encoder: ReportEncoder,
}

impl Default for WellnessProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl WellnessProcessor {
    /// Create a new processor with an empty history and default profile
    pub fn new() -> Self {
        Self {
            profile: UserProfile::default(),
            logs: Vec::new(),
            paginator: Paginator::default(),
            encoder: ReportEncoder::new(),
        }
    }

    /// Create a processor with a specific history page size
    pub fn with_page_size(per_page: usize) -> Self {
        Self {
            paginator: Paginator::new(per_page),
            ..Self::new()
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
    }

    pub fn logs(&self) -> &[LogRecord] {
        &self.logs
    }

    /// Load profile from JSON
    pub fn load_profile(&mut self, json: &str) -> Result<(), WellnessError> {
        self.profile =
            UserProfile::from_json(json).map_err(|e| WellnessError::ParseError(e.to_string()))?;
        Ok(())
    }

    /// Save profile to JSON
    pub fn save_profile(&self) -> Result<String, WellnessError> {
        self.profile
            .to_json()
            .map_err(|e| WellnessError::EncodingError(e.to_string()))
    }

    /// Replace the log history from a JSON array or NDJSON payload
    pub fn load_logs(&mut self, input: &str) -> Result<usize, WellnessError> {
        let logs = LogRecordAdapter::parse_auto(input)?;
        let invalid = LogRecordAdapter::validate_records(&logs);
        if let Some(first) = invalid.into_iter().next() {
            return Err(WellnessError::ParseError(format!(
                "log at index {} is invalid: {}",
                first.index, first.error
            )));
        }

        log::info!("loaded {} logs", logs.len());
        self.logs = logs;
        Ok(self.logs.len())
    }

    /// Save the log history as a JSON array
    pub fn save_logs(&self) -> Result<String, WellnessError> {
        serde_json::to_string(&self.logs).map_err(|e| WellnessError::EncodingError(e.to_string()))
    }

    /// Append a log record, assigning the next free id when it has none
    ///
    /// Ids are unique within a processor; a record reusing one is rejected.
    pub fn add_log(&mut self, mut record: LogRecord) -> Result<i64, WellnessError> {
        record.validate()?;
        let id = match record.id {
            Some(id) if self.logs.iter().any(|l| l.id == Some(id)) => {
                return Err(WellnessError::InvalidInput(format!(
                    "a log with id {id} already exists"
                )));
            }
            Some(id) => id,
            None => self
                .logs
                .iter()
                .filter_map(|l| l.id)
                .max()
                .unwrap_or(0)
                .checked_add(1)
                .ok_or_else(|| WellnessError::InvalidInput("log ids exhausted".to_string()))?,
        };
        record.id = Some(id);
        self.logs.push(record);
        Ok(id)
    }

    /// Overwrite the editable fields of the log with `id`
    pub fn update_log(&mut self, id: i64, entry: LogEntry) -> Result<(), WellnessError> {
        let record = self
            .logs
            .iter_mut()
            .find(|l| l.id == Some(id))
            .ok_or_else(|| WellnessError::InvalidInput(format!("no log with id {id}")))?;
        entry.apply_to(record);
        Ok(())
    }

    /// Remove the log with `id`, returning it
    pub fn delete_log(&mut self, id: i64) -> Result<LogRecord, WellnessError> {
        let index = self
            .logs
            .iter()
            .position(|l| l.id == Some(id))
            .ok_or_else(|| WellnessError::InvalidInput(format!("no log with id {id}")))?;
        Ok(self.logs.remove(index))
    }

    /// Estimate a validated request against the current profile
    pub fn calorie_burn(
        &self,
        request: &CalorieEstimateRequest,
    ) -> Result<CalorieBurnReport, WellnessError> {
        calorie_burn(&self.profile.snapshot(), request)
    }

    /// Summary over the most recent logs for `period`
    pub fn summary(&self, period: SummaryPeriod) -> SummaryReport {
        summary_report(&self.logs, period)
    }

    /// History page for a raw page query and optional date search
    pub fn dashboard(&self, page: Option<&str>, search_date: Option<&str>) -> DashboardView {
        dashboard(&self.logs, &self.paginator, page, search_date)
    }

    /// Validate a raw calorie-burn form and return the enveloped report JSON
    pub fn calorie_burn_json(&self, form: &CalorieBurnForm) -> Result<String, WellnessError> {
        let request = form.validate()?;
        let report = self.calorie_burn(&request)?;
        self.encoder
            .encode_to_json(ReportKind::CalorieBurn, &report)
    }

    pub fn summary_json(&self, period: SummaryPeriod) -> Result<String, WellnessError> {
        self.encoder
            .encode_to_json(ReportKind::Summary, &self.summary(period))
    }

    pub fn dashboard_json(
        &self,
        page: Option<&str>,
        search_date: Option<&str>,
    ) -> Result<String, WellnessError> {
        self.encoder
            .encode_to_json(ReportKind::Dashboard, &self.dashboard(page, search_date))
    }
}
