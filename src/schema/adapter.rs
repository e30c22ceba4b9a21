//! Bulk parsing of log histories
//!
//! Log histories reach the core as a JSON array or as NDJSON (one record per
//! line), typically exported by the persistence layer.

use crate::error::WellnessError;
use crate::schema::forms::ValidationError;
use crate::types::LogRecord;

/// Adapter for reading log records from JSON payloads
pub struct LogRecordAdapter;

impl LogRecordAdapter {
    /// Parse a JSON string containing an array of log records
    pub fn parse_array(json: &str) -> Result<Vec<LogRecord>, WellnessError> {
        let records: Vec<LogRecord> = serde_json::from_str(json)?;
        Ok(records)
    }

    /// Parse NDJSON (newline-delimited JSON) containing log records
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<LogRecord>, WellnessError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<LogRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(WellnessError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Parse either format, deciding by the first non-blank character
    pub fn parse_auto(input: &str) -> Result<Vec<LogRecord>, WellnessError> {
        if input.trim_start().starts_with('[') {
            Self::parse_array(input)
        } else {
            Self::parse_ndjson(input)
        }
    }

    /// Validate a batch of records, returning only the failures
    pub fn validate_records(records: &[LogRecord]) -> Vec<ValidationResult> {
        records
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                record.validate().err().map(|error| ValidationResult {
                    index: idx,
                    record_id: record.id,
                    error,
                })
            })
            .collect()
    }
}

/// A record that failed validation
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub record_id: Option<i64>,
    pub error: ValidationError,
}
