//! Report encoding
//!
//! Wraps results in a versioned envelope with producer metadata so the
//! rendering layer can tell which build computed a report, and when.

use crate::error::WellnessError;
use crate::{CORE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current envelope schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// What a report envelope carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    CalorieBurn,
    Summary,
    Dashboard,
    Activities,
}

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// A report wrapped for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope<T> {
    pub report_version: String,
    pub kind: ReportKind,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub report: T,
}

/// Encoder stamping reports with producer metadata
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap a report in an envelope
    pub fn encode<T>(&self, kind: ReportKind, report: T) -> ReportEnvelope<T> {
        ReportEnvelope {
            report_version: REPORT_VERSION.to_string(),
            kind,
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: CORE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            report,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json<T: Serialize>(
        &self,
        kind: ReportKind,
        report: &T,
    ) -> Result<String, WellnessError> {
        let envelope = self.encode(kind, report);
        serde_json::to_string_pretty(&envelope)
            .map_err(|e| WellnessError::EncodingError(e.to_string()))
    }
}
