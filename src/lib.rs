//! Wellness Core - calorie estimation and log aggregation for a wellness tracker
//!
//! The core sits behind a web shell that handles accounts, storage and
//! rendering. It receives validated profile data and log rows and hands back
//! plain report values:
//!
//! - **Calorie burn**: MET table → calorie estimate and goal progress →
//!   same-duration comparison across every activity
//! - **Summaries**: most recent 7 or 30 logs → averages and mood counts
//! - **History**: newest-first ordering, date search and pagination

pub mod calories;
pub mod chart;
pub mod encoder;
pub mod error;
pub mod history;
pub mod met;
pub mod pipeline;
pub mod profile;
pub mod schema;
pub mod summary;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use calories::{estimate, estimate_activity, progress_percent};
pub use chart::build_chart;
pub use error::WellnessError;
pub use met::{lookup_met, ActivityType, MET_TABLE};
pub use pipeline::{calorie_burn, calorie_burn_to_json, summary_to_json, WellnessProcessor};
pub use profile::UserProfile;
pub use summary::{select_window, summarize, summary_report};

// Schema exports
pub use schema::{CalorieBurnForm, LogEntryForm, LogRecordAdapter, ValidationError};

/// Core version embedded in all report envelopes
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report envelopes
pub const PRODUCER_NAME: &str = "wellness-core";
