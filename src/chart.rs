//! Activity comparison chart
//!
//! Re-runs the calorie estimate for every tabled activity at the same weight
//! and duration, so a user can see what the same time would burn elsewhere.

use crate::calories::estimate;
use crate::error::WellnessError;
use crate::met::MET_TABLE;
use crate::types::ChartEntry;

/// Build one chart entry per activity, in table order
pub fn build_chart(weight_kg: f64, duration_minutes: u32) -> Result<Vec<ChartEntry>, WellnessError> {
    MET_TABLE
        .iter()
        .map(|&(activity_type, met)| {
            Ok(ChartEntry {
                activity_type,
                calories_kcal: estimate(weight_kg, met, duration_minutes)?,
            })
        })
        .collect()
}
