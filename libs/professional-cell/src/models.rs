use std::collections::HashSet;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessionalAvailability {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub professional_id: Uuid,
    pub day_of_week: i32, // 0 = Sunday, 1 = Monday, etc.
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Wholesale replacement of a professional's weekly schedule. The previous
/// rows are deleted and these windows inserted; an empty list means the
/// professional takes no appointments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceAvailabilityRequest {
    pub organization_id: Uuid,
    pub windows: Vec<AvailabilityWindow>,
}

impl ReplaceAvailabilityRequest {
    /// At most one window per weekday, valid weekday indices, and each
    /// window must start before it ends.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen_days = HashSet::new();

        for window in &self.windows {
            if !(0..=6).contains(&window.day_of_week) {
                return Err(format!(
                    "day_of_week must be between 0 and 6, got {}",
                    window.day_of_week
                ));
            }
            if window.start_time >= window.end_time {
                return Err(format!(
                    "window on day {} must start before it ends",
                    window.day_of_week
                ));
            }
            if !seen_days.insert(window.day_of_week) {
                return Err(format!(
                    "duplicate window for day {}",
                    window.day_of_week
                ));
            }
        }

        Ok(())
    }
}
