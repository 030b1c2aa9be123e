use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationHours {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub timezone: String,
    pub sunday_open: Option<NaiveTime>,
    pub sunday_close: Option<NaiveTime>,
    pub monday_open: Option<NaiveTime>,
    pub monday_close: Option<NaiveTime>,
    pub tuesday_open: Option<NaiveTime>,
    pub tuesday_close: Option<NaiveTime>,
    pub wednesday_open: Option<NaiveTime>,
    pub wednesday_close: Option<NaiveTime>,
    pub thursday_open: Option<NaiveTime>,
    pub thursday_close: Option<NaiveTime>,
    pub friday_open: Option<NaiveTime>,
    pub friday_close: Option<NaiveTime>,
    pub saturday_open: Option<NaiveTime>,
    pub saturday_close: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrganizationHours {
    /// Open/close pair for a weekday (0 = Sunday, 1 = Monday, etc.).
    /// `None` means the organization does not open that day.
    pub fn window_for(&self, day_of_week: i32) -> Option<(NaiveTime, NaiveTime)> {
        let (open, close) = match day_of_week {
            0 => (self.sunday_open, self.sunday_close),
            1 => (self.monday_open, self.monday_close),
            2 => (self.tuesday_open, self.tuesday_close),
            3 => (self.wednesday_open, self.wednesday_close),
            4 => (self.thursday_open, self.thursday_close),
            5 => (self.friday_open, self.friday_close),
            6 => (self.saturday_open, self.saturday_close),
            _ => (None, None),
        };

        match (open, close) {
            (Some(open), Some(close)) => Some((open, close)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotConfig {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub interval_minutes: i32,
    pub buffer_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Effective slot generation settings after defaults are applied.
/// An organization without a stored config gets 30-minute intervals
/// and no buffer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlotSettings {
    pub interval_minutes: i32,
    pub buffer_minutes: i32,
}

impl Default for SlotSettings {
    fn default() -> Self {
        Self {
            interval_minutes: 30,
            buffer_minutes: 0,
        }
    }
}

impl From<&SlotConfig> for SlotSettings {
    fn from(config: &SlotConfig) -> Self {
        Self {
            interval_minutes: config.interval_minutes,
            buffer_minutes: config.buffer_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateException {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub professional_id: Option<Uuid>, // None = organization-wide
    pub date: NaiveDate,
    pub is_closed: bool,
    pub special_open: Option<NaiveTime>,
    pub special_close: Option<NaiveTime>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DateException {
    pub fn is_org_wide(&self) -> bool {
        self.professional_id.is_none()
    }

    /// Special hours for the date, when the exception shortens or shifts
    /// the day instead of closing it.
    pub fn special_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        if self.is_closed {
            return None;
        }
        match (self.special_open, self.special_close) {
            (Some(open), Some(close)) => Some((open, close)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHoursRequest {
    pub organization_id: Uuid,
    pub timezone: String,
    pub sunday_open: Option<NaiveTime>,
    pub sunday_close: Option<NaiveTime>,
    pub monday_open: Option<NaiveTime>,
    pub monday_close: Option<NaiveTime>,
    pub tuesday_open: Option<NaiveTime>,
    pub tuesday_close: Option<NaiveTime>,
    pub wednesday_open: Option<NaiveTime>,
    pub wednesday_close: Option<NaiveTime>,
    pub thursday_open: Option<NaiveTime>,
    pub thursday_close: Option<NaiveTime>,
    pub friday_open: Option<NaiveTime>,
    pub friday_close: Option<NaiveTime>,
    pub saturday_open: Option<NaiveTime>,
    pub saturday_close: Option<NaiveTime>,
}

impl UpdateHoursRequest {
    /// Every weekday must either have both bounds or neither, and open
    /// strictly before close.
    pub fn validate(&self) -> Result<(), String> {
        let pairs = [
            ("sunday", self.sunday_open, self.sunday_close),
            ("monday", self.monday_open, self.monday_close),
            ("tuesday", self.tuesday_open, self.tuesday_close),
            ("wednesday", self.wednesday_open, self.wednesday_close),
            ("thursday", self.thursday_open, self.thursday_close),
            ("friday", self.friday_open, self.friday_close),
            ("saturday", self.saturday_open, self.saturday_close),
        ];

        for (day, open, close) in pairs {
            match (open, close) {
                (None, None) => {}
                (Some(open), Some(close)) if open < close => {}
                (Some(_), Some(_)) => {
                    return Err(format!("{} must open before it closes", day));
                }
                _ => {
                    return Err(format!(
                        "{} must have both opening and closing times, or neither",
                        day
                    ));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotConfigRequest {
    pub organization_id: Uuid,
    pub interval_minutes: i32,
    pub buffer_minutes: i32,
}

impl UpdateSlotConfigRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.interval_minutes, 15 | 30 | 45 | 60) {
            return Err("interval_minutes must be one of 15, 30, 45, 60".to_string());
        }
        if self.buffer_minutes < 0 {
            return Err("buffer_minutes cannot be negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExceptionRequest {
    pub organization_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub date: NaiveDate,
    pub is_closed: bool,
    pub special_open: Option<NaiveTime>,
    pub special_close: Option<NaiveTime>,
    pub reason: Option<String>,
}

impl CreateExceptionRequest {
    /// Exceptions are append-only records for upcoming dates: a closed day
    /// carries no hours, an open one must carry a valid special window.
    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        if self.date <= today {
            return Err("exceptions can only be created for future dates".to_string());
        }

        if self.is_closed {
            if self.special_open.is_some() || self.special_close.is_some() {
                return Err("a closed exception cannot carry special hours".to_string());
            }
            return Ok(());
        }

        match (self.special_open, self.special_close) {
            (Some(open), Some(close)) if open < close => Ok(()),
            (Some(_), Some(_)) => Err("special_open must be before special_close".to_string()),
            _ => Err("an open exception requires special_open and special_close".to_string()),
        }
    }
}
