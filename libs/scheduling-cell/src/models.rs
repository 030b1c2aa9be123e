// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub price: f64,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Scheduled end time derived from scheduled_at and the frozen duration.
    pub fn scheduled_end_time(&self) -> DateTime<Utc> {
        self.scheduled_at + chrono::Duration::minutes(self.duration_minutes as i64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Statuses that hold their time slot against new bookings. Cancelled
    /// and no-show appointments free the slot.
    pub fn blocks_slot(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Scheduled
                | AppointmentStatus::Confirmed
                | AppointmentStatus::Completed
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

// ==============================================================================
// DAY WINDOW RESOLUTION MODELS
// ==============================================================================

/// Effective open/closed state of one professional's day after exceptions,
/// weekly schedule and organization hours are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DayWindow {
    Open {
        opens_at: NaiveTime,
        closes_at: NaiveTime,
    },
    Closed {
        reason: ClosedReason,
    },
}

impl DayWindow {
    pub fn is_open(&self) -> bool {
        matches!(self, DayWindow::Open { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedReason {
    /// A professional-specific exception closes the date.
    ProfessionalDayOff,
    /// The professional has no weekly row for this weekday, or their
    /// working window falls entirely outside the organization's hours.
    ProfessionalNotScheduled,
    /// An organization-wide exception closes the date.
    OrganizationHoliday,
    /// The organization does not open on this weekday.
    OrganizationClosed,
    /// The organization has never saved an hours row.
    HoursNotConfigured,
}

impl ClosedReason {
    /// The rejection a booking attempt receives when the day is closed
    /// for this reason.
    pub fn rejection(&self) -> RejectionReason {
        match self {
            ClosedReason::ProfessionalDayOff | ClosedReason::ProfessionalNotScheduled => {
                RejectionReason::ProfessionalUnavailable
            }
            ClosedReason::OrganizationHoliday | ClosedReason::OrganizationClosed => {
                RejectionReason::OrganizationClosed
            }
            ClosedReason::HoursNotConfigured => RejectionReason::ConfigurationMissing,
        }
    }
}

impl fmt::Display for ClosedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosedReason::ProfessionalDayOff => write!(f, "professional_day_off"),
            ClosedReason::ProfessionalNotScheduled => write!(f, "professional_not_scheduled"),
            ClosedReason::OrganizationHoliday => write!(f, "organization_holiday"),
            ClosedReason::OrganizationClosed => write!(f, "organization_closed"),
            ClosedReason::HoursNotConfigured => write!(f, "hours_not_configured"),
        }
    }
}

// ==============================================================================
// CONFLICT DETECTION MODELS
// ==============================================================================

/// A prospective appointment interval checked against existing bookings.
#[derive(Debug, Clone, Copy)]
pub struct SlotCandidate {
    pub professional_id: Uuid,
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
}

impl SlotCandidate {
    pub fn end(&self) -> DateTime<Utc> {
        self.start + chrono::Duration::minutes(self.duration_minutes as i64)
    }
}

// ==============================================================================
// BOOKING DECISION MODELS
// ==============================================================================

/// Why a booking attempt was turned down. These are domain answers, not
/// failures: they travel as data so the caller can tell "no, and here is
/// why" apart from "I don't know, try again".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    ConfigurationMissing,
    ProfessionalUnavailable,
    OrganizationClosed,
    SlotNotOffered,
    BookingConflict,
}

impl RejectionReason {
    /// Human message the UI can show next to the machine-readable slug.
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::ConfigurationMissing => "Organization hours are not configured",
            RejectionReason::ProfessionalUnavailable => {
                "Professional is not available on this date"
            }
            RejectionReason::OrganizationClosed => "Organization is closed on this date",
            RejectionReason::SlotNotOffered => "Requested start time is not an offerable slot",
            RejectionReason::BookingConflict => "This slot was just taken, please choose another",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::ConfigurationMissing => write!(f, "configuration_missing"),
            RejectionReason::ProfessionalUnavailable => write!(f, "professional_unavailable"),
            RejectionReason::OrganizationClosed => write!(f, "organization_closed"),
            RejectionReason::SlotNotOffered => write!(f, "slot_not_offered"),
            RejectionReason::BookingConflict => write!(f, "booking_conflict"),
        }
    }
}

/// Outcome of the pre-write booking check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingDecision {
    Accepted,
    Rejected {
        reason: RejectionReason,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conflicting_appointment_id: Option<Uuid>,
    },
}

impl BookingDecision {
    pub fn reject(reason: RejectionReason) -> Self {
        BookingDecision::Rejected {
            reason,
            conflicting_appointment_id: None,
        }
    }

    pub fn reject_conflict(conflicting_appointment_id: Uuid) -> Self {
        BookingDecision::Rejected {
            reason: RejectionReason::BookingConflict,
            conflicting_appointment_id: Some(conflicting_appointment_id),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, BookingDecision::Accepted)
    }
}

/// What a booking attempt produced: a persisted appointment, or the
/// rejection that stopped it (either before the write or from the
/// database-side overlap check).
#[derive(Debug, Clone)]
pub enum BookingOutcome {
    Booked(Appointment),
    Rejected {
        reason: RejectionReason,
        conflicting_appointment_id: Option<Uuid>,
    },
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateBookingRequest {
    pub organization_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub organization_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

/// Infrastructure failures, kept apart from the domain rejections above:
/// a `SchedulingError` means the answer is unknown or the request itself
/// is broken, never "the slot is taken".
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum SchedulingError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Service not found")]
    ServiceNotFound,

    #[error("Appointment cannot change status from {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
