// libs/scheduling-cell/src/services/resolver.rs
//
// Reconciles exceptions, the professional's weekly schedule and the
// organization's hours into the effective window for one date. Operates
// purely on already-fetched rows; all I/O stays in the booking service.
use chrono::{Datelike, NaiveDate};

use organization_cell::models::{DateException, OrganizationHours};
use professional_cell::models::ProfessionalAvailability;

use crate::models::{ClosedReason, DayWindow};

/// Weekday index for a date (0 = Sunday, 1 = Monday, etc.), matching the
/// convention of the availability and hours rows.
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

/// Effective window for a professional on a date.
///
/// Priority order, first match wins:
/// 1. professional-specific exception, closed -> day off
/// 2. professional-specific exception, open -> its special window, untouched
/// 3. organization-wide exception, closed -> holiday
/// 4. organization-wide exception, open -> its special window, untouched
/// 5. no weekly row for the weekday -> not scheduled
/// 6. weekly row intersected with organization hours; no hours row, no pair
///    for the weekday, or a disjoint intersection all close the day
///
/// An open exception missing its special window is treated as absent and
/// falls through to the next rule. Duplicate weekly rows for one weekday
/// collapse deterministically to the earliest-starting row.
pub fn resolve_window(
    date: NaiveDate,
    weekly: &[ProfessionalAvailability],
    exceptions: &[DateException],
    hours: Option<&OrganizationHours>,
) -> DayWindow {
    let todays: Vec<&DateException> = exceptions.iter().filter(|e| e.date == date).collect();

    // A professional's own exception outranks everything else
    if let Some(exception) = todays.iter().find(|e| !e.is_org_wide()) {
        if exception.is_closed {
            return DayWindow::Closed {
                reason: ClosedReason::ProfessionalDayOff,
            };
        }
        if let Some((opens_at, closes_at)) = exception.special_window() {
            return DayWindow::Open { opens_at, closes_at };
        }
    }

    if let Some(exception) = todays.iter().find(|e| e.is_org_wide()) {
        if exception.is_closed {
            return DayWindow::Closed {
                reason: ClosedReason::OrganizationHoliday,
            };
        }
        if let Some((opens_at, closes_at)) = exception.special_window() {
            return DayWindow::Open { opens_at, closes_at };
        }
    }

    let day_of_week = weekday_index(date);

    let weekly_row = weekly
        .iter()
        .filter(|row| row.day_of_week == day_of_week)
        .min_by_key(|row| row.start_time);

    let Some(weekly_row) = weekly_row else {
        return DayWindow::Closed {
            reason: ClosedReason::ProfessionalNotScheduled,
        };
    };

    // No hours row at all is distinct from "closed this weekday": the
    // organization never configured anything, and the day must not
    // silently fall back to a default window.
    let Some(hours) = hours else {
        return DayWindow::Closed {
            reason: ClosedReason::HoursNotConfigured,
        };
    };

    let Some((org_open, org_close)) = hours.window_for(day_of_week) else {
        return DayWindow::Closed {
            reason: ClosedReason::OrganizationClosed,
        };
    };

    let opens_at = weekly_row.start_time.max(org_open);
    let closes_at = weekly_row.end_time.min(org_close);

    if opens_at >= closes_at {
        // The professional's working window falls entirely outside the
        // organization's open hours
        return DayWindow::Closed {
            reason: ClosedReason::ProfessionalNotScheduled,
        };
    }

    DayWindow::Open { opens_at, closes_at }
}
