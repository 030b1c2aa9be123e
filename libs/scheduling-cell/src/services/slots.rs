// libs/scheduling-cell/src/services/slots.rs
use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::models::{Appointment, DayWindow, SlotCandidate};
use crate::services::conflict::find_conflict;

fn minute_of_day(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Candidate start times inside a window, stepping by the configured
/// interval from the opening time. A start is emitted only while the whole
/// service fits before closing: `start + duration <= close`. A candidate
/// that would run past closing is never offered, even when its start time
/// alone lies inside the window.
///
/// All arithmetic is whole minutes since midnight in the organization's
/// timezone; seconds on the window bounds are ignored. Closed windows and
/// non-positive intervals or durations yield an empty list.
pub fn generate_slots(
    window: DayWindow,
    interval_minutes: i32,
    service_duration_minutes: i32,
) -> Vec<NaiveTime> {
    let DayWindow::Open { opens_at, closes_at } = window else {
        return Vec::new();
    };
    if interval_minutes <= 0 || service_duration_minutes <= 0 {
        return Vec::new();
    }

    let close = minute_of_day(closes_at);

    let mut slots = Vec::new();
    let mut start = minute_of_day(opens_at);
    while start + service_duration_minutes <= close {
        if let Some(time) = NaiveTime::from_hms_opt(start as u32 / 60, start as u32 % 60, 0) {
            slots.push(time);
        }
        start += interval_minutes;
    }

    slots
}

/// Candidate starts with the ones colliding against existing appointments
/// removed. `date` anchors each start on the same day the appointment
/// timestamps live on.
pub fn offerable_starts(
    professional_id: uuid::Uuid,
    date: NaiveDate,
    candidates: Vec<NaiveTime>,
    service_duration_minutes: i32,
    existing: &[Appointment],
    buffer_minutes: i32,
) -> Vec<NaiveTime> {
    candidates
        .into_iter()
        .filter(|start| {
            let candidate = SlotCandidate {
                professional_id,
                start: date.and_time(*start).and_utc(),
                duration_minutes: service_duration_minutes,
            };
            find_conflict(&candidate, existing, buffer_minutes).is_none()
        })
        .collect()
}
