// libs/scheduling-cell/src/services/conflict.rs
use chrono::Duration;
use uuid::Uuid;

use crate::models::{Appointment, SlotCandidate};

/// First appointment whose buffer-expanded interval overlaps the candidate.
///
/// Only the candidate professional's appointments in a slot-blocking status
/// count; cancelled and no-show rows never block. Each existing interval is
/// widened by the buffer on both sides, so the candidate is rejected when
/// `candidate.start < existing.end + buffer` and
/// `candidate.end > existing.start - buffer`. Order among simultaneous
/// conflicts follows the input slice and carries no meaning.
///
/// This check keeps already-taken slots out of what the caller offers; the
/// database-side check inside the booking function stays the authority,
/// because two concurrent attempts can both pass here on the same stale
/// reads.
pub fn find_conflict(
    candidate: &SlotCandidate,
    existing: &[Appointment],
    buffer_minutes: i32,
) -> Option<Uuid> {
    let buffer = Duration::minutes(buffer_minutes.max(0) as i64);
    let candidate_end = candidate.end();

    existing
        .iter()
        .filter(|appointment| appointment.professional_id == candidate.professional_id)
        .filter(|appointment| appointment.status.blocks_slot())
        .find(|appointment| {
            let blocked_from = appointment.scheduled_at - buffer;
            let blocked_until = appointment.scheduled_end_time() + buffer;
            candidate.start < blocked_until && candidate_end > blocked_from
        })
        .map(|appointment| appointment.id)
}
