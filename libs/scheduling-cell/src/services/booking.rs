// libs/scheduling-cell/src/services/booking.rs
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use organization_cell::models::{DateException, OrganizationHours, Service, SlotSettings};
use organization_cell::services::{CatalogService, ExceptionService, HoursService, SlotConfigService};
use professional_cell::models::ProfessionalAvailability;
use professional_cell::services::AvailabilityService;
use shared_config::AppConfig;
use shared_database::supabase::{DbError, SupabaseClient};

use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookingDecision, BookingOutcome,
    ClosedReason, DayWindow, RejectionReason, SchedulingError, SlotCandidate,
    ValidateBookingRequest,
};
use crate::services::conflict::find_conflict;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::resolver::resolve_window;
use crate::services::slots::{generate_slots, offerable_starts};

/// Everything the pure scheduling functions need for one professional on
/// one date, fetched in full before any of them run.
struct DayContext {
    hours: Option<OrganizationHours>,
    settings: SlotSettings,
    weekly: Vec<ProfessionalAvailability>,
    exceptions: Vec<DateException>,
    service: Service,
    appointments: Vec<Appointment>,
}

pub struct BookingService {
    supabase: SupabaseClient,
    hours_service: HoursService,
    slot_config_service: SlotConfigService,
    exception_service: ExceptionService,
    catalog_service: CatalogService,
    availability_service: AvailabilityService,
    lifecycle_service: AppointmentLifecycleService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            hours_service: HoursService::new(config),
            slot_config_service: SlotConfigService::new(config),
            exception_service: ExceptionService::new(config),
            catalog_service: CatalogService::new(config),
            availability_service: AvailabilityService::new(config),
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    /// Start times currently offerable for a service on a date.
    ///
    /// Closed days are a normal answer, not a failure: they come back as an
    /// empty list. Only infrastructure problems (the backend unreachable, a
    /// row that does not parse) surface as errors.
    pub async fn get_offerable_slots(
        &self,
        organization_id: Uuid,
        professional_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<NaiveTime>, SchedulingError> {
        let context = self
            .load_day_context(organization_id, professional_id, service_id, date, auth_token)
            .await?;

        let window = resolve_window(
            date,
            &context.weekly,
            &context.exceptions,
            context.hours.as_ref(),
        );

        if let DayWindow::Closed { reason } = window {
            if reason == ClosedReason::HoursNotConfigured {
                warn!(
                    "Organization {} has no configured hours; offering no slots",
                    organization_id
                );
            } else {
                debug!(
                    "No slots for professional {} on {}: {}",
                    professional_id, date, reason
                );
            }
            return Ok(Vec::new());
        }

        let candidates = generate_slots(
            window,
            context.settings.interval_minutes,
            context.service.duration_minutes,
        );

        Ok(offerable_starts(
            professional_id,
            date,
            candidates,
            context.service.duration_minutes,
            &context.appointments,
            context.settings.buffer_minutes,
        ))
    }

    /// Pre-write guard: would this booking be accepted right now?
    ///
    /// Rejections come back as data, never as `Err`; an `Err` means the
    /// answer is unknown.
    pub async fn validate_booking(
        &self,
        request: &ValidateBookingRequest,
        auth_token: &str,
    ) -> Result<BookingDecision, SchedulingError> {
        let context = self
            .load_day_context(
                request.organization_id,
                request.professional_id,
                request.service_id,
                request.date,
                auth_token,
            )
            .await?;

        Ok(decide(&context, request.professional_id, request.date, request.start_time))
    }

    /// Validate, then let the database-side `book_appointment` function make
    /// the authoritative overlap check and insert atomically. A 409 from
    /// that function is the concurrent-booking race: the slot looked free on
    /// our reads but another write landed first.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<BookingOutcome, SchedulingError> {
        info!(
            "Booking appointment: client {} with professional {} on {} at {}",
            request.client_id, request.professional_id, request.date, request.start_time
        );

        let context = self
            .load_day_context(
                request.organization_id,
                request.professional_id,
                request.service_id,
                request.date,
                auth_token,
            )
            .await?;

        let decision = decide(&context, request.professional_id, request.date, request.start_time);
        if let BookingDecision::Rejected {
            reason,
            conflicting_appointment_id,
        } = decision
        {
            warn!("Booking rejected before write: {}", reason);
            return Ok(BookingOutcome::Rejected {
                reason,
                conflicting_appointment_id,
            });
        }

        let scheduled_at = request.date.and_time(request.start_time).and_utc();
        let args = json!({
            "organization_id": request.organization_id,
            "professional_id": request.professional_id,
            "service_id": request.service_id,
            "client_id": request.client_id,
            "scheduled_at": scheduled_at.to_rfc3339(),
            "duration_minutes": context.service.duration_minutes,
            "price": context.service.price,
            "buffer_minutes": context.settings.buffer_minutes,
            "notes": request.notes
        });

        match self
            .supabase
            .rpc::<Appointment>("book_appointment", Some(auth_token), args)
            .await
        {
            Ok(appointment) => {
                info!("Appointment {} booked successfully", appointment.id);
                Ok(BookingOutcome::Booked(appointment))
            }
            Err(DbError::Conflict(message)) => {
                warn!(
                    "Authoritative overlap check rejected the booking: {}",
                    message
                );
                Ok(BookingOutcome::Rejected {
                    reason: RejectionReason::BookingConflict,
                    conflicting_appointment_id: None,
                })
            }
            Err(e) => Err(SchedulingError::DatabaseError(e.to_string())),
        }
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Fetching appointment: {}", appointment_id);

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(SchedulingError::NotFound)?;
        serde_json::from_value(row).map_err(|e| SchedulingError::DatabaseError(e.to_string()))
    }

    /// A professional's appointments on one calendar day, any status,
    /// ordered by start time.
    pub async fn appointments_for_day(
        &self,
        organization_id: Uuid,
        professional_id: Uuid,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let (day_start, day_end) = day_bounds(date);

        let query_parts = vec![
            format!("organization_id=eq.{}", organization_id),
            format!("professional_id=eq.{}", professional_id),
            format!("scheduled_at=gte.{}", urlencoding::encode(&day_start.to_rfc3339())),
            format!("scheduled_at=lt.{}", urlencoding::encode(&day_end.to_rfc3339())),
            "order=scheduled_at.asc".to_string(),
        ];
        let path = format!("/rest/v1/appointments?{}", query_parts.join("&"));

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        let appointments = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        Ok(appointments)
    }

    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
        auth_token: &str,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = self.get_appointment(appointment_id, auth_token).await?;

        self.lifecycle_service
            .validate_status_transition(&appointment.status, &new_status)?;

        info!(
            "Updating appointment {} status: {} -> {}",
            appointment_id, appointment.status, new_status
        );

        let patch = json!({
            "status": new_status,
            "updated_at": Utc::now().to_rfc3339()
        });

        self.patch_appointment(appointment_id, patch, auth_token).await
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        reason: Option<String>,
        auth_token: &str,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = self.get_appointment(appointment_id, auth_token).await?;

        self.lifecycle_service
            .validate_status_transition(&appointment.status, &AppointmentStatus::Cancelled)?;

        info!("Cancelling appointment {}", appointment_id);

        let mut patch = json!({
            "status": AppointmentStatus::Cancelled,
            "updated_at": Utc::now().to_rfc3339()
        });
        if let Some(reason) = reason {
            patch["notes"] = json!(format!("Cancelled: {}", reason));
        }

        self.patch_appointment(appointment_id, patch, auth_token).await
    }

    async fn patch_appointment(
        &self,
        appointment_id: Uuid,
        patch: Value,
        auth_token: &str,
    ) -> Result<Appointment, SchedulingError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(auth_token), Some(patch), Some(headers))
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(SchedulingError::NotFound)?;
        serde_json::from_value(row).map_err(|e| SchedulingError::DatabaseError(e.to_string()))
    }

    /// Await every collaborator read in full before any scheduling rule
    /// runs; the pure functions never see partial data.
    async fn load_day_context(
        &self,
        organization_id: Uuid,
        professional_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<DayContext, SchedulingError> {
        let hours = self
            .hours_service
            .get_hours(organization_id, auth_token)
            .await
            .map_err(|e| {
                SchedulingError::DatabaseError(format!("Failed to fetch organization hours: {}", e))
            })?;

        let settings = self
            .slot_config_service
            .get_effective_settings(organization_id, auth_token)
            .await
            .map_err(|e| {
                SchedulingError::DatabaseError(format!("Failed to fetch slot settings: {}", e))
            })?;

        let weekly = self
            .availability_service
            .get_availability(organization_id, professional_id, auth_token)
            .await
            .map_err(|e| {
                SchedulingError::DatabaseError(format!(
                    "Failed to fetch weekly availability: {}",
                    e
                ))
            })?;

        let exceptions = self
            .exception_service
            .exceptions_for_date(organization_id, professional_id, date, auth_token)
            .await
            .map_err(|e| {
                SchedulingError::DatabaseError(format!("Failed to fetch date exceptions: {}", e))
            })?;

        let service = self
            .catalog_service
            .get_service(service_id, organization_id, auth_token)
            .await
            .map_err(|e| SchedulingError::DatabaseError(format!("Failed to fetch service: {}", e)))?
            .ok_or(SchedulingError::ServiceNotFound)?;

        if !service.active {
            return Err(SchedulingError::ValidationError(
                "Service is not active".to_string(),
            ));
        }

        let appointments = self
            .appointments_for_day(organization_id, professional_id, date, auth_token)
            .await?;

        Ok(DayContext {
            hours,
            settings,
            weekly,
            exceptions,
            service,
            appointments,
        })
    }
}

/// The pre-write decision: window, slot membership, then overlap, in that
/// order, so the caller always learns the most specific reason.
fn decide(
    context: &DayContext,
    professional_id: Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
) -> BookingDecision {
    let window = resolve_window(
        date,
        &context.weekly,
        &context.exceptions,
        context.hours.as_ref(),
    );

    if let DayWindow::Closed { reason } = window {
        return BookingDecision::reject(reason.rejection());
    }

    let candidates = generate_slots(
        window,
        context.settings.interval_minutes,
        context.service.duration_minutes,
    );
    if !candidates.contains(&start_time) {
        return BookingDecision::reject(RejectionReason::SlotNotOffered);
    }

    let candidate = SlotCandidate {
        professional_id,
        start: date.and_time(start_time).and_utc(),
        duration_minutes: context.service.duration_minutes,
    };
    if let Some(conflicting_id) = find_conflict(
        &candidate,
        &context.appointments,
        context.settings.buffer_minutes,
    ) {
        return BookingDecision::reject_conflict(conflicting_id);
    }

    BookingDecision::Accepted
}

/// Half-open bounds [00:00, next day 00:00) for the day's appointment query.
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let day_start = date.and_time(NaiveTime::MIN).and_utc();
    (day_start, day_start + Duration::days(1))
}
