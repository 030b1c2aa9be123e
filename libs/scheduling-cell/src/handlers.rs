// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    BookAppointmentRequest, BookingOutcome, CancelAppointmentRequest, RejectionReason,
    SchedulingError, UpdateStatusRequest, ValidateBookingRequest,
};
use crate::services::BookingService;

// Query parameters for different endpoints
#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub organization_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub organization_id: Uuid,
    pub professional_id: Uuid,
    pub date: NaiveDate,
}

/// Infrastructure failures onto HTTP statuses. Domain rejections never pass
/// through here; they are mapped per-endpoint so a booking conflict can keep
/// its own status code.
fn map_scheduling_error(error: SchedulingError) -> AppError {
    match error {
        SchedulingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        SchedulingError::ServiceNotFound => AppError::NotFound("Service not found".to_string()),
        SchedulingError::InvalidStatusTransition(status) => {
            AppError::Conflict(format!("Appointment cannot change status from {}", status))
        }
        SchedulingError::ValidationError(message) => AppError::ValidationError(message),
        SchedulingError::DatabaseError(message) => AppError::Database(message),
    }
}

// ==============================================================================
// SLOT LISTING
// ==============================================================================

#[axum::debug_handler]
pub async fn get_offerable_slots(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SlotQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let slots = booking_service
        .get_offerable_slots(
            query.organization_id,
            query.professional_id,
            query.service_id,
            query.date,
            token,
        )
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "organization_id": query.organization_id,
        "professional_id": query.professional_id,
        "service_id": query.service_id,
        "date": query.date,
        "slots": slots,
        "total": slots.len()
    })))
}

// ==============================================================================
// BOOKING
// ==============================================================================

#[axum::debug_handler]
pub async fn validate_booking(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<ValidateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let decision = booking_service
        .validate_booking(&request, token)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!(decision)))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let is_own_booking = user.id == request.client_id.to_string();
    if !user.is_staff() && !is_own_booking {
        return Err(AppError::Auth(
            "Clients can only book appointments for themselves".to_string(),
        ));
    }

    let booking_service = BookingService::new(&state);

    let outcome = booking_service
        .book_appointment(request, token)
        .await
        .map_err(map_scheduling_error)?;

    match outcome {
        BookingOutcome::Booked(appointment) => Ok(Json(json!({
            "message": "Appointment booked successfully",
            "appointment": appointment
        }))),
        BookingOutcome::Rejected {
            reason: RejectionReason::BookingConflict,
            ..
        } => Err(AppError::Conflict(
            RejectionReason::BookingConflict.message().to_string(),
        )),
        BookingOutcome::Rejected { reason, .. } => Err(AppError::Rejected {
            reason: reason.to_string(),
            message: reason.message().to_string(),
        }),
    }
}

// ==============================================================================
// APPOINTMENT READS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .get_appointment(appointment_id, token)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_day_agenda(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AgendaQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let appointments = booking_service
        .appointments_for_day(
            query.organization_id,
            query.professional_id,
            query.date,
            token,
        )
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "professional_id": query.professional_id,
        "date": query.date,
        "appointments": appointments,
        "total": appointments.len()
    })))
}

// ==============================================================================
// STATUS TRANSITIONS
// ==============================================================================

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    if !user.is_staff() && user.role.as_deref() != Some("professional") {
        return Err(AppError::Auth(
            "Only staff and professionals can change appointment status".to_string(),
        ));
    }

    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .update_status(appointment_id, request.status, token)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .cancel_appointment(appointment_id, request.reason, token)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!(appointment)))
}
