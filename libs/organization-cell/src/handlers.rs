use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{NaiveDate, Utc};
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    CreateExceptionRequest, SlotSettings, UpdateHoursRequest, UpdateSlotConfigRequest,
};
use crate::services::{CatalogService, ExceptionService, HoursService, SlotConfigService};

// Query parameters for different endpoints
#[derive(Debug, Deserialize)]
pub struct OrganizationQuery {
    pub organization_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ExceptionListQuery {
    pub organization_id: Uuid,
    pub date: Option<NaiveDate>,
    pub professional_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceListQuery {
    pub organization_id: Uuid,
    pub include_inactive: Option<bool>,
}

// ==============================================================================
// WEEKLY HOURS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_hours(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<OrganizationQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let hours_service = HoursService::new(&state);

    let hours = hours_service
        .get_hours(query.organization_id, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "organization_id": query.organization_id,
        "configured": hours.is_some(),
        "hours": hours
    })))
}

#[axum::debug_handler]
pub async fn update_hours(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateHoursRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    // Only owners can change when the salon opens
    if !user.is_owner() {
        return Err(AppError::Auth(
            "Only the organization owner can update hours".to_string(),
        ));
    }

    request.validate().map_err(AppError::ValidationError)?;

    let hours_service = HoursService::new(&state);

    let hours = hours_service
        .upsert_hours(request, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(hours)))
}

// ==============================================================================
// SLOT CONFIGURATION
// ==============================================================================

#[axum::debug_handler]
pub async fn get_slot_config(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<OrganizationQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let slot_config_service = SlotConfigService::new(&state);

    let stored = slot_config_service
        .get_slot_config(query.organization_id, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let effective = stored.as_ref().map(SlotSettings::from).unwrap_or_default();

    Ok(Json(json!({
        "organization_id": query.organization_id,
        "configured": stored.is_some(),
        "interval_minutes": effective.interval_minutes,
        "buffer_minutes": effective.buffer_minutes
    })))
}

#[axum::debug_handler]
pub async fn update_slot_config(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateSlotConfigRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    if !user.is_owner() {
        return Err(AppError::Auth(
            "Only the organization owner can update the slot configuration".to_string(),
        ));
    }

    request.validate().map_err(AppError::ValidationError)?;

    let slot_config_service = SlotConfigService::new(&state);

    let config = slot_config_service
        .upsert_slot_config(request, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(config)))
}

// ==============================================================================
// DATE EXCEPTIONS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_exceptions(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ExceptionListQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let exception_service = ExceptionService::new(&state);

    let exceptions = exception_service
        .list_exceptions(query.organization_id, query.date, query.professional_id, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "exceptions": exceptions,
        "total": exceptions.len()
    })))
}

#[axum::debug_handler]
pub async fn create_exception(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateExceptionRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    if !user.is_staff() {
        return Err(AppError::Auth(
            "Only owners and staff can create exceptions".to_string(),
        ));
    }

    request
        .validate(Utc::now().date_naive())
        .map_err(AppError::ValidationError)?;

    let exception_service = ExceptionService::new(&state);

    let exception = exception_service
        .create_exception(request, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(exception)))
}

#[axum::debug_handler]
pub async fn delete_exception(
    State(state): State<Arc<AppConfig>>,
    Path(exception_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    if !user.is_staff() {
        return Err(AppError::Auth(
            "Only owners and staff can delete exceptions".to_string(),
        ));
    }

    let exception_service = ExceptionService::new(&state);

    exception_service
        .delete_exception(exception_id, token)
        .await
        .map_err(|_| AppError::NotFound("Exception not found".to_string()))?;

    Ok(Json(json!({ "success": true })))
}

// ==============================================================================
// SERVICE CATALOG (READ-ONLY)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ServiceListQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let catalog_service = CatalogService::new(&state);

    let active_only = !query.include_inactive.unwrap_or(false);

    let services = catalog_service
        .list_services(query.organization_id, active_only, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "services": services,
        "total": services.len()
    })))
}

#[axum::debug_handler]
pub async fn get_service(
    State(state): State<Arc<AppConfig>>,
    Path(service_id): Path<Uuid>,
    Query(query): Query<OrganizationQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let catalog_service = CatalogService::new(&state);

    let service = catalog_service
        .get_service(service_id, query.organization_id, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    Ok(Json(json!(service)))
}
