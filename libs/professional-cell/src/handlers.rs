use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::ReplaceAvailabilityRequest;
use crate::services::AvailabilityService;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub organization_id: Uuid,
}

#[axum::debug_handler]
pub async fn get_professional_availability(
    State(state): State<Arc<AppConfig>>,
    Path(professional_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let availability_service = AvailabilityService::new(&state);

    let windows = availability_service
        .get_availability(query.organization_id, professional_id, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "professional_id": professional_id,
        "organization_id": query.organization_id,
        "windows": windows,
        "total": windows.len()
    })))
}

#[axum::debug_handler]
pub async fn replace_professional_availability(
    State(state): State<Arc<AppConfig>>,
    Path(professional_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<ReplaceAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    // Staff manage schedules; professionals may also edit their own
    let is_self = user.id == professional_id.to_string();
    if !user.is_staff() && !is_self {
        return Err(AppError::Auth(
            "Not authorized to edit this professional's availability".to_string(),
        ));
    }

    request.validate().map_err(AppError::ValidationError)?;

    let availability_service = AvailabilityService::new(&state);

    let windows = availability_service
        .replace_availability(professional_id, request, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "professional_id": professional_id,
        "windows": windows,
        "total": windows.len()
    })))
}
