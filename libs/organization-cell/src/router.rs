use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn organization_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        // Weekly hours
        .route("/hours", get(handlers::get_hours))
        .route("/hours", put(handlers::update_hours))
        // Slot configuration
        .route("/slot-config", get(handlers::get_slot_config))
        .route("/slot-config", put(handlers::update_slot_config))
        // Date exceptions (append-only)
        .route("/exceptions", get(handlers::list_exceptions))
        .route("/exceptions", post(handlers::create_exception))
        .route("/exceptions/{exception_id}", delete(handlers::delete_exception))
        // Service catalog (read-only)
        .route("/services", get(handlers::list_services))
        .route("/services/{service_id}", get(handlers::get_service))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
