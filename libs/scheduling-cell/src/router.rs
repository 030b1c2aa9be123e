use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn scheduling_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        // Offerable slot listing
        .route("/slots", get(handlers::get_offerable_slots))
        // Booking
        .route("/bookings/validate", post(handlers::validate_booking))
        .route("/bookings", post(handlers::book_appointment))
        .route("/bookings", get(handlers::list_day_agenda))
        .route("/bookings/{appointment_id}", get(handlers::get_appointment))
        // Lifecycle
        .route(
            "/bookings/{appointment_id}/status",
            patch(handlers::update_appointment_status),
        )
        .route(
            "/bookings/{appointment_id}/cancel",
            post(handlers::cancel_appointment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
