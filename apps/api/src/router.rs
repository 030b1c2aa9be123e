use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use organization_cell::router::organization_routes;
use professional_cell::router::professional_routes;
use scheduling_cell::router::scheduling_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Bela Salon API is running!" }))
        .nest("/organizations", organization_routes(state.clone()))
        .nest("/professionals", professional_routes(state.clone()))
        .nest("/scheduling", scheduling_routes(state.clone()))
}
