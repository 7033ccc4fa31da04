use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/book", post(handlers::create_booking))
        .route("/therapist/accept", post(handlers::accept_appointment))
        .route("/therapist/{therapist_id}/dashboard", get(handlers::get_dashboard))
        .with_state(state)
}
