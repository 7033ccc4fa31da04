use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn therapist_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_therapists).post(handlers::create_therapist))
        .route("/{therapist_id}/templates", post(handlers::create_template))
        .route("/{therapist_id}/slots", get(handlers::get_available_slots))
        .with_state(state)
}
