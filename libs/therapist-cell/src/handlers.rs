// libs/therapist-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{
    AvailableSlotsResponse, CreateTemplateRequest, CreateTherapistRequest, SlotQuery,
};
use crate::services::{AvailabilityService, TherapistService};

#[axum::debug_handler]
pub async fn list_therapists(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let therapist_service = TherapistService::new(&state);

    let therapists = therapist_service.list_therapists().await?;

    Ok(Json(json!({
        "therapists": therapists
    })))
}

#[axum::debug_handler]
pub async fn create_therapist(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateTherapistRequest>,
) -> Result<Json<Value>, AppError> {
    let therapist_service = TherapistService::new(&state);

    let therapist = therapist_service.create_therapist(request).await?;

    Ok(Json(json!({
        "message": "Therapist added",
        "therapist_id": therapist.id
    })))
}

#[axum::debug_handler]
pub async fn create_template(
    State(state): State<Arc<AppConfig>>,
    Path(therapist_id): Path<i64>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<Json<Value>, AppError> {
    let therapist_service = TherapistService::new(&state);

    let template = therapist_service
        .create_template(therapist_id, request)
        .await?;

    Ok(Json(json!(template)))
}

/// `GET /therapists/{therapist_id}/slots?date=YYYY-MM-DD`
///
/// An unknown therapist id is a valid query and yields an empty list; a
/// malformed date is a 400.
#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    Path(therapist_id): Path<i64>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let available_slots = availability_service
        .available_slots(therapist_id, &query.date)
        .await?;

    Ok(Json(AvailableSlotsResponse { available_slots }))
}
