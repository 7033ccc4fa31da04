// libs/booking-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{AcceptAppointmentRequest, BookingRequest};
use crate::services::BookingService;

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service.book_appointment(request).await?;

    Ok(Json(json!({
        "message": "Booking request sent successfully",
        "appointment_id": appointment.id,
        "status": appointment.status
    })))
}

#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<Arc<AppConfig>>,
    Path(therapist_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let dashboard = booking_service.dashboard(therapist_id).await?;

    Ok(Json(json!(dashboard)))
}

#[axum::debug_handler]
pub async fn accept_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<AcceptAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let outcome = booking_service
        .accept_appointment(request.appointment_id)
        .await?;

    Ok(Json(json!({
        "message": "Appointment accepted successfully",
        "meet_link": outcome.meet_link,
        "calendar_event_id": outcome.calendar_event_id
    })))
}
