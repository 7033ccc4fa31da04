// libs/booking-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use therapist_cell::models::time_format;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub therapist_id: i64,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub scheduled_date: NaiveDate,
    #[serde(with = "time_format")]
    pub scheduled_time: NaiveTime,
    pub status: AppointmentStatus,
    pub issues_tags: Option<Vec<String>>,
    pub report_file: Option<String>,
    pub meet_link: Option<String>,
    pub calendar_event_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Accepted => write!(f, "accepted"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub therapist_id: i64,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub scheduled_date: String,
    pub scheduled_time: String,
    #[serde(default)]
    pub issues_tags: Vec<String>,
    pub report_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptAppointmentRequest {
    pub appointment_id: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub pending: Vec<Appointment>,
    pub accepted: Vec<Appointment>,
}

/// Result of accepting an appointment: the updated record plus the
/// provisioned conference link and calendar event, if any.
#[derive(Debug, Serialize)]
pub struct AcceptOutcome {
    pub appointment: Appointment,
    pub meet_link: String,
    pub calendar_event_id: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error("Appointment is {from}, only pending appointments can be accepted")]
    InvalidTransition { from: AppointmentStatus },

    #[error("{0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Calendar API error: {0}")]
    Calendar(String),
}

impl From<BookingError> for shared_models::AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(msg) => shared_models::AppError::NotFound(msg),
            BookingError::InvalidTransition { .. } => {
                shared_models::AppError::Conflict(err.to_string())
            }
            BookingError::Validation(msg) => shared_models::AppError::BadRequest(msg),
            BookingError::StoreUnavailable(msg) => shared_models::AppError::Database(msg),
            BookingError::Store(msg) => shared_models::AppError::Internal(msg),
            BookingError::Calendar(msg) => shared_models::AppError::ExternalService(msg),
        }
    }
}
