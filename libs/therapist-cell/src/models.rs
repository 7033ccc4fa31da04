// libs/therapist-cell/src/models.rs
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Serde helper for the store's `"HH:MM"` time-of-day columns.
///
/// Accepts `"HH:MM:SS"` too, since the store may echo time columns with a
/// seconds component; always serializes back as `"HH:MM"`.
pub mod time_format {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

// ==============================================================================
// CORE THERAPIST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Therapist {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub calendar_id: Option<String>,
}

/// A recurring weekly rule stating a therapist is bookable between two times
/// on a given weekday.
///
/// `day_of_week` uses the canonical ordinal Monday = 0 through Sunday = 6;
/// stored templates and the resolver agree on this ordinal. Templates are
/// created by an administrator and are immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityTemplate {
    pub id: i64,
    pub therapist_id: i64,
    pub day_of_week: u8,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    #[serde(with = "time_format")]
    pub end_time: NaiveTime,
    pub is_available: bool,
}

/// Projection of an appointment row as the resolver sees it: the claimed
/// time label and the status deciding whether the claim counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSlot {
    #[serde(with = "time_format")]
    pub scheduled_time: NaiveTime,
    pub status: String,
}

impl AppointmentSlot {
    /// Only non-cancelled appointments occupy a slot.
    pub fn occupies_slot(&self) -> bool {
        self.status != "cancelled"
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTherapistRequest {
    pub name: String,
    pub email: String,
    pub specialization: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub day_of_week: u8,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    #[serde(with = "time_format")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    /// Calendar date in `YYYY-MM-DD` form; parsed by the resolver so a bad
    /// value surfaces as a structured 400 rather than a generic failure.
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct AvailableSlotsResponse {
    pub available_slots: Vec<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Malformed date: {0}")]
    MalformedDate(String),

    #[error("{0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<SchedulingError> for shared_models::AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::MalformedDate(msg) => shared_models::AppError::BadRequest(msg),
            SchedulingError::Validation(msg) => shared_models::AppError::ValidationError(msg),
            SchedulingError::StoreUnavailable(msg) => shared_models::AppError::Database(msg),
            SchedulingError::Store(msg) => shared_models::AppError::Internal(msg),
        }
    }
}
