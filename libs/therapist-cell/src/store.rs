// libs/therapist-cell/src/store.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{AppointmentSlot, AvailabilityTemplate, SchedulingError};

/// Read access to the scheduling state the resolver needs.
///
/// The resolver only ever reads; both operations are snapshot queries with
/// no ordering guarantee against concurrent bookings. Tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    /// Enabled weekly templates for a therapist on the given weekday
    /// (Monday = 0), in template order.
    async fn list_templates(
        &self,
        therapist_id: i64,
        day_of_week: u8,
    ) -> Result<Vec<AvailabilityTemplate>, SchedulingError>;

    /// All appointments for a therapist on the given date, regardless of
    /// status; the resolver decides which of them occupy a slot.
    async fn list_appointments(
        &self,
        therapist_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AppointmentSlot>, SchedulingError>;
}

pub struct PostgrestSchedulingStore {
    client: PostgrestClient,
}

impl PostgrestSchedulingStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: PostgrestClient::new(config),
        }
    }

    fn decode<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, SchedulingError> {
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| SchedulingError::Store(e.to_string())))
            .collect()
    }
}

#[async_trait]
impl SchedulingStore for PostgrestSchedulingStore {
    async fn list_templates(
        &self,
        therapist_id: i64,
        day_of_week: u8,
    ) -> Result<Vec<AvailabilityTemplate>, SchedulingError> {
        let path = format!(
            "/rest/v1/availability_templates?therapist_id=eq.{}&day_of_week=eq.{}&is_available=eq.true&order=start_time.asc",
            therapist_id, day_of_week
        );

        let rows: Vec<Value> = self
            .client
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| SchedulingError::StoreUnavailable(e.to_string()))?;

        Self::decode(rows)
    }

    async fn list_appointments(
        &self,
        therapist_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AppointmentSlot>, SchedulingError> {
        let path = format!(
            "/rest/v1/appointments?therapist_id=eq.{}&scheduled_date=eq.{}&select=scheduled_time,status",
            therapist_id, date
        );

        let rows: Vec<Value> = self
            .client
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| SchedulingError::StoreUnavailable(e.to_string()))?;

        Self::decode(rows)
    }
}
