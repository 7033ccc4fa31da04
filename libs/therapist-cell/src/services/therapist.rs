// libs/therapist-cell/src/services/therapist.rs
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{
    AvailabilityTemplate, CreateTemplateRequest, CreateTherapistRequest, SchedulingError,
    Therapist,
};

pub struct TherapistService {
    store: PostgrestClient,
}

impl TherapistService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: PostgrestClient::new(config),
        }
    }

    pub async fn list_therapists(&self) -> Result<Vec<Therapist>, SchedulingError> {
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, "/rest/v1/therapists?order=id.asc", None)
            .await
            .map_err(|e| SchedulingError::StoreUnavailable(e.to_string()))?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| SchedulingError::Store(e.to_string())))
            .collect()
    }

    pub async fn create_therapist(
        &self,
        request: CreateTherapistRequest,
    ) -> Result<Therapist, SchedulingError> {
        debug!("Creating therapist: {}", request.email);

        let body = json!({
            "name": request.name,
            "email": request.email,
            "specialization": request.specialization,
            "bio": request.bio,
        });

        let rows: Vec<Value> = self
            .store
            .request_returning(Method::POST, "/rest/v1/therapists", Some(body))
            .await
            .map_err(|e| SchedulingError::StoreUnavailable(e.to_string()))?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| SchedulingError::Store("failed to create therapist".to_string()))?;

        serde_json::from_value(row).map_err(|e| SchedulingError::Store(e.to_string()))
    }

    /// Create a weekly availability template for a therapist. Templates are
    /// immutable once created; there is no update path.
    pub async fn create_template(
        &self,
        therapist_id: i64,
        request: CreateTemplateRequest,
    ) -> Result<AvailabilityTemplate, SchedulingError> {
        debug!("Creating availability template for therapist: {}", therapist_id);

        if request.start_time >= request.end_time {
            return Err(SchedulingError::Validation(
                "Start time must be before end time".to_string(),
            ));
        }

        if request.day_of_week > 6 {
            return Err(SchedulingError::Validation(
                "Day of week must be between 0 (Monday) and 6 (Sunday)".to_string(),
            ));
        }

        let body = json!({
            "therapist_id": therapist_id,
            "day_of_week": request.day_of_week,
            "start_time": request.start_time.format("%H:%M").to_string(),
            "end_time": request.end_time.format("%H:%M").to_string(),
            "is_available": true,
        });

        let rows: Vec<Value> = self
            .store
            .request_returning(Method::POST, "/rest/v1/availability_templates", Some(body))
            .await
            .map_err(|e| SchedulingError::StoreUnavailable(e.to_string()))?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| SchedulingError::Store("failed to create template".to_string()))?;

        serde_json::from_value(row).map_err(|e| SchedulingError::Store(e.to_string()))
    }
}
