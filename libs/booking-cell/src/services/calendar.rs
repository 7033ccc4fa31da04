// libs/booking-cell/src/services/calendar.rs
use chrono::{Duration, NaiveDate, NaiveTime};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::BookingError;

/// Handle to the calendar event provisioned for an accepted appointment.
#[derive(Debug, Clone)]
pub struct CalendarEventHandle {
    pub meet_link: String,
    pub event_id: String,
}

/// Client for the external calendar API used to provision a calendar event
/// with an attached video-conference link. The API's internal semantics are
/// not modeled here; this is a single request/response contract.
pub struct CalendarClient {
    client: Client,
    base_url: String,
    api_token: String,
    configured: bool,
}

impl CalendarClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.calendar_api_base_url.clone(),
            api_token: config.calendar_api_token.clone(),
            configured: config.is_calendar_configured(),
        }
    }

    /// Create a one-hour calendar event with a Meet-style conference link,
    /// inviting the therapist and the client.
    pub async fn create_meet_event(
        &self,
        therapist_email: &str,
        client_email: &str,
        client_name: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<CalendarEventHandle, BookingError> {
        if !self.configured {
            return Err(BookingError::Calendar(
                "calendar API not configured".to_string(),
            ));
        }

        info!("Creating calendar event for session on {} {}", date, time);

        let start = date.and_time(time).and_utc();
        let end = start + Duration::hours(1);

        let event = json!({
            "summary": format!("Therapy Session - {}", client_name),
            "description": format!("Therapy session with {}", client_name),
            "start": { "dateTime": start.to_rfc3339(), "timeZone": "UTC" },
            "end": { "dateTime": end.to_rfc3339(), "timeZone": "UTC" },
            "attendees": [
                { "email": therapist_email },
                { "email": client_email },
            ],
            "conferenceData": {
                "createRequest": {
                    "requestId": format!("meet-{}", Uuid::new_v4()),
                    "conferenceSolutionKey": { "type": "hangoutsMeet" }
                }
            },
            "reminders": {
                "useDefault": false,
                "overrides": [
                    { "method": "email", "minutes": 24 * 60 },
                    { "method": "popup", "minutes": 30 },
                ],
            },
        });

        let url = format!(
            "{}/calendars/primary/events?conferenceDataVersion=1&sendUpdates=all",
            self.base_url
        );

        debug!("Sending event creation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&event)
            .send()
            .await
            .map_err(|e| BookingError::Calendar(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BookingError::Calendar(e.to_string()))?;

        if !status.is_success() {
            error!("Calendar event creation failed: {} - {}", status, body);
            return Err(BookingError::Calendar(format!("HTTP {}: {}", status, body)));
        }

        let created: Value = serde_json::from_str(&body)
            .map_err(|e| BookingError::Calendar(format!("unparseable event response: {e}")))?;

        let meet_link = created["hangoutLink"]
            .as_str()
            .ok_or_else(|| BookingError::Calendar("event has no conference link".to_string()))?
            .to_string();
        let event_id = created["id"]
            .as_str()
            .ok_or_else(|| BookingError::Calendar("event has no id".to_string()))?
            .to_string();

        info!("Created calendar event {}", event_id);
        Ok(CalendarEventHandle { meet_link, event_id })
    }
}
