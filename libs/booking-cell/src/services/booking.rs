// libs/booking-cell/src/services/booking.rs
use chrono::{NaiveDate, NaiveTime};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::PostgrestClient;
use therapist_cell::models::Therapist;

use crate::models::{
    AcceptOutcome, Appointment, AppointmentStatus, BookingError, BookingRequest,
    DashboardResponse,
};
use crate::services::calendar::CalendarClient;
use crate::services::notification::MailerClient;

/// Fallback conference link when calendar provisioning fails; the booking is
/// still accepted and the therapist arranges the call manually.
const MANUAL_SETUP_LINK: &str = "Manual setup required";

pub struct BookingService {
    store: PostgrestClient,
    calendar: CalendarClient,
    mailer: MailerClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: PostgrestClient::new(config),
            calendar: CalendarClient::new(config),
            mailer: MailerClient::new(config),
        }
    }

    /// Create a booking request in `pending` status.
    ///
    /// The resolver may have offered this slot to several clients at once;
    /// the store's uniqueness constraint on
    /// (therapist_id, scheduled_date, scheduled_time, non-cancelled) is the
    /// final arbiter of conflicts, surfaced here as a store error.
    pub async fn book_appointment(
        &self,
        request: BookingRequest,
    ) -> Result<Appointment, BookingError> {
        info!(
            "Booking appointment for therapist {} on {} {}",
            request.therapist_id, request.scheduled_date, request.scheduled_time
        );

        let scheduled_date = NaiveDate::parse_from_str(&request.scheduled_date, "%Y-%m-%d")
            .map_err(|_| {
                BookingError::Validation(format!(
                    "scheduled_date is not a YYYY-MM-DD date: {}",
                    request.scheduled_date
                ))
            })?;
        let scheduled_time = NaiveTime::parse_from_str(&request.scheduled_time, "%H:%M")
            .map_err(|_| {
                BookingError::Validation(format!(
                    "scheduled_time is not an HH:MM time: {}",
                    request.scheduled_time
                ))
            })?;

        let body = json!({
            "therapist_id": request.therapist_id,
            "client_name": request.client_name,
            "client_email": request.client_email,
            "client_phone": request.client_phone,
            "scheduled_date": scheduled_date.to_string(),
            "scheduled_time": scheduled_time.format("%H:%M").to_string(),
            "issues_tags": request.issues_tags,
            "report_file": request.report_file,
            "status": AppointmentStatus::Pending.to_string(),
        });

        let rows: Vec<Value> = self
            .store
            .request_returning(Method::POST, "/rest/v1/appointments", Some(body))
            .await
            .map_err(|e| BookingError::StoreUnavailable(e.to_string()))?;

        let appointment = Self::decode_one(rows, "failed to create appointment")?;

        info!("Appointment {} created in pending status", appointment.id);
        Ok(appointment)
    }

    /// Pending and accepted appointments for a therapist, both ordered by
    /// date then time.
    pub async fn dashboard(&self, therapist_id: i64) -> Result<DashboardResponse, BookingError> {
        debug!("Fetching dashboard for therapist {}", therapist_id);

        let pending = self
            .appointments_with_status(therapist_id, AppointmentStatus::Pending)
            .await?;
        let accepted = self
            .appointments_with_status(therapist_id, AppointmentStatus::Accepted)
            .await?;

        Ok(DashboardResponse { pending, accepted })
    }

    /// Accept a pending appointment: provision a calendar event with a
    /// conference link, persist the transition, notify both parties.
    ///
    /// Calendar failure degrades the link instead of rejecting the accept;
    /// email failures are logged and never roll the transition back.
    pub async fn accept_appointment(
        &self,
        appointment_id: i64,
    ) -> Result<AcceptOutcome, BookingError> {
        info!("Accepting appointment {}", appointment_id);

        let appointment = self.get_appointment(appointment_id).await?;

        if appointment.status != AppointmentStatus::Pending {
            return Err(BookingError::InvalidTransition {
                from: appointment.status,
            });
        }

        let therapist = self.get_therapist(appointment.therapist_id).await?;

        let (meet_link, calendar_event_id) = match self
            .calendar
            .create_meet_event(
                &therapist.email,
                &appointment.client_email,
                &appointment.client_name,
                appointment.scheduled_date,
                appointment.scheduled_time,
            )
            .await
        {
            Ok(handle) => (handle.meet_link, Some(handle.event_id)),
            Err(e) => {
                warn!(
                    "Calendar provisioning failed for appointment {}: {}",
                    appointment_id, e
                );
                (MANUAL_SETUP_LINK.to_string(), None)
            }
        };

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let update = json!({
            "status": AppointmentStatus::Accepted.to_string(),
            "meet_link": meet_link,
            "calendar_event_id": calendar_event_id,
        });

        let rows: Vec<Value> = self
            .store
            .request_returning(Method::PATCH, &path, Some(update))
            .await
            .map_err(|e| BookingError::StoreUnavailable(e.to_string()))?;

        let updated = Self::decode_one(rows, "failed to update appointment")?;

        self.send_acceptance_emails(&updated, &therapist, &meet_link)
            .await;

        info!("Appointment {} accepted", appointment_id);
        Ok(AcceptOutcome {
            appointment: updated,
            meet_link,
            calendar_event_id,
        })
    }

    // Private helper methods

    async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, BookingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::StoreUnavailable(e.to_string()))?;

        if rows.is_empty() {
            return Err(BookingError::NotFound(format!(
                "appointment {}",
                appointment_id
            )));
        }

        serde_json::from_value(rows[0].clone()).map_err(|e| BookingError::Store(e.to_string()))
    }

    async fn get_therapist(&self, therapist_id: i64) -> Result<Therapist, BookingError> {
        let path = format!("/rest/v1/therapists?id=eq.{}", therapist_id);
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::StoreUnavailable(e.to_string()))?;

        if rows.is_empty() {
            return Err(BookingError::Store(format!(
                "appointment references missing therapist {}",
                therapist_id
            )));
        }

        serde_json::from_value(rows[0].clone()).map_err(|e| BookingError::Store(e.to_string()))
    }

    async fn appointments_with_status(
        &self,
        therapist_id: i64,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, BookingError> {
        let path = format!(
            "/rest/v1/appointments?therapist_id=eq.{}&status=eq.{}&order=scheduled_date.asc,scheduled_time.asc",
            therapist_id, status
        );

        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::StoreUnavailable(e.to_string()))?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| BookingError::Store(e.to_string())))
            .collect()
    }

    async fn send_acceptance_emails(
        &self,
        appointment: &Appointment,
        therapist: &Therapist,
        meet_link: &str,
    ) {
        let client_body = format!(
            "<h2>Appointment Confirmed!</h2>\
             <p>Dear {},</p>\
             <p>Your therapy session has been confirmed.</p>\
             <p><strong>Therapist:</strong> {}</p>\
             <p><strong>Date:</strong> {}</p>\
             <p><strong>Time:</strong> {}</p>\
             <p><strong>Meet Link:</strong> <a href=\"{link}\">{link}</a></p>",
            appointment.client_name,
            therapist.name,
            appointment.scheduled_date,
            appointment.scheduled_time.format("%H:%M"),
            link = meet_link,
        );

        let therapist_body = format!(
            "<h2>Appointment Accepted</h2>\
             <p>You have accepted an appointment with {}</p>\
             <p><strong>Date:</strong> {}</p>\
             <p><strong>Time:</strong> {}</p>\
             <p><strong>Meet Link:</strong> <a href=\"{link}\">{link}</a></p>",
            appointment.client_name,
            appointment.scheduled_date,
            appointment.scheduled_time.format("%H:%M"),
            link = meet_link,
        );

        if let Err(e) = self
            .mailer
            .send(
                &appointment.client_email,
                "Therapy Appointment Confirmed",
                &client_body,
            )
            .await
        {
            warn!("Failed to email client {}: {}", appointment.client_email, e);
        }

        if let Err(e) = self
            .mailer
            .send(&therapist.email, "Appointment Accepted", &therapist_body)
            .await
        {
            warn!("Failed to email therapist {}: {}", therapist.email, e);
        }
    }

    fn decode_one(rows: Vec<Value>, context: &str) -> Result<Appointment, BookingError> {
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::Store(context.to_string()))?;

        serde_json::from_value(row).map_err(|e| BookingError::Store(e.to_string()))
    }
}
