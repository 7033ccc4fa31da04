// libs/therapist-cell/src/services/availability.rs
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use shared_config::AppConfig;

use crate::models::{AvailabilityTemplate, SchedulingError};
use crate::store::{PostgrestSchedulingStore, SchedulingStore};

/// Maps a calendar date to the canonical weekday ordinal used by stored
/// templates: Monday = 0 through Sunday = 6.
pub fn day_ordinal(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Expands availability templates into the bookable `"HH:MM"` labels for one
/// date.
///
/// For each enabled template, hourly labels are generated from `start_time`
/// while the slot start is strictly less than `end_time`, so a template
/// spanning a partial final hour drops it. A label is emitted only if it is
/// not in the occupied set and the slot's absolute datetime lies strictly
/// beyond `now + lead_time`. Labels keep generation order (template order,
/// chronological within a template); overlapping templates are not
/// de-duplicated, templates are assumed disjoint by construction.
pub fn resolve_slots(
    templates: &[AvailabilityTemplate],
    occupied: &HashSet<NaiveTime>,
    date: NaiveDate,
    now: DateTime<Utc>,
    lead_time: Duration,
) -> Vec<String> {
    let cutoff = now + lead_time;
    let mut labels = Vec::new();

    for template in templates {
        if !template.is_available {
            continue;
        }

        let mut current = template.start_time;
        while current < template.end_time {
            let slot_datetime = date.and_time(current).and_utc();

            if !occupied.contains(&current) && slot_datetime > cutoff {
                labels.push(current.format("%H:%M").to_string());
            }

            // NaiveTime arithmetic wraps at midnight; a wrapped step would
            // restart below end_time and never terminate.
            let (next, wrapped) = current.overflowing_add_signed(Duration::hours(1));
            if wrapped != 0 {
                break;
            }
            current = next;
        }
    }

    labels
}

/// Computes the free bookable slots for a therapist on a requested date.
///
/// Pure read-and-compute: fetches templates and the day's appointments
/// through the injected store, then filters by occupancy and the lead-time
/// cutoff. An unknown therapist yields an empty list, not an error.
pub struct AvailabilityService {
    store: Arc<dyn SchedulingStore>,
    lead_time: Duration,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(PostgrestSchedulingStore::new(config)),
            lead_time: Duration::hours(config.lead_time_hours),
        }
    }

    /// Substitute a store implementation, primarily for tests.
    pub fn with_store(store: Arc<dyn SchedulingStore>, lead_time: Duration) -> Self {
        Self { store, lead_time }
    }

    /// Resolve slots for a raw `YYYY-MM-DD` date string at the current
    /// instant. A date that does not parse is a client error.
    pub async fn available_slots(
        &self,
        therapist_id: i64,
        date: &str,
    ) -> Result<Vec<String>, SchedulingError> {
        let target_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| SchedulingError::MalformedDate(format!("not a YYYY-MM-DD date: {date}")))?;

        self.available_slots_on(therapist_id, target_date, Utc::now())
            .await
    }

    /// Resolve slots for a parsed date, evaluated at `now`. Split out so the
    /// lead-time cutoff is deterministic under test.
    pub async fn available_slots_on(
        &self,
        therapist_id: i64,
        target_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, SchedulingError> {
        let day_of_week = day_ordinal(target_date);
        debug!(
            "Resolving slots for therapist {} on {} (weekday ordinal {})",
            therapist_id, target_date, day_of_week
        );

        let templates = self.store.list_templates(therapist_id, day_of_week).await?;
        let appointments = self.store.list_appointments(therapist_id, target_date).await?;

        let occupied: HashSet<NaiveTime> = appointments
            .iter()
            .filter(|appointment| appointment.occupies_slot())
            .map(|appointment| appointment.scheduled_time)
            .collect();

        let slots = resolve_slots(&templates, &occupied, target_date, now, self.lead_time);

        debug!("Resolved {} free slots", slots.len());
        Ok(slots)
    }
}
