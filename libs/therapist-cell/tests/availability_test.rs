use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use therapist_cell::models::{AppointmentSlot, AvailabilityTemplate, SchedulingError};
use therapist_cell::services::availability::{day_ordinal, resolve_slots, AvailabilityService};
use therapist_cell::store::SchedulingStore;

// ==============================================================================
// Test fixtures
// ==============================================================================

const THERAPIST: i64 = 1;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn template(id: i64, day_of_week: u8, start: NaiveTime, end: NaiveTime) -> AvailabilityTemplate {
    AvailabilityTemplate {
        id,
        therapist_id: THERAPIST,
        day_of_week,
        start_time: start,
        end_time: end,
        is_available: true,
    }
}

fn booked(at: NaiveTime, status: &str) -> AppointmentSlot {
    AppointmentSlot {
        scheduled_time: at,
        status: status.to_string(),
    }
}

/// In-memory stand-in for the persistent store.
struct InMemoryStore {
    templates: Vec<AvailabilityTemplate>,
    appointments: Vec<(i64, NaiveDate, AppointmentSlot)>,
    fail: bool,
}

impl InMemoryStore {
    fn new(templates: Vec<AvailabilityTemplate>) -> Self {
        Self {
            templates,
            appointments: Vec::new(),
            fail: false,
        }
    }

    fn with_appointments(
        mut self,
        therapist_id: i64,
        on: NaiveDate,
        appointments: Vec<AppointmentSlot>,
    ) -> Self {
        for appointment in appointments {
            self.appointments.push((therapist_id, on, appointment));
        }
        self
    }

    fn unavailable() -> Self {
        Self {
            templates: Vec::new(),
            appointments: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SchedulingStore for InMemoryStore {
    async fn list_templates(
        &self,
        therapist_id: i64,
        day_of_week: u8,
    ) -> Result<Vec<AvailabilityTemplate>, SchedulingError> {
        if self.fail {
            return Err(SchedulingError::StoreUnavailable("connection refused".to_string()));
        }
        Ok(self
            .templates
            .iter()
            .filter(|t| t.therapist_id == therapist_id && t.day_of_week == day_of_week)
            .cloned()
            .collect())
    }

    async fn list_appointments(
        &self,
        therapist_id: i64,
        on: NaiveDate,
    ) -> Result<Vec<AppointmentSlot>, SchedulingError> {
        if self.fail {
            return Err(SchedulingError::StoreUnavailable("connection refused".to_string()));
        }
        Ok(self
            .appointments
            .iter()
            .filter(|(id, d, _)| *id == therapist_id && *d == on)
            .map(|(_, _, a)| a.clone())
            .collect())
    }
}

fn service(store: InMemoryStore) -> AvailabilityService {
    AvailabilityService::with_store(Arc::new(store), Duration::hours(24))
}

/// A date comfortably in the future so the default lead time never filters,
/// and an evaluation instant far in the past for the scenarios that ignore
/// lead time entirely.
fn target() -> NaiveDate {
    date(2030, 6, 3)
}

fn long_ago() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

// ==============================================================================
// Pure slot generation
// ==============================================================================

#[test]
fn morning_template_expands_to_hourly_labels() {
    // Scenario: (09:00, 12:00), nothing booked, now far in the past.
    let templates = vec![template(1, day_ordinal(target()), time(9, 0), time(12, 0))];

    let slots = resolve_slots(&templates, &HashSet::new(), target(), long_ago(), Duration::hours(24));

    assert_eq!(slots, vec!["09:00", "10:00", "11:00"]);
}

#[test]
fn raw_slot_count_is_ceil_of_span_and_last_start_is_before_end() {
    let cases = [
        (time(9, 0), time(12, 0), 3),
        (time(9, 0), time(10, 30), 2),
        (time(9, 0), time(10, 0), 1),
        (time(8, 15), time(11, 15), 3),
    ];

    for (start, end, expected) in cases {
        let templates = vec![template(1, day_ordinal(target()), start, end)];
        let slots =
            resolve_slots(&templates, &HashSet::new(), target(), long_ago(), Duration::zero());

        assert_eq!(slots.len(), expected, "span {start}-{end}");
        let last = NaiveTime::parse_from_str(slots.last().unwrap(), "%H:%M").unwrap();
        assert!(last < end);
    }
}

#[test]
fn partial_final_hour_is_truncated() {
    // (09:00, 10:30): the loop keeps generating while the slot START is
    // strictly before the end, so the half-open 10:00 slot is the last one.
    let templates = vec![template(1, day_ordinal(target()), time(9, 0), time(10, 30))];

    let slots = resolve_slots(&templates, &HashSet::new(), target(), long_ago(), Duration::hours(24));

    assert_eq!(slots, vec!["09:00", "10:00"]);
}

#[test]
fn occupied_labels_are_never_emitted() {
    let templates = vec![template(1, day_ordinal(target()), time(9, 0), time(12, 0))];
    let occupied: HashSet<NaiveTime> = [time(10, 0)].into_iter().collect();

    let slots = resolve_slots(&templates, &occupied, target(), long_ago(), Duration::hours(24));

    assert_eq!(slots, vec!["09:00", "11:00"]);
    assert!(!slots.contains(&"10:00".to_string()));
}

#[test]
fn lead_time_cutoff_is_strict() {
    let templates = vec![template(1, day_ordinal(target()), time(9, 0), time(12, 0))];

    // cutoff lands exactly on the 10:00 slot; only strictly-later slots pass
    let now = target()
        .pred_opt()
        .unwrap()
        .and_time(time(10, 0))
        .and_utc();

    let slots = resolve_slots(&templates, &HashSet::new(), target(), now, Duration::hours(24));

    assert_eq!(slots, vec!["11:00"]);
}

#[test]
fn disabled_template_generates_nothing() {
    let mut disabled = template(1, day_ordinal(target()), time(9, 0), time(12, 0));
    disabled.is_available = false;

    let slots =
        resolve_slots(&[disabled], &HashSet::new(), target(), long_ago(), Duration::hours(24));

    assert!(slots.is_empty());
}

#[test]
fn generation_stops_at_midnight_wraparound() {
    let templates = vec![template(1, day_ordinal(target()), time(22, 30), time(23, 59))];

    let slots = resolve_slots(&templates, &HashSet::new(), target(), long_ago(), Duration::hours(24));

    assert_eq!(slots, vec!["22:30", "23:30"]);
}

#[test]
fn labels_keep_template_order_then_chronological_order() {
    // Afternoon template listed first stays first; overlap is not
    // de-duplicated (templates are assumed disjoint by construction).
    let dow = day_ordinal(target());
    let templates = vec![
        template(1, dow, time(14, 0), time(16, 0)),
        template(2, dow, time(9, 0), time(11, 0)),
    ];

    let slots = resolve_slots(&templates, &HashSet::new(), target(), long_ago(), Duration::hours(24));

    assert_eq!(slots, vec!["14:00", "15:00", "09:00", "10:00"]);
}

// ==============================================================================
// Resolver service against the in-memory store
// ==============================================================================

#[tokio::test]
async fn pending_appointment_occupies_its_slot() {
    let store = InMemoryStore::new(vec![template(
        1,
        day_ordinal(target()),
        time(9, 0),
        time(12, 0),
    )])
    .with_appointments(THERAPIST, target(), vec![booked(time(10, 0), "pending")]);

    let slots = service(store)
        .available_slots_on(THERAPIST, target(), long_ago())
        .await
        .unwrap();

    assert_eq!(slots, vec!["09:00", "11:00"]);
}

#[tokio::test]
async fn cancelled_appointment_does_not_occupy() {
    let store = InMemoryStore::new(vec![template(
        1,
        day_ordinal(target()),
        time(9, 0),
        time(12, 0),
    )])
    .with_appointments(THERAPIST, target(), vec![booked(time(10, 0), "cancelled")]);

    let slots = service(store)
        .available_slots_on(THERAPIST, target(), long_ago())
        .await
        .unwrap();

    assert_eq!(slots, vec!["09:00", "10:00", "11:00"]);
}

#[tokio::test]
async fn accepted_appointment_occupies_its_slot() {
    let store = InMemoryStore::new(vec![template(
        1,
        day_ordinal(target()),
        time(9, 0),
        time(12, 0),
    )])
    .with_appointments(THERAPIST, target(), vec![booked(time(9, 0), "accepted")]);

    let slots = service(store)
        .available_slots_on(THERAPIST, target(), long_ago())
        .await
        .unwrap();

    assert_eq!(slots, vec!["10:00", "11:00"]);
}

#[tokio::test]
async fn slots_within_lead_time_are_withheld() {
    // Evaluation instant less than 24h before the 09:00 slot.
    let store = InMemoryStore::new(vec![template(
        1,
        day_ordinal(target()),
        time(9, 0),
        time(12, 0),
    )]);

    let now = target().pred_opt().unwrap().and_time(time(9, 30)).and_utc();
    let slots = service(store)
        .available_slots_on(THERAPIST, target(), now)
        .await
        .unwrap();

    assert_eq!(slots, vec!["10:00", "11:00"]);
}

#[tokio::test]
async fn unknown_therapist_yields_empty_list() {
    let store = InMemoryStore::new(vec![template(
        1,
        day_ordinal(target()),
        time(9, 0),
        time(12, 0),
    )]);

    let slots = service(store)
        .available_slots_on(999, target(), long_ago())
        .await
        .unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn templates_for_other_weekdays_are_ignored() {
    let other_day = (day_ordinal(target()) + 1) % 7;
    let store = InMemoryStore::new(vec![template(1, other_day, time(9, 0), time(12, 0))]);

    let slots = service(store)
        .available_slots_on(THERAPIST, target(), long_ago())
        .await
        .unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn resolution_is_idempotent_without_state_changes() {
    let store = InMemoryStore::new(vec![template(
        1,
        day_ordinal(target()),
        time(9, 0),
        time(12, 0),
    )])
    .with_appointments(THERAPIST, target(), vec![booked(time(11, 0), "pending")]);

    let svc = service(store);
    let now = long_ago();

    let first = svc.available_slots_on(THERAPIST, target(), now).await.unwrap();
    let second = svc.available_slots_on(THERAPIST, target(), now).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn malformed_date_is_a_client_error() {
    let svc = service(InMemoryStore::new(vec![]));

    let err = svc.available_slots(THERAPIST, "06/03/2030").await.unwrap_err();

    assert_matches::assert_matches!(err, SchedulingError::MalformedDate(_));
}

#[tokio::test]
async fn store_outage_surfaces_as_store_unavailable() {
    let svc = service(InMemoryStore::unavailable());

    let err = svc
        .available_slots_on(THERAPIST, target(), long_ago())
        .await
        .unwrap_err();

    assert_matches::assert_matches!(err, SchedulingError::StoreUnavailable(_));
}
