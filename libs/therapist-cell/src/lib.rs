pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::*;
pub use services::availability::{resolve_slots, AvailabilityService};
pub use store::{PostgrestSchedulingStore, SchedulingStore};
