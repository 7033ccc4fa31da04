pub mod availability;
pub mod therapist;

pub use availability::AvailabilityService;
pub use therapist::TherapistService;
