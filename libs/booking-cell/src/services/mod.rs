pub mod booking;
pub mod calendar;
pub mod notification;

pub use booking::BookingService;
pub use calendar::CalendarClient;
pub use notification::MailerClient;
