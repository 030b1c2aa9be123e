pub mod booking;
pub mod conflict;
pub mod lifecycle;
pub mod resolver;
pub mod slots;

pub use booking::BookingService;
pub use lifecycle::AppointmentLifecycleService;
