//! Bookings: the stored result of a quote plus the client's contact and shoot
//! details, with payment flags set by the payment collaborator.

pub mod models;
pub mod queries;
pub mod requests;
pub mod routes;
pub mod services;

pub use models::{Booking, BookingStatus, PaymentKind};
pub use routes::router;
pub use services::BookingError;
