//! Client galleries: preview images shared behind an access code, the
//! client's selection, and the studio's delivery of finals.

pub mod models;
pub mod queries;
pub mod routes;
pub mod services;

pub use models::{generate_access_code, Gallery, GalleryStatus};
pub use routes::router;
pub use services::GalleryError;
