//! Data models shared by the page and API routes

mod contact;
mod review;
mod site;
mod user;

pub use contact::{ContactForm, ContactMessage};
pub use review::{NewReview, Review, ReviewRequest};
pub use site::{SiteConfig, SiteConfigRow};
pub use user::{AdminMessageRequest, RejectPhotographerRequest, User};
