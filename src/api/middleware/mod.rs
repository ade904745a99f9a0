//! API middleware.

mod auth;

pub use auth::{require_doctor, require_user};
