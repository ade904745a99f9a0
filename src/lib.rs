//! MediBook - Doctor availability and appointment booking API
//!
//! Patients register, search doctors and book appointments; doctors manage
//! their availability and confirm or cancel the appointments assigned to
//! them.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities and the appointment state machine
//! - **services**: Application use cases and business logic
//! - **infra**: Database, repositories and image storage
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Appointment, AppointmentStatus, Doctor, Password, User};
pub use errors::{AppError, AppResult};
