//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod appointment_repository;
mod doctor_repository;
pub(crate) mod entities;
mod user_repository;

pub use appointment_repository::{AppointmentRepository, AppointmentStore};
pub use doctor_repository::{DoctorRepository, DoctorStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use appointment_repository::MockAppointmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use doctor_repository::MockDoctorRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
