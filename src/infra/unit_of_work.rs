//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository so services depend on one
//! abstraction instead of three.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    AppointmentRepository, AppointmentStore, DoctorRepository, DoctorStore, UserRepository,
    UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user (patient) repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get doctor repository
    fn doctors(&self) -> Arc<dyn DoctorRepository>;

    /// Get appointment repository
    fn appointments(&self) -> Arc<dyn AppointmentRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    doctor_repo: Arc<DoctorStore>,
    appointment_repo: Arc<AppointmentStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            doctor_repo: Arc::new(DoctorStore::new(db.clone())),
            appointment_repo: Arc::new(AppointmentStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorRepository> {
        self.doctor_repo.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointment_repo.clone()
    }
}
