//! Service Container - Centralized service access.
//!
//! Depends on service traits, not implementations, so handlers and tests
//! can swap any service independently.

use std::sync::Arc;

use super::{AppointmentService, AuthService, DoctorService, UserService};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get patient service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get doctor service
    fn doctors(&self) -> Arc<dyn DoctorService>;

    /// Get appointment service
    fn appointments(&self) -> Arc<dyn AppointmentService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    doctor_service: Arc<dyn DoctorService>,
    appointment_service: Arc<dyn AppointmentService>,
}

impl Services {
    /// Create a new service container from already-built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        doctor_service: Arc<dyn DoctorService>,
        appointment_service: Arc<dyn AppointmentService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            doctor_service,
            appointment_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{AppointmentManager, Authenticator, DoctorManager, UserManager};

        let uow = Arc::new(Persistence::new(db));

        Self::new(
            Arc::new(Authenticator::new(uow.clone(), config)),
            Arc::new(UserManager::new(uow.clone())),
            Arc::new(DoctorManager::new(uow.clone())),
            Arc::new(AppointmentManager::new(uow)),
        )
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorService> {
        self.doctor_service.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentService> {
        self.appointment_service.clone()
    }
}
