//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, ImageStore};
use crate::services::{
    AppointmentService, AuthService, DoctorService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Patient service
    pub user_service: Arc<dyn UserService>,
    /// Doctor service
    pub doctor_service: Arc<dyn DoctorService>,
    /// Appointment service
    pub appointment_service: Arc<dyn AppointmentService>,
    /// Profile image storage
    pub images: Arc<ImageStore>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let images = Arc::new(ImageStore::new(config.upload_dir.clone()));
        let container = Services::from_connection(database.get_connection(), config);

        Self::new(&container, images, database)
    }

    /// Create application state from any service container.
    pub fn new(
        services: &dyn ServiceContainer,
        images: Arc<ImageStore>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            doctor_service: services.doctors(),
            appointment_service: services.appointments(),
            images,
            database,
        }
    }
}
