//! Doctor service - Doctor profiles, availability and search.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Doctor, DoctorChanges, DoctorSearch, Password, PrincipalKind, UpdateDoctor};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Doctor service trait for dependency injection.
#[async_trait]
pub trait DoctorService: Send + Sync {
    /// Get any doctor by ID (public detail and own profile)
    async fn get_doctor(&self, id: Uuid) -> AppResult<Doctor>;

    /// Apply the provided, non-blank fields to a doctor's profile
    async fn update_profile(&self, id: Uuid, update: UpdateDoctor) -> AppResult<Doctor>;

    /// Set the availability flag, or flip it when `requested` is `None`.
    /// Returns the stored value.
    async fn set_availability(&self, id: Uuid, requested: Option<bool>) -> AppResult<bool>;

    /// Filtered doctor list sorted by name
    async fn search(&self, filters: DoctorSearch) -> AppResult<Vec<Doctor>>;
}

/// Concrete implementation of DoctorService using Unit of Work.
pub struct DoctorManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DoctorManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DoctorService for DoctorManager<U> {
    async fn get_doctor(&self, id: Uuid) -> AppResult<Doctor> {
        self.uow.doctors().find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_profile(&self, id: Uuid, update: UpdateDoctor) -> AppResult<Doctor> {
        let update = update.normalized();
        let current = self.get_doctor(id).await?;

        if let Some(email) = update.email.as_deref() {
            if email != current.email {
                if let Some(other) = self.uow.doctors().find_by_email(email).await? {
                    if other.id != id {
                        return Err(AppError::conflict(PrincipalKind::Doctor.label()));
                    }
                }
            }
        }

        let password_hash = match update.password.as_deref() {
            Some(plain) => Some(Password::new(plain)?.into_string()),
            None => None,
        };

        let changes = DoctorChanges {
            name: update.name,
            email: update.email,
            specialty: update.specialty,
            hospital_name: update.hospital_name,
            location: update.location,
            timings: update.timings,
            map_location: update.map_location,
            password_hash,
        };

        let doctor = self.uow.doctors().update(id, changes).await?;
        tracing::info!(doctor_id = %id, "Doctor profile updated");
        Ok(doctor)
    }

    async fn set_availability(&self, id: Uuid, requested: Option<bool>) -> AppResult<bool> {
        let current = self.get_doctor(id).await?;
        let available = requested.unwrap_or(!current.availability);

        let doctor = self.uow.doctors().set_availability(id, available).await?;
        tracing::info!(doctor_id = %id, available = doctor.availability, "Availability updated");
        Ok(doctor.availability)
    }

    async fn search(&self, filters: DoctorSearch) -> AppResult<Vec<Doctor>> {
        let filters = filters.normalized();
        self.uow.doctors().search(&filters).await
    }
}
