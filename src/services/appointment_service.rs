//! Appointment service - Booking, listings and status transitions.
//!
//! Ownership is enforced here: a principal may only see or change its own
//! appointments, and a mismatch is reported as not-found.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Appointment, AppointmentStatus, BookAppointment, DoctorAppointment, NewAppointment,
    UserAppointment,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Appointment service trait for dependency injection.
#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Book a `Pending` appointment for the calling patient
    async fn book(&self, user_id: Uuid, request: BookAppointment) -> AppResult<Appointment>;

    /// Page through the caller's appointments; `requested_id` must be the caller
    async fn list_for_user(
        &self,
        user_id: Uuid,
        requested_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<UserAppointment>>;

    /// Patient cancels one of their own appointments
    async fn cancel_by_user(&self, user_id: Uuid, appointment_id: Uuid) -> AppResult<Appointment>;

    /// All appointments of the calling doctor; `requested_id` must be the caller
    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        requested_id: Uuid,
    ) -> AppResult<Vec<DoctorAppointment>>;

    /// Doctor changes the status of an appointment assigned to them
    async fn update_status_by_doctor(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
        status: AppointmentStatus,
        cancel_reason: Option<String>,
    ) -> AppResult<Appointment>;
}

/// Concrete implementation of AppointmentService using Unit of Work.
pub struct AppointmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AppointmentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn ensure_self(principal_id: Uuid, requested_id: Uuid) -> AppResult<()> {
    if principal_id != requested_id {
        tracing::warn!(%principal_id, %requested_id, "Listing requested for another principal");
        return Err(AppError::NotFound);
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> AppointmentService for AppointmentManager<U> {
    async fn book(&self, user_id: Uuid, request: BookAppointment) -> AppResult<Appointment> {
        self.uow
            .doctors()
            .find_by_id(request.doctor_id)
            .await?
            .ok_or_not_found()?;

        let appointment = self
            .uow
            .appointments()
            .create(NewAppointment {
                user_id,
                doctor_id: request.doctor_id,
                issue: request.issue,
                appointment_date: request.appointment_date,
            })
            .await?;

        tracing::info!(
            appointment_id = %appointment.id,
            %user_id,
            doctor_id = %appointment.doctor_id,
            "Appointment booked"
        );
        Ok(appointment)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        requested_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<UserAppointment>> {
        ensure_self(user_id, requested_id)?;

        let (data, total) = self.uow.appointments().list_for_user(user_id, &params).await?;
        Ok(Paginated::new(data, params.page(), params.limit(), total))
    }

    async fn cancel_by_user(&self, user_id: Uuid, appointment_id: Uuid) -> AppResult<Appointment> {
        let mut appointment = self
            .uow
            .appointments()
            .find_for_user(appointment_id, user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(%appointment_id, %user_id, "Cancel of unknown or foreign appointment");
                AppError::NotFound
            })?;

        appointment.cancel_by_user()?;

        let saved = self
            .uow
            .appointments()
            .save_status(appointment.id, appointment.status, appointment.cancel_reason)
            .await?;

        tracing::info!(%appointment_id, "Appointment cancelled by user");
        Ok(saved)
    }

    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        requested_id: Uuid,
    ) -> AppResult<Vec<DoctorAppointment>> {
        ensure_self(doctor_id, requested_id)?;
        self.uow.appointments().list_for_doctor(doctor_id).await
    }

    async fn update_status_by_doctor(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
        status: AppointmentStatus,
        cancel_reason: Option<String>,
    ) -> AppResult<Appointment> {
        let mut appointment = self
            .uow
            .appointments()
            .find_for_doctor(appointment_id, doctor_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(%appointment_id, %doctor_id, "Status change on unknown or foreign appointment");
                AppError::NotFound
            })?;

        appointment.apply_doctor_update(status, cancel_reason)?;

        let saved = self
            .uow
            .appointments()
            .save_status(appointment.id, appointment.status, appointment.cancel_reason)
            .await?;

        tracing::info!(%appointment_id, status = %saved.status, "Appointment status changed by doctor");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{sample_appointment, sample_doctor, MockRepos};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::{always, eq};

    #[tokio::test]
    async fn test_book_creates_pending_for_caller() {
        let doctor = sample_doctor();
        let doctor_id = doctor.id;
        let user_id = Uuid::new_v4();

        let mut repos = MockRepos::default();
        repos.doctors
            .expect_find_by_id()
            .with(eq(doctor_id))
            .returning(move |_| Ok(Some(doctor.clone())));
        repos.appointments
            .expect_create()
            .withf(move |new| new.user_id == user_id && new.issue == "fever")
            .returning(|new| {
                Ok(sample_appointment(new.user_id, new.doctor_id, AppointmentStatus::Pending))
            });

        let service = AppointmentManager::new(repos.into_uow());
        let booked = service
            .book(
                user_id,
                BookAppointment {
                    doctor_id,
                    issue: "fever".to_string(),
                    appointment_date: Utc.with_ymd_and_hms(2026, 11, 2, 10, 0, 0).unwrap(),
                },
            )
            .await
            .unwrap();

        assert_eq!(booked.status, AppointmentStatus::Pending);
        assert_eq!(booked.user_id, user_id);
        assert_eq!(booked.cancel_reason, None);
    }

    #[tokio::test]
    async fn test_book_unknown_doctor() {
        let mut repos = MockRepos::default();
        repos.doctors.expect_find_by_id().returning(|_| Ok(None));
        repos.appointments.expect_create().never();

        let service = AppointmentManager::new(repos.into_uow());
        let result = service
            .book(
                Uuid::new_v4(),
                BookAppointment {
                    doctor_id: Uuid::new_v4(),
                    issue: "fever".to_string(),
                    appointment_date: Utc::now(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_for_other_user_is_not_found() {
        let mut repos = MockRepos::default();
        repos.appointments.expect_list_for_user().never();

        let service = AppointmentManager::new(repos.into_uow());
        let result = service
            .list_for_user(Uuid::new_v4(), Uuid::new_v4(), PaginationParams::default())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_for_user_builds_meta() {
        let user_id = Uuid::new_v4();

        let mut repos = MockRepos::default();
        repos.appointments
            .expect_list_for_user()
            .with(eq(user_id), eq(PaginationParams::new(2, 4)))
            .returning(|_, _| Ok((Vec::new(), 9)));

        let service = AppointmentManager::new(repos.into_uow());
        let page = service
            .list_for_user(user_id, user_id, PaginationParams::new(2, 4))
            .await
            .unwrap();

        assert_eq!(page.meta.page, 2);
        assert_eq!(page.meta.per_page, 4);
        assert_eq!(page.meta.total, 9);
        assert_eq!(page.meta.total_pages, 3);
    }

    #[tokio::test]
    async fn test_cancel_terminal_does_not_write() {
        let user_id = Uuid::new_v4();
        let existing = sample_appointment(user_id, Uuid::new_v4(), AppointmentStatus::Cancelled);
        let appointment_id = existing.id;

        let mut repos = MockRepos::default();
        repos.appointments
            .expect_find_for_user()
            .with(eq(appointment_id), eq(user_id))
            .returning(move |_, _| Ok(Some(existing.clone())));
        repos.appointments.expect_save_status().never();

        let service = AppointmentManager::new(repos.into_uow());
        let err = service.cancel_by_user(user_id, appointment_id).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::InvalidState(ref m) if m == "Appointment is already cancelled. Cannot cancel."
        ));
    }

    #[tokio::test]
    async fn test_cancel_other_users_appointment_is_not_found() {
        let mut repos = MockRepos::default();
        repos.appointments
            .expect_find_for_user()
            .returning(|_, _| Ok(None));
        repos.appointments.expect_save_status().never();

        let service = AppointmentManager::new(repos.into_uow());
        let result = service.cancel_by_user(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_doctor_cancel_saves_reason() {
        let doctor_id = Uuid::new_v4();
        let existing = sample_appointment(Uuid::new_v4(), doctor_id, AppointmentStatus::Confirmed);
        let appointment_id = existing.id;
        let saved = {
            let mut saved = existing.clone();
            saved.status = AppointmentStatus::Cancelled;
            saved.cancel_reason = Some("clinic closed".to_string());
            saved
        };

        let mut repos = MockRepos::default();
        repos.appointments
            .expect_find_for_doctor()
            .with(eq(appointment_id), eq(doctor_id))
            .returning(move |_, _| Ok(Some(existing.clone())));
        repos.appointments
            .expect_save_status()
            .with(
                eq(appointment_id),
                eq(AppointmentStatus::Cancelled),
                eq(Some("clinic closed".to_string())),
            )
            .times(1)
            .returning(move |_, _, _| Ok(saved.clone()));

        let service = AppointmentManager::new(repos.into_uow());
        let result = service
            .update_status_by_doctor(
                doctor_id,
                appointment_id,
                AppointmentStatus::Cancelled,
                Some("  clinic closed ".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(result.cancel_reason.as_deref(), Some("clinic closed"));
    }

    #[tokio::test]
    async fn test_doctor_mismatch_is_not_found() {
        let mut repos = MockRepos::default();
        repos.appointments
            .expect_find_for_doctor()
            .with(always(), always())
            .returning(|_, _| Ok(None));
        repos.appointments.expect_save_status().never();

        let service = AppointmentManager::new(repos.into_uow());
        let result = service
            .update_status_by_doctor(
                Uuid::new_v4(),
                Uuid::new_v4(),
                AppointmentStatus::Confirmed,
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
