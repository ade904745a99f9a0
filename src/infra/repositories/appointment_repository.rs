//! Appointment repository.
//!
//! Every lookup used for a mutation is scoped by owner, so a caller that
//! does not own an appointment sees the same `None` as for a missing one.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::appointment::{self, doctor_view, user_view, ActiveModel, Entity as AppointmentEntity};
use super::entities::doctor::Entity as DoctorEntity;
use super::entities::user::Entity as UserEntity;
use crate::domain::{
    Appointment, AppointmentStatus, DoctorAppointment, NewAppointment, UserAppointment,
};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Appointment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert a new `Pending` appointment
    async fn create(&self, appointment: NewAppointment) -> AppResult<Appointment>;

    /// Find an appointment owned by the given user
    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Appointment>>;

    /// Find an appointment assigned to the given doctor
    async fn find_for_doctor(&self, id: Uuid, doctor_id: Uuid)
        -> AppResult<Option<Appointment>>;

    /// Persist status and reason (last write wins)
    async fn save_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        cancel_reason: Option<String>,
    ) -> AppResult<Appointment>;

    /// One page of a user's appointments, newest date first, with the total count
    async fn list_for_user(
        &self,
        user_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<UserAppointment>, u64)>;

    /// All of a doctor's appointments, earliest date first
    async fn list_for_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<DoctorAppointment>>;
}

/// SeaORM-backed appointment repository
pub struct AppointmentStore {
    db: DatabaseConnection,
}

impl AppointmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepository for AppointmentStore {
    async fn create(&self, appointment: NewAppointment) -> AppResult<Appointment> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(appointment.user_id),
            doctor_id: Set(appointment.doctor_id),
            issue: Set(appointment.issue),
            appointment_date: Set(appointment.appointment_date),
            status: Set(AppointmentStatus::Pending.as_str().to_string()),
            cancel_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Appointment::try_from(model)
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Appointment>> {
        AppointmentEntity::find_by_id(id)
            .filter(appointment::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn find_for_doctor(
        &self,
        id: Uuid,
        doctor_id: Uuid,
    ) -> AppResult<Option<Appointment>> {
        AppointmentEntity::find_by_id(id)
            .filter(appointment::Column::DoctorId.eq(doctor_id))
            .one(&self.db)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn save_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        cancel_reason: Option<String>,
    ) -> AppResult<Appointment> {
        let model = AppointmentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.cancel_reason = Set(cancel_reason);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Appointment::try_from(model)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<UserAppointment>, u64)> {
        let paginator = AppointmentEntity::find()
            .filter(appointment::Column::UserId.eq(user_id))
            .find_also_related(DoctorEntity)
            .order_by_desc(appointment::Column::AppointmentDate)
            .order_by_desc(appointment::Column::CreatedAt)
            .paginate(&self.db, params.limit());

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.page_index()).await?;

        let data = rows
            .into_iter()
            .map(|(model, doctor)| user_view(model, doctor))
            .collect::<AppResult<Vec<_>>>()?;

        Ok((data, total))
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<DoctorAppointment>> {
        let rows = AppointmentEntity::find()
            .filter(appointment::Column::DoctorId.eq(doctor_id))
            .find_also_related(UserEntity)
            .order_by_asc(appointment::Column::AppointmentDate)
            .order_by_asc(appointment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        rows.into_iter()
            .map(|(model, user)| doctor_view(model, user))
            .collect()
    }
}
