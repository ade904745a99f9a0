//! Appointment database entity for SeaORM.
//!
//! Status is stored as its wire string ("Pending", "Confirmed", ...).

use sea_orm::entity::prelude::*;

use crate::domain::{
    Appointment, AppointmentStatus, DoctorAppointment, DoctorSummary, PatientSummary,
    UserAppointment,
};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub issue: String,
    pub appointment_date: DateTimeUtc,
    pub status: String,
    pub cancel_reason: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::doctor::Entity",
        from = "Column::DoctorId",
        to = "super::doctor::Column::Id"
    )]
    Doctor,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::doctor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Doctor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Appointment {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = parse_status(&model.status)?;
        Ok(Appointment {
            id: model.id,
            user_id: model.user_id,
            doctor_id: model.doctor_id,
            issue: model.issue,
            appointment_date: model.appointment_date,
            status,
            cancel_reason: model.cancel_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Build the patient-dashboard row from an appointment and its doctor.
pub fn user_view(
    model: Model,
    doctor: Option<super::doctor::Model>,
) -> Result<UserAppointment, AppError> {
    Ok(UserAppointment {
        status: parse_status(&model.status)?,
        id: model.id,
        doctor_id: model.doctor_id,
        issue: model.issue,
        appointment_date: model.appointment_date,
        cancel_reason: model.cancel_reason,
        created_at: model.created_at,
        doctor: doctor.map(DoctorSummary::from),
    })
}

/// Build the doctor-dashboard row from an appointment and its patient.
pub fn doctor_view(
    model: Model,
    user: Option<super::user::Model>,
) -> Result<DoctorAppointment, AppError> {
    Ok(DoctorAppointment {
        status: parse_status(&model.status)?,
        id: model.id,
        user_id: model.user_id,
        issue: model.issue,
        appointment_date: model.appointment_date,
        cancel_reason: model.cancel_reason,
        created_at: model.created_at,
        user: user.map(PatientSummary::from),
    })
}

fn parse_status(raw: &str) -> Result<AppointmentStatus, AppError> {
    raw.parse()
        .map_err(|_| AppError::internal(format!("Unknown appointment status in storage: {}", raw)))
}
