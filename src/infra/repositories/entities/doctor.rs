//! Doctor database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Doctor, DoctorSummary};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub specialty: String,
    pub hospital_name: String,
    pub location: String,
    pub timings: String,
    pub map_location: Option<String>,
    pub availability: bool,
    pub profile_image: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::appointment::Entity")]
    Appointment,
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Doctor {
    fn from(model: Model) -> Self {
        Doctor {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            specialty: model.specialty,
            hospital_name: model.hospital_name,
            location: model.location,
            timings: model.timings,
            map_location: model.map_location,
            availability: model.availability,
            profile_image: model.profile_image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Model> for DoctorSummary {
    fn from(model: Model) -> Self {
        DoctorSummary {
            id: model.id,
            name: model.name,
            specialty: model.specialty,
        }
    }
}
