//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{PatientSummary, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
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

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            phone: model.phone,
            age: model.age,
            address: model.address,
            profile_image: model.profile_image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Model> for PatientSummary {
    fn from(model: Model) -> Self {
        PatientSummary {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            age: model.age,
        }
    }
}
