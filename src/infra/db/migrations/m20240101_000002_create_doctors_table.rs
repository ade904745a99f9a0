//! Migration: Create doctors table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Doctors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Doctors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Doctors::Name).string().not_null())
                    .col(ColumnDef::new(Doctors::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Doctors::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Doctors::Specialty).string().not_null())
                    .col(ColumnDef::new(Doctors::HospitalName).string().not_null())
                    .col(ColumnDef::new(Doctors::Location).string().not_null())
                    .col(ColumnDef::new(Doctors::Timings).string().not_null())
                    .col(ColumnDef::new(Doctors::MapLocation).string().null())
                    .col(
                        ColumnDef::new(Doctors::Availability)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Doctors::ProfileImage).string().null())
                    .col(
                        ColumnDef::new(Doctors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Doctors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Doctors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Doctors {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Specialty,
    HospitalName,
    Location,
    Timings,
    MapLocation,
    Availability,
    ProfileImage,
    CreatedAt,
    UpdatedAt,
}
