//! Doctor repository, including the search query.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::doctor::{self, ActiveModel, Entity as DoctorEntity};
use crate::domain::{Doctor, DoctorChanges, DoctorSearch, NewDoctor};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Doctor repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Find doctor by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Doctor>>;

    /// Find doctor by exact email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Doctor>>;

    /// Create a new doctor (availability starts out false)
    async fn create(&self, doctor: NewDoctor) -> AppResult<Doctor>;

    /// Apply the provided fields; `None` leaves a column untouched
    async fn update(&self, id: Uuid, changes: DoctorChanges) -> AppResult<Doctor>;

    /// Overwrite the availability flag
    async fn set_availability(&self, id: Uuid, available: bool) -> AppResult<Doctor>;

    /// Case-insensitive substring search; filters are ANDed
    async fn search(&self, filters: &DoctorSearch) -> AppResult<Vec<Doctor>>;
}

/// SeaORM-backed doctor repository
pub struct DoctorStore {
    db: DatabaseConnection,
}

impl DoctorStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: Uuid) -> AppResult<doctor::Model> {
        DoctorEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

/// Build a `%term%` LIKE pattern, lowercased, with wildcards in the term
/// escaped so they match literally.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn search_condition(filters: &DoctorSearch) -> Condition {
    let fields = [
        (doctor::Column::Name, filters.name.as_deref()),
        (doctor::Column::Location, filters.location.as_deref()),
        (doctor::Column::Specialty, filters.specialty.as_deref()),
        (doctor::Column::HospitalName, filters.clinic.as_deref()),
    ];

    fields
        .into_iter()
        .filter_map(|(column, term)| term.map(|t| (column, t)))
        .fold(Condition::all(), |condition, (column, term)| {
            condition.add(
                Expr::expr(Func::lower(Expr::col(column)))
                    .like(LikeExpr::new(contains_pattern(term)).escape('\\')),
            )
        })
}

#[async_trait]
impl DoctorRepository for DoctorStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Doctor>> {
        let result = DoctorEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Doctor::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Doctor>> {
        let result = DoctorEntity::find()
            .filter(doctor::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Doctor::from))
    }

    async fn create(&self, doctor: NewDoctor) -> AppResult<Doctor> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(doctor.name),
            email: Set(doctor.email),
            password_hash: Set(doctor.password_hash),
            specialty: Set(doctor.specialty),
            hospital_name: Set(doctor.hospital_name),
            location: Set(doctor.location),
            timings: Set(doctor.timings),
            map_location: Set(doctor.map_location),
            availability: Set(false),
            profile_image: Set(doctor.profile_image),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Doctor::from(model))
    }

    async fn update(&self, id: Uuid, changes: DoctorChanges) -> AppResult<Doctor> {
        let mut active: ActiveModel = self.load(id).await?.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(specialty) = changes.specialty {
            active.specialty = Set(specialty);
        }
        if let Some(hospital_name) = changes.hospital_name {
            active.hospital_name = Set(hospital_name);
        }
        if let Some(location) = changes.location {
            active.location = Set(location);
        }
        if let Some(timings) = changes.timings {
            active.timings = Set(timings);
        }
        if let Some(map_location) = changes.map_location {
            active.map_location = Set(Some(map_location));
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Doctor::from(model))
    }

    async fn set_availability(&self, id: Uuid, available: bool) -> AppResult<Doctor> {
        let mut active: ActiveModel = self.load(id).await?.into();
        active.availability = Set(available);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Doctor::from(model))
    }

    async fn search(&self, filters: &DoctorSearch) -> AppResult<Vec<Doctor>> {
        let models = DoctorEntity::find()
            .filter(search_condition(filters))
            .order_by_asc(doctor::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Doctor::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_lowercases_and_wraps() {
        assert_eq!(contains_pattern("MeeRa"), "%meera%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }
}
