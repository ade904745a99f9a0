//! User service - Patient profile use cases.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Password, PrincipalKind, UpdateUser, User, UserChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get a patient's own profile
    async fn get_profile(&self, id: Uuid) -> AppResult<User>;

    /// Apply the provided, non-blank fields to a patient's profile
    async fn update_profile(&self, id: Uuid, update: UpdateUser) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_profile(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_profile(&self, id: Uuid, update: UpdateUser) -> AppResult<User> {
        let update = update.normalized();
        let current = self.get_profile(id).await?;

        if let Some(email) = update.email.as_deref() {
            if email != current.email {
                if let Some(other) = self.uow.users().find_by_email(email).await? {
                    if other.id != id {
                        return Err(AppError::conflict(PrincipalKind::User.label()));
                    }
                }
            }
        }

        let password_hash = update
            .password
            .as_deref()
            .map(Password::new)
            .transpose()?
            .map(Password::into_string);

        let changes = UserChanges {
            name: update.name,
            email: update.email,
            phone: update.phone,
            age: update.age,
            address: update.address,
            password_hash,
        };

        let user = self.uow.users().update(id, changes).await?;
        tracing::info!(user_id = %id, "User profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{sample_user, MockRepos};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let mut repos = MockRepos::default();
        repos.users.expect_find_by_id().returning(|_| Ok(None));

        let service = UserManager::new(repos.into_uow());
        let result = service.get_profile(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_skips_blank_fields_and_rehashes_password() {
        let user = sample_user();
        let id = user.id;

        let mut repos = MockRepos::default();
        let current = user.clone();
        repos.users
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(current.clone())));
        repos.users
            .expect_update()
            .withf(move |target, changes| {
                *target == id
                    && changes.name.is_none()
                    && changes.email.is_none()
                    && changes.age == Some(35)
                    && changes
                        .password_hash
                        .as_deref()
                        .is_some_and(|h| Password::from_hash(h).verify("brand-new-pass"))
            })
            .returning(move |_, _| Ok(user.clone()));

        let service = UserManager::new(repos.into_uow());
        let update = UpdateUser {
            name: Some("   ".to_string()),
            email: Some(String::new()),
            age: Some(35),
            password: Some("brand-new-pass".to_string()),
            ..Default::default()
        };

        assert!(service.update_profile(id, update).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_email_taken_by_other_user() {
        let user = sample_user();
        let id = user.id;

        let mut repos = MockRepos::default();
        repos.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repos.users
            .expect_find_by_email()
            .with(eq("taken@example.com"))
            .returning(|_| Ok(Some(sample_user())));
        repos.users.expect_update().never();

        let service = UserManager::new(repos.into_uow());
        let update = UpdateUser {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        };

        let err = service.update_profile(id, update).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_short_password() {
        let user = sample_user();
        let id = user.id;

        let mut repos = MockRepos::default();
        repos.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repos.users.expect_update().never();

        let service = UserManager::new(repos.into_uow());
        let update = UpdateUser {
            password: Some("tiny".to_string()),
            ..Default::default()
        };

        let err = service.update_profile(id, update).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
