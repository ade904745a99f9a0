//! User (patient) domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::non_blank;
use super::principal::{Account, PrincipalKind};

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account for User {
    const KIND: PrincipalKind = PrincipalKind::User;

    fn id(&self) -> Uuid {
        self.id
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// Data required to persist a new user (password already hashed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
}

/// Registration input as received from the client
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
}

/// Self-service profile update; absent or blank fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub password: Option<String>,
}

impl UpdateUser {
    /// Drop blank strings so "provided" means "provided with content".
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            age: self.age,
            address: non_blank(self.address),
            password: self.password.filter(|p| !p.is_empty()),
        }
    }
}

/// Column-level changes handed to the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub password_hash: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Asha Patel")]
    pub name: String,
    #[schema(example = "asha@example.com")]
    pub email: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    /// Reference path of the stored profile image
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            age: user.age,
            address: user.address,
            profile_image: user.profile_image,
            created_at: user.created_at,
        }
    }
}
