//! Authenticated principals.
//!
//! Patients and doctors authenticate against separate credential stores.
//! Both are represented here by one tagged type so token handling is
//! written once.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_DOCTOR, ROLE_USER};

/// Which credential store a principal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Doctor,
}

impl PrincipalKind {
    /// Role marker embedded in tokens
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::User => ROLE_USER,
            PrincipalKind::Doctor => ROLE_DOCTOR,
        }
    }

    /// Entity label used in conflict messages ("User already exists")
    pub fn label(&self) -> &'static str {
        match self {
            PrincipalKind::User => "User",
            PrincipalKind::Doctor => "Doctor",
        }
    }

    /// Parse a role marker; unknown markers yield `None`.
    pub fn from_role(role: &str) -> Option<Self> {
        match role {
            ROLE_USER => Some(PrincipalKind::User),
            ROLE_DOCTOR => Some(PrincipalKind::Doctor),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated actor resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub kind: PrincipalKind,
}

/// Anything that can log in: exposes the fields the credential check needs.
pub trait Account {
    const KIND: PrincipalKind;

    fn id(&self) -> Uuid;
    fn email(&self) -> &str;
    fn password_hash(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_markers_round_trip() {
        for kind in [PrincipalKind::User, PrincipalKind::Doctor] {
            assert_eq!(PrincipalKind::from_role(kind.as_str()), Some(kind));
        }
        assert_eq!(PrincipalKind::from_role("admin"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(PrincipalKind::User.label(), "User");
        assert_eq!(PrincipalKind::Doctor.to_string(), "doctor");
    }
}
