//! Doctor domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::non_blank;
use super::principal::{Account, PrincipalKind};

/// Doctor domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub specialty: String,
    pub hospital_name: String,
    pub location: String,
    pub timings: String,
    pub map_location: Option<String>,
    /// Readiness to see patients; independent of booked appointments
    pub availability: bool,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account for Doctor {
    const KIND: PrincipalKind = PrincipalKind::Doctor;

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

/// Data required to persist a new doctor (password already hashed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub specialty: String,
    pub hospital_name: String,
    pub location: String,
    pub timings: String,
    pub map_location: Option<String>,
    pub profile_image: Option<String>,
}

/// Registration input as received from the client
#[derive(Debug, Clone)]
pub struct RegisterDoctor {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialty: String,
    pub hospital_name: String,
    pub location: String,
    pub timings: String,
    pub map_location: Option<String>,
    pub profile_image: Option<String>,
}

/// Self-service profile update; absent or blank fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateDoctor {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub hospital_name: Option<String>,
    pub location: Option<String>,
    pub timings: Option<String>,
    pub map_location: Option<String>,
    pub password: Option<String>,
}

impl UpdateDoctor {
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            email: non_blank(self.email),
            specialty: non_blank(self.specialty),
            hospital_name: non_blank(self.hospital_name),
            location: non_blank(self.location),
            timings: non_blank(self.timings),
            map_location: non_blank(self.map_location),
            password: self.password.filter(|p| !p.is_empty()),
        }
    }
}

/// Column-level changes handed to the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub hospital_name: Option<String>,
    pub location: Option<String>,
    pub timings: Option<String>,
    pub map_location: Option<String>,
    pub password_hash: Option<String>,
}

/// Doctor search filters. Each present filter is a case-insensitive
/// substring match; filters combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DoctorSearch {
    /// Substring of the doctor's name
    pub name: Option<String>,
    /// Substring of the practice location
    pub location: Option<String>,
    /// Substring of the specialty
    pub specialty: Option<String>,
    /// Substring of the clinic (hospital) name
    pub clinic: Option<String>,
}

impl DoctorSearch {
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            location: non_blank(self.location),
            specialty: non_blank(self.specialty),
            clinic: non_blank(self.clinic),
        }
    }
}

/// Doctor response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Dr. Meera Rao")]
    pub name: String,
    #[schema(example = "meera@clinic.example")]
    pub email: String,
    #[schema(example = "Cardiology")]
    pub specialty: String,
    #[schema(example = "City Heart Hospital")]
    pub hospital_name: String,
    #[schema(example = "Pune")]
    pub location: String,
    #[schema(example = "Mon-Fri 09:00-17:00")]
    pub timings: String,
    pub map_location: Option<String>,
    pub availability: bool,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name,
            email: doctor.email,
            specialty: doctor.specialty,
            hospital_name: doctor.hospital_name,
            location: doctor.location,
            timings: doctor.timings,
            map_location: doctor.map_location,
            availability: doctor.availability,
            profile_image: doctor.profile_image,
            created_at: doctor.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_normalization() {
        let search = DoctorSearch {
            name: Some("".to_string()),
            location: Some(" Pune ".to_string()),
            specialty: None,
            clinic: Some("   ".to_string()),
        }
        .normalized();

        assert_eq!(search.name, None);
        assert_eq!(search.location.as_deref(), Some("Pune"));
        assert_eq!(search.clinic, None);
    }

    #[test]
    fn test_update_normalization_keeps_content() {
        let update = UpdateDoctor {
            timings: Some("Sat 10:00-14:00".to_string()),
            location: Some("".to_string()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(update.timings.as_deref(), Some("Sat 10:00-14:00"));
        assert_eq!(update.location, None);
    }
}
