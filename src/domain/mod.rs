//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the appointment state machine. Nothing in
//! here touches the database or HTTP.

pub mod appointment;
pub mod doctor;
pub mod password;
pub mod principal;
pub mod user;

pub use appointment::{
    Appointment, AppointmentStatus, BookAppointment, DoctorAppointment, DoctorSummary,
    NewAppointment, PatientSummary, UserAppointment,
};
pub use doctor::{
    Doctor, DoctorChanges, DoctorResponse, DoctorSearch, NewDoctor, RegisterDoctor, UpdateDoctor,
};
pub use password::Password;
pub use principal::{Account, Principal, PrincipalKind};
pub use user::{NewUser, RegisterUser, UpdateUser, User, UserChanges, UserResponse};

use validator::ValidationError;

/// Trim and discard empty strings.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Field validator for required text: whitespace alone does not count.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank_rejects_whitespace() {
        assert!(not_blank("fever").is_ok());
        assert!(not_blank("  x ").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t\n ").is_err());
    }

    #[test]
    fn test_non_blank_trims() {
        assert_eq!(non_blank(Some("  Pune ".to_string())).as_deref(), Some("Pune"));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
