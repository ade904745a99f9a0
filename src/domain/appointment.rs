//! Appointment entity and its status state machine.
//!
//! ```text
//!            doctor: Confirmed
//!   Pending ───────────────────▶ Confirmed
//!      │ ▲                          │
//!      │ └──── doctor: Pending ─────┤
//!      │                            │
//!      └──────▶ Cancelled ◀─────────┘
//!        user cancel / doctor cancel (+ reason)
//! ```
//!
//! `Cancelled` and `Completed` are terminal. Nothing in the system moves an
//! appointment to `Completed`; the value is recognized so stored records
//! holding it are still treated as terminal.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::non_blank;
use crate::config::{STATUS_CANCELLED, STATUS_COMPLETED, STATUS_CONFIRMED, STATUS_PENDING};
use crate::errors::{AppError, AppResult};

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => STATUS_PENDING,
            AppointmentStatus::Confirmed => STATUS_CONFIRMED,
            AppointmentStatus::Cancelled => STATUS_CANCELLED,
            AppointmentStatus::Completed => STATUS_COMPLETED,
        }
    }

    /// No further transitions are allowed from a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Cancelled | AppointmentStatus::Completed
        )
    }

    /// Parse a status a doctor is allowed to request.
    ///
    /// `Completed` is not settable through any endpoint.
    pub fn doctor_target(value: &str) -> AppResult<Self> {
        match value.parse::<Self>()? {
            AppointmentStatus::Completed => Err(AppError::bad_request("Invalid status value")),
            status => Ok(status),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            STATUS_PENDING => Ok(AppointmentStatus::Pending),
            STATUS_CONFIRMED => Ok(AppointmentStatus::Confirmed),
            STATUS_CANCELLED => Ok(AppointmentStatus::Cancelled),
            STATUS_COMPLETED => Ok(AppointmentStatus::Completed),
            _ => Err(AppError::bad_request("Invalid status value")),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appointment domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    #[schema(example = "fever")]
    pub issue: String,
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    /// Set only when a doctor cancels with a reason
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Patient-initiated cancellation. No reason is recorded on this path.
    pub fn cancel_by_user(&mut self) -> AppResult<()> {
        self.ensure_not_terminal("Cannot cancel.")?;
        self.status = AppointmentStatus::Cancelled;
        Ok(())
    }

    /// Doctor-initiated status change.
    ///
    /// Re-confirming a confirmed appointment overwrites it with the same
    /// value. A reason survives only alongside `Cancelled`.
    pub fn apply_doctor_update(
        &mut self,
        status: AppointmentStatus,
        cancel_reason: Option<String>,
    ) -> AppResult<()> {
        if status == AppointmentStatus::Completed {
            return Err(AppError::bad_request("Invalid status value"));
        }
        self.ensure_not_terminal("Status cannot be changed.")?;

        self.status = status;
        self.cancel_reason = match status {
            AppointmentStatus::Cancelled => non_blank(cancel_reason),
            _ => None,
        };
        Ok(())
    }

    fn ensure_not_terminal(&self, consequence: &str) -> AppResult<()> {
        if self.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Appointment is already {}. {}",
                self.status.as_str().to_lowercase(),
                consequence
            )));
        }
        Ok(())
    }
}

/// Booking request from a patient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookAppointment {
    pub doctor_id: Uuid,
    pub issue: String,
    pub appointment_date: DateTime<Utc>,
}

/// Data required to persist a new appointment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    pub issue: String,
    pub appointment_date: DateTime<Utc>,
}

/// Doctor fields shown next to a patient's appointment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
}

/// Patient fields shown next to a doctor's appointment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
}

/// Appointment as listed on the patient dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAppointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub issue: String,
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Looked up at read time; `None` only if the doctor record is gone
    pub doctor: Option<DoctorSummary>,
}

/// Appointment as listed on the doctor dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorAppointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub issue: String,
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user: Option<PatientSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(status: AppointmentStatus) -> Appointment {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            issue: "fever".to_string(),
            appointment_date: now,
            status,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_cancels_pending_and_confirmed() {
        for status in [AppointmentStatus::Pending, AppointmentStatus::Confirmed] {
            let mut appt = appointment(status);
            appt.cancel_by_user().unwrap();
            assert_eq!(appt.status, AppointmentStatus::Cancelled);
            assert_eq!(appt.cancel_reason, None);
        }
    }

    #[test]
    fn test_user_cannot_cancel_terminal() {
        let mut cancelled = appointment(AppointmentStatus::Cancelled);
        let before = cancelled.clone();
        let err = cancelled.cancel_by_user().unwrap_err();
        assert!(matches!(err, AppError::InvalidState(ref m) if m == "Appointment is already cancelled. Cannot cancel."));
        assert_eq!(cancelled, before);

        let mut completed = appointment(AppointmentStatus::Completed);
        let err = completed.cancel_by_user().unwrap_err();
        assert!(matches!(err, AppError::InvalidState(ref m) if m.contains("already completed")));
        assert_eq!(completed.status, AppointmentStatus::Completed);
    }

    #[test]
    fn test_doctor_confirm_is_idempotent() {
        let mut appt = appointment(AppointmentStatus::Pending);
        appt.apply_doctor_update(AppointmentStatus::Confirmed, None).unwrap();
        let once = appt.clone();
        appt.apply_doctor_update(AppointmentStatus::Confirmed, None).unwrap();
        assert_eq!(appt, once);
    }

    #[test]
    fn test_doctor_cancel_keeps_reason() {
        let mut appt = appointment(AppointmentStatus::Pending);
        appt.apply_doctor_update(
            AppointmentStatus::Cancelled,
            Some("clinic closed".to_string()),
        )
        .unwrap();
        assert_eq!(appt.status, AppointmentStatus::Cancelled);
        assert_eq!(appt.cancel_reason.as_deref(), Some("clinic closed"));
    }

    #[test]
    fn test_non_cancel_status_clears_reason() {
        let mut appt = appointment(AppointmentStatus::Confirmed);
        appt.cancel_reason = Some("stale".to_string());
        appt.apply_doctor_update(AppointmentStatus::Pending, Some("ignored".to_string()))
            .unwrap();
        assert_eq!(appt.status, AppointmentStatus::Pending);
        assert_eq!(appt.cancel_reason, None);
    }

    #[test]
    fn test_doctor_cannot_touch_terminal() {
        let mut appt = appointment(AppointmentStatus::Cancelled);
        let err = appt
            .apply_doctor_update(AppointmentStatus::Confirmed, None)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(appt.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_doctor_target_rejects_completed_and_garbage() {
        assert_eq!(
            AppointmentStatus::doctor_target("Confirmed").unwrap(),
            AppointmentStatus::Confirmed
        );
        assert!(matches!(
            AppointmentStatus::doctor_target("Completed"),
            Err(AppError::BadRequest(_))
        ));
        assert!(AppointmentStatus::doctor_target("approved").is_err());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Cancelled).unwrap(),
            "\"Cancelled\""
        );
        assert_eq!(
            "Completed".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Completed
        );
    }
}
