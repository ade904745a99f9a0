//! Appointment handlers.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::api::middleware::{require_doctor, require_user};
use crate::api::AppState;
use crate::domain::{
    not_blank, Appointment, AppointmentStatus, BookAppointment, DoctorAppointment, Principal,
    UserAppointment,
};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, Paginated, PaginationMeta, PaginationParams};

/// Booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    #[validate(custom(function = "not_blank", message = "Issue is required"))]
    #[schema(example = "fever")]
    pub issue: String,
    /// RFC 3339 timestamp; a local `YYYY-MM-DDTHH:MM[:SS]` or a bare date
    /// is read as UTC
    #[schema(example = "2026-11-02T10:00:00Z")]
    pub appointment_date: String,
}

/// Doctor status change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// One of `Pending`, `Confirmed`, `Cancelled`
    #[schema(example = "Cancelled")]
    pub status: String,
    /// Kept only when cancelling
    #[schema(example = "Clinic closed")]
    pub cancel_reason: Option<String>,
}

/// Cancellation acknowledgement
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelResponse {
    #[schema(example = "Appointment cancelled successfully")]
    pub message: String,
    pub appointment: Appointment,
}

/// Status change acknowledgement
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "Status updated")]
    pub message: String,
    pub appointment: Appointment,
}

/// One page of a patient's appointments (OpenAPI schema)
#[derive(ToSchema)]
pub struct UserAppointmentPage {
    pub data: Vec<UserAppointment>,
    pub meta: PaginationMeta,
}

fn parse_appointment_date(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(at.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| AppError::validation("Invalid appointment date"))
}

/// Create appointment routes
pub fn appointment_routes(state: AppState) -> Router<AppState> {
    let patient = Router::new()
        .route("/", post(book))
        .route("/user/:id", get(list_for_user))
        .route("/:id", delete(cancel))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let doctor = Router::new()
        .route("/doctor/:id", get(list_for_doctor))
        .route("/doctor/:id/status", put(update_status))
        .route_layer(middleware::from_fn_with_state(state, require_doctor));

    patient.merge(doctor)
}

/// Book an appointment
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    request_body = BookAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Doctor not found")
    )
)]
pub async fn book(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<BookAppointmentRequest>,
) -> AppResult<Created<Appointment>> {
    let appointment_date = parse_appointment_date(&payload.appointment_date)?;

    let appointment = state
        .appointment_service
        .book(
            principal.id,
            BookAppointment {
                doctor_id: payload.doctor_id,
                issue: payload.issue.trim().to_string(),
                appointment_date,
            },
        )
        .await?;

    Ok(Created(appointment))
}

/// List the calling patient's appointments
#[utoipa::path(
    get,
    path = "/api/appointments/user/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Calling user's ID"), PaginationParams),
    responses(
        (status = 200, description = "Newest appointment date first", body = UserAppointmentPage),
        (status = 404, description = "ID is not the caller's")
    )
)]
pub async fn list_for_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<Paginated<UserAppointment>>> {
    let page = state
        .appointment_service
        .list_for_user(principal.id, id, params)
        .await?;

    Ok(Json(page))
}

/// Cancel one of the calling patient's appointments
#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment cancelled", body = CancelResponse),
        (status = 400, description = "Already cancelled or completed"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn cancel(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> AppResult<Json<CancelResponse>> {
    let appointment = state
        .appointment_service
        .cancel_by_user(principal.id, id)
        .await?;

    Ok(Json(CancelResponse {
        message: "Appointment cancelled successfully".to_string(),
        appointment,
    }))
}

/// List every appointment of the calling doctor
#[utoipa::path(
    get,
    path = "/api/appointments/doctor/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Calling doctor's ID")),
    responses(
        (status = 200, description = "Earliest appointment date first", body = [DoctorAppointment]),
        (status = 404, description = "ID is not the caller's")
    )
)]
pub async fn list_for_doctor(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> AppResult<Json<Vec<DoctorAppointment>>> {
    let appointments = state
        .appointment_service
        .list_for_doctor(principal.id, id)
        .await?;

    Ok(Json(appointments))
}

/// Confirm, reset or cancel an appointment assigned to the calling doctor
#[utoipa::path(
    put,
    path = "/api/appointments/doctor/{id}/status",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusResponse),
        (status = 400, description = "Invalid status value or terminal appointment"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<Json<StatusResponse>> {
    let status = AppointmentStatus::doctor_target(payload.status.trim())?;

    let appointment = state
        .appointment_service
        .update_status_by_doctor(principal.id, id, status, payload.cancel_reason)
        .await?;

    Ok(Json(StatusResponse {
        message: "Status updated".to_string(),
        appointment,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_appointment_date_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 11, 2, 10, 30, 0).unwrap();

        assert_eq!(parse_appointment_date("2026-11-02T10:30:00Z").unwrap(), expected);
        assert_eq!(parse_appointment_date("2026-11-02T16:00:00+05:30").unwrap(), expected);
        assert_eq!(parse_appointment_date("2026-11-02T10:30").unwrap(), expected);
        assert_eq!(
            parse_appointment_date("2026-11-02").unwrap(),
            Utc.with_ymd_and_hms(2026, 11, 2, 0, 0, 0).unwrap()
        );
        assert!(matches!(
            parse_appointment_date("next tuesday"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_booking_request_requires_non_blank_issue() {
        let request = |issue: &str| BookAppointmentRequest {
            doctor_id: Uuid::new_v4(),
            issue: issue.to_string(),
            appointment_date: "2026-11-02T10:30:00Z".to_string(),
        };

        assert!(request("fever").validate().is_ok());
        let errors = request(" \t ").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("issue"));
    }
}
