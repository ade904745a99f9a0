//! Doctor handlers: registration, login, profile, availability and search.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use super::user_handler::LoginRequest;
use crate::api::extractors::{ValidatedJson, ValidatedMultipart, ValidatedPath, ValidatedQuery};
use crate::api::middleware::require_doctor;
use crate::api::AppState;
use crate::config::MAX_UPLOAD_BYTES;
use crate::domain::{
    non_blank, not_blank, DoctorResponse, DoctorSearch, Principal, RegisterDoctor, UpdateDoctor,
};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created};

/// Doctor registration form (`multipart/form-data`, optional `profileImage` file)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDoctorForm {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    #[schema(example = "Dr. Meera Rao")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(custom(function = "not_blank", message = "Specialty is required"))]
    #[schema(example = "Cardiology")]
    pub specialty: String,
    #[validate(custom(function = "not_blank", message = "Hospital name is required"))]
    pub hospital_name: String,
    #[validate(custom(function = "not_blank", message = "Location is required"))]
    pub location: String,
    #[validate(custom(function = "not_blank", message = "Timings are required"))]
    #[schema(example = "Mon-Fri 09:00-17:00")]
    pub timings: String,
    pub map_location: Option<String>,
}

/// Doctor login response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorLoginResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_in: i64,
    pub doctor: DoctorResponse,
}

/// Doctor profile update; absent or blank fields are left untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub hospital_name: Option<String>,
    pub location: Option<String>,
    pub timings: Option<String>,
    pub map_location: Option<String>,
    pub password: Option<String>,
}

impl UpdateDoctorProfile {
    fn into_update(self) -> AppResult<UpdateDoctor> {
        let update = UpdateDoctor {
            name: self.name,
            email: self.email,
            specialty: self.specialty,
            hospital_name: self.hospital_name,
            location: self.location,
            timings: self.timings,
            map_location: self.map_location,
            password: self.password,
        }
        .normalized();

        if update.email.as_deref().is_some_and(|e| !e.validate_email()) {
            return Err(AppError::validation("Invalid email format"));
        }
        Ok(update)
    }
}

/// Availability request. Without a value the flag is flipped.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AvailabilityRequest {
    pub availability: Option<bool>,
}

impl AvailabilityRequest {
    /// Empty bodies are allowed and mean "toggle".
    fn parse(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::validation(format!("Invalid availability body: {}", e)))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    #[schema(example = "Availability status updated")]
    pub message: String,
    pub available: bool,
}

/// Create doctor routes
pub fn doctor_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/availability", put(update_availability))
        .route_layer(middleware::from_fn_with_state(state, require_doctor));

    Router::new()
        .route(
            "/register",
            post(register).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES * 2)),
        )
        .route("/login", post(login))
        .route("/search", get(search))
        .route("/:id", get(get_doctor))
        .merge(protected)
}

/// Register a new doctor
#[utoipa::path(
    post,
    path = "/api/doctors/register",
    tag = "Doctors",
    request_body(content = RegisterDoctorForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Doctor registered successfully", body = DoctorResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Doctor already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    form: ValidatedMultipart<RegisterDoctorForm>,
) -> AppResult<Created<DoctorResponse>> {
    let profile_image = match form.image {
        Some(image) => Some(state.images.save(image).await?),
        None => None,
    };
    let fields = form.fields;

    let doctor = state
        .auth_service
        .register_doctor(RegisterDoctor {
            name: fields.name.trim().to_string(),
            email: fields.email.trim().to_string(),
            password: fields.password,
            specialty: fields.specialty.trim().to_string(),
            hospital_name: fields.hospital_name.trim().to_string(),
            location: fields.location.trim().to_string(),
            timings: fields.timings.trim().to_string(),
            map_location: non_blank(fields.map_location),
            profile_image,
        })
        .await?;

    Ok(Created(DoctorResponse::from(doctor)))
}

/// Login as a doctor
#[utoipa::path(
    post,
    path = "/api/doctors/login",
    tag = "Doctors",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = DoctorLoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<DoctorLoginResponse>> {
    let (token, doctor) = state
        .auth_service
        .login_doctor(payload.email, payload.password)
        .await?;

    Ok(Json(DoctorLoginResponse {
        token: token.token,
        token_type: token.token_type,
        expires_in: token.expires_in,
        doctor: doctor.into(),
    }))
}

/// Get the calling doctor's profile
#[utoipa::path(
    get,
    path = "/api/doctors/profile",
    tag = "Doctors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile", body = DoctorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a doctor token")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<ApiResponse<DoctorResponse>>> {
    let doctor = state.doctor_service.get_doctor(principal.id).await?;
    Ok(Json(ApiResponse::success(doctor.into())))
}

/// Update the calling doctor's profile
#[utoipa::path(
    put,
    path = "/api/doctors/profile",
    tag = "Doctors",
    security(("bearer_auth" = [])),
    request_body = UpdateDoctorProfile,
    responses(
        (status = 200, description = "Profile updated", body = DoctorResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<UpdateDoctorProfile>,
) -> AppResult<Json<ApiResponse<DoctorResponse>>> {
    let doctor = state
        .doctor_service
        .update_profile(principal.id, payload.into_update()?)
        .await?;

    Ok(Json(ApiResponse::with_message(
        doctor.into(),
        "Profile updated successfully",
    )))
}

/// Set or toggle the calling doctor's availability
#[utoipa::path(
    put,
    path = "/api/doctors/availability",
    tag = "Doctors",
    security(("bearer_auth" = [])),
    request_body(content = AvailabilityRequest, description = "Omit `availability` (or send no body) to toggle"),
    responses(
        (status = 200, description = "Availability updated", body = AvailabilityResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_availability(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Bytes,
) -> AppResult<Json<AvailabilityResponse>> {
    let request = AvailabilityRequest::parse(&body)?;
    let available = state
        .doctor_service
        .set_availability(principal.id, request.availability)
        .await?;

    Ok(Json(AvailabilityResponse {
        message: "Availability status updated".to_string(),
        available,
    }))
}

/// Search doctors
#[utoipa::path(
    get,
    path = "/api/doctors/search",
    tag = "Doctors",
    params(DoctorSearch),
    responses(
        (status = 200, description = "Matching doctors sorted by name", body = [DoctorResponse])
    )
)]
pub async fn search(
    State(state): State<AppState>,
    ValidatedQuery(filters): ValidatedQuery<DoctorSearch>,
) -> AppResult<Json<Vec<DoctorResponse>>> {
    let doctors = state.doctor_service.search(filters).await?;
    Ok(Json(doctors.into_iter().map(DoctorResponse::from).collect()))
}

/// Public doctor detail
#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    tag = "Doctors",
    params(("id" = Uuid, Path, description = "Doctor ID")),
    responses(
        (status = 200, description = "Doctor found", body = DoctorResponse),
        (status = 404, description = "Doctor not found")
    )
)]
pub async fn get_doctor(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> AppResult<Json<DoctorResponse>> {
    let doctor = state.doctor_service.get_doctor(id).await?;
    Ok(Json(doctor.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_body_parsing() {
        assert_eq!(AvailabilityRequest::parse(b"").unwrap().availability, None);
        assert_eq!(AvailabilityRequest::parse(b" \n").unwrap().availability, None);
        assert_eq!(AvailabilityRequest::parse(b"{}").unwrap().availability, None);
        assert_eq!(
            AvailabilityRequest::parse(br#"{"availability":true}"#)
                .unwrap()
                .availability,
            Some(true)
        );
        assert!(AvailabilityRequest::parse(b"{not json").is_err());
    }

    #[test]
    fn test_profile_update_rejects_bad_email_but_ignores_blank() {
        let blank = UpdateDoctorProfile {
            email: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.into_update().unwrap().email, None);

        let bad = UpdateDoctorProfile {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad.into_update(), Err(AppError::Validation(_))));
    }
}
