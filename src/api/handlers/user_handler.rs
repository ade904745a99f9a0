//! Patient handlers: registration, login and own profile.

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail};

use crate::api::extractors::{ValidatedJson, ValidatedMultipart};
use crate::api::middleware::require_user;
use crate::api::AppState;
use crate::config::MAX_UPLOAD_BYTES;
use crate::domain::{non_blank, not_blank, Principal, RegisterUser, UpdateUser, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::services::AuthToken;
use crate::types::{ApiResponse, Created};

/// Patient registration form (`multipart/form-data`, optional `profileImage` file)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserForm {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    #[schema(example = "Asha Patel")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Login request shared by patients and doctors
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Patient login response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl UserLoginResponse {
    fn new(token: AuthToken, user: UserResponse) -> Self {
        Self {
            token: token.token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user,
        }
    }
}

/// Patient profile update; absent or blank fields are left untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,
    pub address: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserProfile {
    fn into_update(self) -> AppResult<UpdateUser> {
        let update = UpdateUser {
            name: self.name,
            email: self.email,
            phone: self.phone,
            age: self.age,
            address: self.address,
            password: self.password,
        }
        .normalized();

        if update.email.as_deref().is_some_and(|e| !e.validate_email()) {
            return Err(AppError::validation("Invalid email format"));
        }
        Ok(update)
    }
}

/// Create patient routes
pub fn user_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route_layer(middleware::from_fn_with_state(state, require_user));

    Router::new()
        .route(
            "/register",
            post(register).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES * 2)),
        )
        .route("/login", post(login))
        .merge(protected)
}

/// Register a new patient
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body(content = RegisterUserForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    form: ValidatedMultipart<RegisterUserForm>,
) -> AppResult<Created<UserResponse>> {
    let profile_image = match form.image {
        Some(image) => Some(state.images.save(image).await?),
        None => None,
    };
    let fields = form.fields;

    let user = state
        .auth_service
        .register_user(RegisterUser {
            name: fields.name.trim().to_string(),
            email: fields.email.trim().to_string(),
            password: fields.password,
            phone: non_blank(fields.phone),
            address: non_blank(fields.address),
            profile_image,
        })
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Login as a patient
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserLoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<UserLoginResponse>> {
    let (token, user) = state
        .auth_service
        .login_user(payload.email, payload.password)
        .await?;

    Ok(Json(UserLoginResponse::new(token, user.into())))
}

/// Get the calling patient's profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a patient token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.get_profile(principal.id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Update the calling patient's profile
#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<UpdateUserProfile>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .user_service
        .update_profile(principal.id, payload.into_update()?)
        .await?;

    Ok(Json(ApiResponse::with_message(
        user.into(),
        "Profile updated successfully",
    )))
}
