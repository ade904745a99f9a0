//! Authentication service - Registration, login and token verification.
//!
//! Patients and doctors live in separate credential stores but share the
//! hashing, login and token code below, parameterized by `PrincipalKind`.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{
    Account, Doctor, NewDoctor, NewUser, Password, Principal, PrincipalKind, RegisterDoctor,
    RegisterUser, User,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    /// Principal marker: "user" or "doctor"
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token issued after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 604800)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new patient
    async fn register_user(&self, input: RegisterUser) -> AppResult<User>;

    /// Register a new doctor
    async fn register_doctor(&self, input: RegisterDoctor) -> AppResult<Doctor>;

    /// Authenticate a patient and issue a token
    async fn login_user(&self, email: String, password: String) -> AppResult<(AuthToken, User)>;

    /// Authenticate a doctor and issue a token
    async fn login_doctor(
        &self,
        email: String,
        password: String,
    ) -> AppResult<(AuthToken, Doctor)>;

    /// Verify a token and require it to belong to `expected`.
    ///
    /// Bad signatures and expired tokens are `Jwt` errors (401); a valid
    /// token for the other principal kind is `Forbidden`.
    fn verify_token(&self, token: &str, expected: PrincipalKind) -> AppResult<Principal>;
}

/// Generate JWT token for any account kind
fn generate_token<A: Account>(account: &A, config: &Config) -> AppResult<AuthToken> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: account.id(),
        email: account.email().to_string(),
        role: A::KIND.as_str().to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(AuthToken {
        token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Shared credential check. Unknown email and wrong password are
/// indistinguishable to the caller.
fn check_credentials<A: Account>(account: Option<A>, password: &str) -> AppResult<A> {
    let valid = Password::verify_stored(account.as_ref().map(|a| a.password_hash()), password);

    match account {
        Some(account) if valid => Ok(account),
        _ => Err(AppError::InvalidCredentials),
    }
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register_user(&self, input: RegisterUser) -> AppResult<User> {
        // Email format is validated by the handler's extractor
        if self.uow.users().find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict(PrincipalKind::User.label()));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
                phone: input.phone,
                address: input.address,
                profile_image: input.profile_image,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn register_doctor(&self, input: RegisterDoctor) -> AppResult<Doctor> {
        if self.uow.doctors().find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict(PrincipalKind::Doctor.label()));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let doctor = self
            .uow
            .doctors()
            .create(NewDoctor {
                name: input.name,
                email: input.email,
                password_hash,
                specialty: input.specialty,
                hospital_name: input.hospital_name,
                location: input.location,
                timings: input.timings,
                map_location: input.map_location,
                profile_image: input.profile_image,
            })
            .await?;

        tracing::info!(doctor_id = %doctor.id, "Doctor registered");
        Ok(doctor)
    }

    async fn login_user(&self, email: String, password: String) -> AppResult<(AuthToken, User)> {
        let found = self.uow.users().find_by_email(&email).await?;
        let user = check_credentials(found, &password).inspect_err(|_| {
            tracing::warn!("Rejected user login");
        })?;

        let token = generate_token(&user, &self.config)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok((token, user))
    }

    async fn login_doctor(
        &self,
        email: String,
        password: String,
    ) -> AppResult<(AuthToken, Doctor)> {
        let found = self.uow.doctors().find_by_email(&email).await?;
        let doctor = check_credentials(found, &password).inspect_err(|_| {
            tracing::warn!("Rejected doctor login");
        })?;

        let token = generate_token(&doctor, &self.config)?;
        tracing::info!(doctor_id = %doctor.id, "Doctor logged in");
        Ok((token, doctor))
    }

    fn verify_token(&self, token: &str, expected: PrincipalKind) -> AppResult<Principal> {
        let claims = verify_token_internal(token, &self.config)?;
        let kind = PrincipalKind::from_role(&claims.role).ok_or(AppError::Unauthorized)?;

        if kind != expected {
            return Err(AppError::Forbidden);
        }

        Ok(Principal {
            id: claims.sub,
            email: claims.email,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{sample_doctor, sample_user, test_config, MockRepos};
    use mockall::predicate::eq;

    fn register_input(password: &str) -> RegisterUser {
        RegisterUser {
            name: "Asha Patel".to_string(),
            email: "asha@example.com".to_string(),
            password: password.to_string(),
            phone: Some("555-0101".to_string()),
            address: None,
            profile_image: None,
        }
    }

    #[tokio::test]
    async fn test_register_user_hashes_password() {
        let mut repos = MockRepos::default();
        repos.users
            .expect_find_by_email()
            .with(eq("asha@example.com"))
            .returning(|_| Ok(None));
        repos.users
            .expect_create()
            .withf(|new| new.password_hash.starts_with("$argon2") && new.phone.is_some())
            .returning(|new| {
                let mut user = sample_user();
                user.email = new.email;
                user.password_hash = new.password_hash;
                Ok(user)
            });

        let auth = Authenticator::new(repos.into_uow(), test_config());
        let user = auth.register_user(register_input("longenough")).await.unwrap();

        assert_eq!(user.email, "asha@example.com");
        assert!(Password::from_hash(user.password_hash).verify("longenough"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut repos = MockRepos::default();
        repos.users
            .expect_find_by_email()
            .returning(|_| Ok(Some(sample_user())));
        repos.users.expect_create().never();

        let auth = Authenticator::new(repos.into_uow(), test_config());
        let err = auth.register_user(register_input("longenough")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref who) if who == "User"));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let mut repos = MockRepos::default();
        repos.users.expect_find_by_email().returning(|_| Ok(None));
        repos.users.expect_create().never();

        let auth = Authenticator::new(repos.into_uow(), test_config());
        let err = auth.register_user(register_input("short")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_and_verify_round_trip() {
        let mut doctor = sample_doctor();
        doctor.password_hash = Password::new("doctorpass").unwrap().into_string();
        let doctor_id = doctor.id;

        let mut repos = MockRepos::default();
        repos.doctors
            .expect_find_by_email()
            .returning(move |_| Ok(Some(doctor.clone())));

        let auth = Authenticator::new(repos.into_uow(), test_config());
        let (token, logged_in) = auth
            .login_doctor("meera@clinic.example".to_string(), "doctorpass".to_string())
            .await
            .unwrap();

        assert_eq!(logged_in.id, doctor_id);
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 168 * 3600);

        let principal = auth.verify_token(&token.token, PrincipalKind::Doctor).unwrap();
        assert_eq!(principal.id, doctor_id);
        assert_eq!(principal.kind, PrincipalKind::Doctor);

        let wrong_kind = auth.verify_token(&token.token, PrincipalKind::User);
        assert!(matches!(wrong_kind, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_login_failures_look_identical() {
        let mut user = sample_user();
        user.password_hash = Password::new("rightpassword").unwrap().into_string();

        let mut repos = MockRepos::default();
        repos.users
            .expect_find_by_email()
            .with(eq("asha@example.com"))
            .returning(move |_| Ok(Some(user.clone())));
        repos.users
            .expect_find_by_email()
            .with(eq("nobody@example.com"))
            .returning(|_| Ok(None));

        let auth = Authenticator::new(repos.into_uow(), test_config());

        let wrong_password = auth
            .login_user("asha@example.com".to_string(), "wrongpassword".to_string())
            .await
            .unwrap_err();
        let unknown_email = auth
            .login_user("nobody@example.com".to_string(), "rightpassword".to_string())
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let auth = Authenticator::new(MockRepos::default().into_uow(), test_config());
        let token = generate_token(&sample_user(), &test_config()).unwrap();

        let mut tampered = token.token.clone();
        tampered.push('x');

        assert!(matches!(
            auth.verify_token(&tampered, PrincipalKind::User),
            Err(AppError::Jwt(_))
        ));
        assert!(auth.verify_token(&token.token, PrincipalKind::User).is_ok());
    }
}
