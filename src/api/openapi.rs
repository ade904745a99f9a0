//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{appointment_handler, doctor_handler, user_handler};
use crate::domain::{
    Appointment, AppointmentStatus, DoctorAppointment, DoctorResponse, DoctorSummary,
    PatientSummary, UserAppointment, UserResponse,
};
use crate::types::PaginationMeta;

/// OpenAPI documentation for the MediBook API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MediBook API",
        version = "0.1.0",
        description = "Doctor availability and appointment booking",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Patient endpoints
        user_handler::register,
        user_handler::login,
        user_handler::get_profile,
        user_handler::update_profile,
        // Doctor endpoints
        doctor_handler::register,
        doctor_handler::login,
        doctor_handler::get_profile,
        doctor_handler::update_profile,
        doctor_handler::update_availability,
        doctor_handler::search,
        doctor_handler::get_doctor,
        // Appointment endpoints
        appointment_handler::book,
        appointment_handler::list_for_user,
        appointment_handler::cancel,
        appointment_handler::list_for_doctor,
        appointment_handler::update_status,
    ),
    components(
        schemas(
            // Domain types
            UserResponse,
            DoctorResponse,
            Appointment,
            AppointmentStatus,
            UserAppointment,
            DoctorAppointment,
            DoctorSummary,
            PatientSummary,
            PaginationMeta,
            // Request/response types
            user_handler::RegisterUserForm,
            user_handler::LoginRequest,
            user_handler::UserLoginResponse,
            user_handler::UpdateUserProfile,
            doctor_handler::RegisterDoctorForm,
            doctor_handler::DoctorLoginResponse,
            doctor_handler::UpdateDoctorProfile,
            doctor_handler::AvailabilityRequest,
            doctor_handler::AvailabilityResponse,
            appointment_handler::BookAppointmentRequest,
            appointment_handler::UpdateStatusRequest,
            appointment_handler::CancelResponse,
            appointment_handler::StatusResponse,
            appointment_handler::UserAppointmentPage,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Patient registration, login and profile"),
        (name = "Doctors", description = "Doctor registration, profile, availability and search"),
        (name = "Appointments", description = "Booking and appointment lifecycle")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token from /api/users/login or /api/doctors/login",
                        ))
                        .build(),
                ),
            );
        }
    }
}
