//! Shared fixtures for service unit tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Appointment, AppointmentStatus, Doctor, User};
use crate::infra::{
    AppointmentRepository, DoctorRepository, MockAppointmentRepository, MockDoctorRepository,
    MockUserRepository, UnitOfWork, UserRepository,
};

/// Mock repositories to set expectations on before handing them to a service
#[derive(Default)]
pub struct MockRepos {
    pub users: MockUserRepository,
    pub doctors: MockDoctorRepository,
    pub appointments: MockAppointmentRepository,
}

impl MockRepos {
    pub fn into_uow(self) -> Arc<TestUnitOfWork> {
        Arc::new(TestUnitOfWork {
            users: Arc::new(self.users),
            doctors: Arc::new(self.doctors),
            appointments: Arc::new(self.appointments),
        })
    }
}

/// Test mock for UnitOfWork that wraps the mock repositories
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    doctors: Arc<MockDoctorRepository>,
    appointments: Arc<MockAppointmentRepository>,
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorRepository> {
        self.doctors.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointments.clone()
    }
}

pub fn test_config() -> Config {
    Config::new("sqlite::memory:", "unit-test-secret-that-is-long-enough")
}

pub fn sample_user() -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: "Asha Patel".to_string(),
        email: "asha@example.com".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        phone: Some("555-0101".to_string()),
        age: Some(34),
        address: None,
        profile_image: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_doctor() -> Doctor {
    let now = Utc::now();
    Doctor {
        id: Uuid::new_v4(),
        name: "Dr. Meera Rao".to_string(),
        email: "meera@clinic.example".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        specialty: "Cardiology".to_string(),
        hospital_name: "City Heart Hospital".to_string(),
        location: "Pune".to_string(),
        timings: "Mon-Fri 09:00-17:00".to_string(),
        map_location: None,
        availability: false,
        profile_image: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_appointment(user_id: Uuid, doctor_id: Uuid, status: AppointmentStatus) -> Appointment {
    let now = Utc::now();
    Appointment {
        id: Uuid::new_v4(),
        user_id,
        doctor_id,
        issue: "fever".to_string(),
        appointment_date: Utc.with_ymd_and_hms(2026, 11, 2, 10, 0, 0).unwrap(),
        status,
        cancel_reason: None,
        created_at: now,
        updated_at: now,
    }
}
