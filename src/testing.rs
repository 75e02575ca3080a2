//! In-memory store implementations and a ready-made [`AppState`] for tests.
//!
//! These back the same traits the Postgres stores implement, so services,
//! the authorization gate and whole routers can be exercised without a
//! database. Uniqueness checks and filter semantics mirror the SQL
//! implementations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use medbay_auth::{NewTokenRecord, RoleRegistry, TokenRecord, TokenStore, TokenType};
use medbay_config::{CorsConfig, EmailConfig, JwtConfig};
use medbay_core::AppError;

use crate::modules::chief_doctors::model::{
    ChiefDoctor, ChiefDoctorChanges, ChiefDoctorFilterParams, NewChiefDoctor,
};
use crate::modules::chief_doctors::store::ChiefDoctorStore;
use crate::modules::doctors::model::{Doctor, DoctorChanges, DoctorFilterParams, NewDoctor};
use crate::modules::doctors::store::DoctorStore;
use crate::modules::hospitals::model::{
    Hospital, HospitalChanges, HospitalFilterParams, NewHospital,
};
use crate::modules::hospitals::store::HospitalStore;
use crate::state::AppState;

fn email_taken_error() -> AppError {
    AppError::bad_request(anyhow::anyhow!("Email already taken"))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn paginate<T: Clone>(mut rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    let offset = (offset as usize).min(rows.len());
    rows.drain(..offset);
    rows.truncate(limit as usize);
    rows
}

/// In-memory [`HospitalStore`]. Rows are stored next to their password hash.
#[derive(Default)]
pub struct InMemoryHospitalStore {
    rows: Mutex<HashMap<Uuid, (Hospital, String)>>,
}

#[async_trait]
impl HospitalStore for InMemoryHospitalStore {
    async fn create(&self, hospital: NewHospital) -> Result<Hospital, AppError> {
        let mut rows = self.rows.lock().unwrap();

        if rows.values().any(|(h, _)| h.email == hospital.email) {
            return Err(email_taken_error());
        }
        if rows
            .values()
            .any(|(h, _)| h.registration_id == hospital.registration_id)
        {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Registration id already taken"
            )));
        }

        let now = Utc::now();
        let row = Hospital {
            id: Uuid::new_v4(),
            name: hospital.name,
            email: hospital.email,
            location: hospital.location,
            registration_id: hospital.registration_id,
            hospital_type: hospital.hospital_type,
            contact: hospital.contact,
            logo: hospital.logo,
            role: hospital.role,
            is_email_verified: false,
            created_at: now,
            updated_at: now,
        };
        rows.insert(row.id, (row.clone(), hospital.password_hash));
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Hospital>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(&id).map(|(h, _)| h.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Hospital>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|(h, _)| h.email == email)
            .map(|(h, _)| h.clone()))
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(Hospital, String)>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|(h, _)| h.email == email)
            .map(|(h, hash)| (h.clone(), hash.clone())))
    }

    async fn is_email_taken(
        &self,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .any(|(h, _)| h.email == email && Some(h.id) != exclude_id))
    }

    async fn is_registration_id_taken(&self, registration_id: &str) -> Result<bool, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().any(|(h, _)| h.registration_id == registration_id))
    }

    async fn list(&self, filters: &HospitalFilterParams) -> Result<(Vec<Hospital>, i64), AppError> {
        let rows = self.rows.lock().unwrap();

        let mut matching: Vec<Hospital> = rows
            .values()
            .map(|(h, _)| h.clone())
            .filter(|h| {
                filters
                    .name
                    .as_ref()
                    .is_none_or(|name| contains_ci(&h.name, name))
            })
            .filter(|h| filters.role.is_none_or(|role| h.role == role))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let page = paginate(
            matching,
            filters.pagination.limit(),
            filters.pagination.offset(),
        );
        Ok((page, total))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: HospitalChanges,
    ) -> Result<Option<Hospital>, AppError> {
        let mut rows = self.rows.lock().unwrap();

        if let Some(email) = &changes.email
            && rows.values().any(|(h, _)| h.email == *email && h.id != id)
        {
            return Err(email_taken_error());
        }

        let Some((hospital, hash)) = rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            hospital.name = name;
        }
        if let Some(email) = changes.email {
            hospital.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            *hash = password_hash;
        }
        if let Some(location) = changes.location {
            hospital.location = location;
        }
        if let Some(hospital_type) = changes.hospital_type {
            hospital.hospital_type = hospital_type;
        }
        if let Some(contact) = changes.contact {
            hospital.contact = contact;
        }
        if let Some(logo) = changes.logo {
            hospital.logo = Some(logo);
        }
        if let Some(is_email_verified) = changes.is_email_verified {
            hospital.is_email_verified = is_email_verified;
        }
        hospital.updated_at = Utc::now();

        Ok(Some(hospital.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.remove(&id).is_some())
    }
}

/// In-memory [`DoctorStore`].
#[derive(Default)]
pub struct InMemoryDoctorStore {
    rows: Mutex<HashMap<Uuid, (Doctor, String)>>,
}

#[async_trait]
impl DoctorStore for InMemoryDoctorStore {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor, AppError> {
        let mut rows = self.rows.lock().unwrap();

        if rows.values().any(|(d, _)| d.email == doctor.email) {
            return Err(email_taken_error());
        }

        let now = Utc::now();
        let row = Doctor {
            id: Uuid::new_v4(),
            name: doctor.name,
            email: doctor.email,
            specialization: doctor.specialization,
            medical_license_number: doctor.medical_license_number,
            years_of_experience: doctor.years_of_experience,
            education_qualifications: doctor.education_qualifications,
            work_history: doctor.work_history,
            specialized_training: doctor.specialized_training,
            availability: doctor.availability,
            profile_picture: doctor.profile_picture,
            role: doctor.role,
            is_email_verified: false,
            hospital_id: doctor.hospital.hospital_id,
            hospital: doctor.hospital,
            created_at: now,
            updated_at: now,
        };
        rows.insert(row.id, (row.clone(), doctor.password_hash));
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(&id).map(|(d, _)| d.clone()))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<(Doctor, String)>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|(d, _)| d.email == email)
            .map(|(d, hash)| (d.clone(), hash.clone())))
    }

    async fn is_email_taken(
        &self,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .any(|(d, _)| d.email == email && Some(d.id) != exclude_id))
    }

    async fn list(&self, filters: &DoctorFilterParams) -> Result<(Vec<Doctor>, i64), AppError> {
        let rows = self.rows.lock().unwrap();

        let mut matching: Vec<Doctor> = rows
            .values()
            .map(|(d, _)| d.clone())
            .filter(|d| {
                filters
                    .name
                    .as_ref()
                    .is_none_or(|name| contains_ci(&d.name, name))
            })
            .filter(|d| {
                filters
                    .specialization
                    .as_ref()
                    .is_none_or(|spec| contains_ci(&d.specialization, spec))
            })
            .filter(|d| {
                filters
                    .hospital_id
                    .is_none_or(|hospital_id| d.hospital_id == hospital_id)
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let page = paginate(
            matching,
            filters.pagination.limit(),
            filters.pagination.offset(),
        );
        Ok((page, total))
    }

    async fn update(&self, id: Uuid, changes: DoctorChanges) -> Result<Option<Doctor>, AppError> {
        let mut rows = self.rows.lock().unwrap();

        if let Some(email) = &changes.email
            && rows.values().any(|(d, _)| d.email == *email && d.id != id)
        {
            return Err(email_taken_error());
        }

        let Some((doctor, hash)) = rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            doctor.name = name;
        }
        if let Some(email) = changes.email {
            doctor.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            *hash = password_hash;
        }
        if let Some(specialization) = changes.specialization {
            doctor.specialization = specialization;
        }
        if let Some(medical_license_number) = changes.medical_license_number {
            doctor.medical_license_number = medical_license_number;
        }
        if let Some(years_of_experience) = changes.years_of_experience {
            doctor.years_of_experience = years_of_experience;
        }
        if let Some(education_qualifications) = changes.education_qualifications {
            doctor.education_qualifications = education_qualifications;
        }
        if let Some(work_history) = changes.work_history {
            doctor.work_history = Some(work_history);
        }
        if let Some(specialized_training) = changes.specialized_training {
            doctor.specialized_training = Some(specialized_training);
        }
        if let Some(availability) = changes.availability {
            doctor.availability = Some(availability);
        }
        if let Some(profile_picture) = changes.profile_picture {
            doctor.profile_picture = Some(profile_picture);
        }
        if let Some(is_email_verified) = changes.is_email_verified {
            doctor.is_email_verified = is_email_verified;
        }
        doctor.updated_at = Utc::now();

        Ok(Some(doctor.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.remove(&id).is_some())
    }
}

/// In-memory [`ChiefDoctorStore`].
#[derive(Default)]
pub struct InMemoryChiefDoctorStore {
    rows: Mutex<HashMap<Uuid, (ChiefDoctor, String)>>,
}

#[async_trait]
impl ChiefDoctorStore for InMemoryChiefDoctorStore {
    async fn create(&self, chief_doctor: NewChiefDoctor) -> Result<ChiefDoctor, AppError> {
        let mut rows = self.rows.lock().unwrap();

        if rows.values().any(|(c, _)| c.email == chief_doctor.email) {
            return Err(email_taken_error());
        }

        let now = Utc::now();
        let row = ChiefDoctor {
            id: Uuid::new_v4(),
            name: chief_doctor.name,
            email: chief_doctor.email,
            specialization: chief_doctor.specialization,
            medical_license_number: chief_doctor.medical_license_number,
            years_of_experience: chief_doctor.years_of_experience,
            education_qualifications: chief_doctor.education_qualifications,
            work_history: chief_doctor.work_history,
            specialized_training: chief_doctor.specialized_training,
            availability: chief_doctor.availability,
            profile_picture: chief_doctor.profile_picture,
            role: chief_doctor.role,
            is_email_verified: false,
            hospital_id: chief_doctor.hospital.hospital_id,
            hospital: chief_doctor.hospital,
            created_at: now,
            updated_at: now,
        };
        rows.insert(row.id, (row.clone(), chief_doctor.password_hash));
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChiefDoctor>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(&id).map(|(c, _)| c.clone()))
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(ChiefDoctor, String)>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|(c, _)| c.email == email)
            .map(|(c, hash)| (c.clone(), hash.clone())))
    }

    async fn is_email_taken(
        &self,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .any(|(c, _)| c.email == email && Some(c.id) != exclude_id))
    }

    async fn list(
        &self,
        filters: &ChiefDoctorFilterParams,
    ) -> Result<(Vec<ChiefDoctor>, i64), AppError> {
        let rows = self.rows.lock().unwrap();

        let mut matching: Vec<ChiefDoctor> = rows
            .values()
            .map(|(c, _)| c.clone())
            .filter(|c| {
                filters
                    .name
                    .as_ref()
                    .is_none_or(|name| contains_ci(&c.name, name))
            })
            .filter(|c| {
                filters
                    .specialization
                    .as_ref()
                    .is_none_or(|spec| contains_ci(&c.specialization, spec))
            })
            .filter(|c| {
                filters
                    .hospital_id
                    .is_none_or(|hospital_id| c.hospital_id == hospital_id)
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let page = paginate(
            matching,
            filters.pagination.limit(),
            filters.pagination.offset(),
        );
        Ok((page, total))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ChiefDoctorChanges,
    ) -> Result<Option<ChiefDoctor>, AppError> {
        let mut rows = self.rows.lock().unwrap();

        if let Some(email) = &changes.email
            && rows.values().any(|(c, _)| c.email == *email && c.id != id)
        {
            return Err(email_taken_error());
        }

        let Some((chief_doctor, hash)) = rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            chief_doctor.name = name;
        }
        if let Some(email) = changes.email {
            chief_doctor.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            *hash = password_hash;
        }
        if let Some(specialization) = changes.specialization {
            chief_doctor.specialization = specialization;
        }
        if let Some(medical_license_number) = changes.medical_license_number {
            chief_doctor.medical_license_number = medical_license_number;
        }
        if let Some(years_of_experience) = changes.years_of_experience {
            chief_doctor.years_of_experience = years_of_experience;
        }
        if let Some(education_qualifications) = changes.education_qualifications {
            chief_doctor.education_qualifications = education_qualifications;
        }
        if let Some(work_history) = changes.work_history {
            chief_doctor.work_history = Some(work_history);
        }
        if let Some(specialized_training) = changes.specialized_training {
            chief_doctor.specialized_training = Some(specialized_training);
        }
        if let Some(availability) = changes.availability {
            chief_doctor.availability = Some(availability);
        }
        if let Some(profile_picture) = changes.profile_picture {
            chief_doctor.profile_picture = Some(profile_picture);
        }
        if let Some(is_email_verified) = changes.is_email_verified {
            chief_doctor.is_email_verified = is_email_verified;
        }
        chief_doctor.updated_at = Utc::now();

        Ok(Some(chief_doctor.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.remove(&id).is_some())
    }
}

/// In-memory [`TokenStore`].
#[derive(Default)]
pub struct InMemoryTokenStore {
    rows: Mutex<HashMap<Uuid, TokenRecord>>,
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn create(&self, record: NewTokenRecord) -> Result<TokenRecord, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = TokenRecord {
            id: Uuid::new_v4(),
            token: record.token,
            actor_id: record.actor_id,
            token_type: record.token_type,
            expires_at: record.expires_at,
            blacklisted: record.blacklisted,
            created_at: Utc::now(),
        };
        rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_live(
        &self,
        token: &str,
        token_type: TokenType,
        actor_id: Uuid,
    ) -> Result<Option<TokenRecord>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|r| {
                r.token == token
                    && r.token_type == token_type
                    && r.actor_id == actor_id
                    && !r.blacklisted
            })
            .cloned())
    }

    async fn find_by_token(
        &self,
        token: &str,
        token_type: TokenType,
    ) -> Result<Option<TokenRecord>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|r| r.token == token && r.token_type == token_type && !r.blacklisted)
            .cloned())
    }

    async fn blacklist(&self, id: Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(record) = rows.get_mut(&id) {
            record.blacklisted = true;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        rows.remove(&id);
        Ok(())
    }

    async fn delete_for_actor(
        &self,
        actor_id: Uuid,
        token_type: TokenType,
    ) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, r| !(r.actor_id == actor_id && r.token_type == token_type));
        Ok((before - rows.len()) as u64)
    }
}

/// Jwt settings used by tests. Expirations are generous so tokens do not
/// expire mid-test.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-jwt-secret".to_string(),
        access_expiration_minutes: 30,
        refresh_expiration_days: 30,
        reset_password_expiration_minutes: 10,
        verify_email_expiration_minutes: 10,
    }
}

/// Application state wired entirely to in-memory stores.
pub fn test_state() -> AppState {
    AppState {
        hospitals: Arc::new(InMemoryHospitalStore::default()),
        doctors: Arc::new(InMemoryDoctorStore::default()),
        chief_doctors: Arc::new(InMemoryChiefDoctorStore::default()),
        tokens: Arc::new(InMemoryTokenStore::default()),
        registry: Arc::new(RoleRegistry::with_defaults().expect("default registry covers every role")),
        jwt_config: test_jwt_config(),
        email_config: EmailConfig::disabled(),
        cors_config: CorsConfig {
            allowed_origins: Vec::new(),
        },
    }
}
