//! Doctor account business logic.

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use medbay_auth::{Role, TokenService, TokenStore};
use medbay_config::JwtConfig;
use medbay_core::{AppError, PaginationMeta, hash_password, password_meets_policy, verify_password};

use crate::modules::hospitals::model::HospitalSnapshot;
use crate::modules::hospitals::store::HospitalStore;

use super::model::{
    CreateDoctorDto, Doctor, DoctorAuthResponse, DoctorChanges, DoctorFilterParams, NewDoctor,
    PaginatedDoctorsResponse, UpdateDoctorDto,
};
use super::store::DoctorStore;

pub struct DoctorService;

impl DoctorService {
    /// Creates a doctor under `hospital_id` and signs the new account in.
    ///
    /// The owning hospital is snapshotted onto the doctor row as it exists
    /// right now.
    #[instrument(skip(doctors, hospitals, tokens, jwt_config, dto), fields(hospital.id = %hospital_id, doctor.email = %dto.email, db.operation = "INSERT", db.table = "doctors"))]
    pub async fn create_doctor(
        doctors: &dyn DoctorStore,
        hospitals: &dyn HospitalStore,
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        hospital_id: Uuid,
        dto: CreateDoctorDto,
    ) -> Result<DoctorAuthResponse, AppError> {
        let email = dto.email.trim().to_lowercase();

        debug!(doctor.name = %dto.name, "Creating new doctor");

        let hospital = hospitals.find_by_id(hospital_id).await?.ok_or_else(|| {
            debug!("Hospital not found for doctor creation");
            AppError::not_found(anyhow::anyhow!("Hospital not found"))
        })?;

        if !password_meets_policy(&dto.password) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Password must contain at least one letter and one number"
            )));
        }

        if doctors.is_email_taken(&email, None).await? {
            warn!("Attempted to create doctor with existing email");
            return Err(AppError::bad_request(anyhow::anyhow!("Email already taken")));
        }

        let password_hash = hash_password(&dto.password)?;

        let doctor = doctors
            .create(NewDoctor {
                name: dto.name,
                email,
                password_hash,
                specialization: dto.specialization,
                medical_license_number: dto.medical_license_number,
                years_of_experience: dto.years_of_experience,
                education_qualifications: dto.education_qualifications,
                work_history: dto.work_history,
                specialized_training: dto.specialized_training,
                availability: dto.availability,
                profile_picture: dto.profile_picture,
                role: Role::Doctor,
                hospital: HospitalSnapshot::from(&hospital),
            })
            .await?;

        let tokens = TokenService::generate_auth_tokens(tokens, jwt_config, doctor.id).await?;

        info!(
            doctor.id = %doctor.id,
            doctor.name = %doctor.name,
            "Doctor created successfully"
        );

        Ok(DoctorAuthResponse { doctor, tokens })
    }

    /// Checks credentials and issues a fresh token pair.
    #[instrument(skip(store, tokens, jwt_config, password), fields(doctor.email = %email))]
    pub async fn login(
        store: &dyn DoctorStore,
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        email: &str,
        password: &str,
    ) -> Result<DoctorAuthResponse, AppError> {
        let email = email.trim().to_lowercase();

        debug!("Doctor login attempt");

        let Some((doctor, hash)) = store.find_credentials(&email).await? else {
            warn!("Login attempt for unknown doctor email");
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Incorrect email or password"
            )));
        };

        if !verify_password(password, &hash)? {
            warn!(doctor.id = %doctor.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Incorrect email or password"
            )));
        }

        let tokens = TokenService::generate_auth_tokens(tokens, jwt_config, doctor.id).await?;

        info!(doctor.id = %doctor.id, "Doctor logged in");

        Ok(DoctorAuthResponse { doctor, tokens })
    }

    #[instrument(skip(store, filters), fields(db.operation = "SELECT", db.table = "doctors"))]
    pub async fn get_all_doctors(
        store: &dyn DoctorStore,
        filters: DoctorFilterParams,
    ) -> Result<PaginatedDoctorsResponse, AppError> {
        debug!(
            filter.name = ?filters.name,
            filter.specialization = ?filters.specialization,
            filter.hospital_id = ?filters.hospital_id,
            "Fetching doctors with pagination"
        );

        let (doctors, total) = store.list(&filters).await?;

        debug!(total = %total, returned = %doctors.len(), "Doctors fetched successfully");

        Ok(PaginatedDoctorsResponse {
            meta: PaginationMeta::new(&filters.pagination, total),
            data: doctors,
        })
    }

    #[instrument(skip(store), fields(doctor.id = %doctor_id, db.operation = "SELECT", db.table = "doctors"))]
    pub async fn get_doctor_by_id(
        store: &dyn DoctorStore,
        doctor_id: Uuid,
    ) -> Result<Doctor, AppError> {
        debug!("Fetching doctor by ID");

        store.find_by_id(doctor_id).await?.ok_or_else(|| {
            debug!("Doctor not found");
            AppError::not_found(anyhow::anyhow!("Doctor not found"))
        })
    }

    #[instrument(skip(store, dto), fields(doctor.id = %doctor_id, db.operation = "UPDATE", db.table = "doctors"))]
    pub async fn update_doctor(
        store: &dyn DoctorStore,
        doctor_id: Uuid,
        dto: UpdateDoctorDto,
    ) -> Result<Doctor, AppError> {
        debug!("Updating doctor");

        let email = match dto.email {
            Some(email) => {
                let email = email.trim().to_lowercase();
                if store.is_email_taken(&email, Some(doctor_id)).await? {
                    warn!("Attempted to update doctor to existing email");
                    return Err(AppError::bad_request(anyhow::anyhow!("Email already taken")));
                }
                Some(email)
            }
            None => None,
        };

        let password_hash = match dto.password {
            Some(password) => {
                if !password_meets_policy(&password) {
                    return Err(AppError::unprocessable(anyhow::anyhow!(
                        "Password must contain at least one letter and one number"
                    )));
                }
                Some(hash_password(&password)?)
            }
            None => None,
        };

        let doctor = store
            .update(
                doctor_id,
                DoctorChanges {
                    name: dto.name,
                    email,
                    password_hash,
                    specialization: dto.specialization,
                    medical_license_number: dto.medical_license_number,
                    years_of_experience: dto.years_of_experience,
                    education_qualifications: dto.education_qualifications,
                    work_history: dto.work_history,
                    specialized_training: dto.specialized_training,
                    availability: dto.availability,
                    profile_picture: dto.profile_picture,
                    is_email_verified: None,
                },
            )
            .await?
            .ok_or_else(|| {
                debug!("Doctor not found for update");
                AppError::not_found(anyhow::anyhow!("Doctor not found"))
            })?;

        info!(doctor.id = %doctor.id, "Doctor updated successfully");

        Ok(doctor)
    }

    #[instrument(skip(store), fields(doctor.id = %doctor_id, db.operation = "DELETE", db.table = "doctors"))]
    pub async fn delete_doctor(store: &dyn DoctorStore, doctor_id: Uuid) -> Result<(), AppError> {
        debug!("Deleting doctor");

        if !store.delete(doctor_id).await? {
            debug!("Doctor not found for deletion");
            return Err(AppError::not_found(anyhow::anyhow!("Doctor not found")));
        }

        info!("Doctor deleted successfully");

        Ok(())
    }
}
