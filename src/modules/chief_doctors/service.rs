//! Chief doctor account business logic.

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use medbay_auth::{Role, TokenService, TokenStore};
use medbay_config::JwtConfig;
use medbay_core::{AppError, PaginationMeta, hash_password, password_meets_policy, verify_password};

use crate::modules::hospitals::model::HospitalSnapshot;
use crate::modules::hospitals::store::HospitalStore;

use super::model::{
    ChiefDoctor, ChiefDoctorAuthResponse, ChiefDoctorChanges, ChiefDoctorFilterParams,
    CreateChiefDoctorDto, NewChiefDoctor, PaginatedChiefDoctorsResponse, UpdateChiefDoctorDto,
};
use super::store::ChiefDoctorStore;

pub struct ChiefDoctorService;

impl ChiefDoctorService {
    /// Creates a chief doctor under `hospital_id` and signs the new account
    /// in.
    #[instrument(skip(chief_doctors, hospitals, tokens, jwt_config, dto), fields(hospital.id = %hospital_id, chief_doctor.email = %dto.email, db.operation = "INSERT", db.table = "chief_doctors"))]
    pub async fn create_chief_doctor(
        chief_doctors: &dyn ChiefDoctorStore,
        hospitals: &dyn HospitalStore,
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        hospital_id: Uuid,
        dto: CreateChiefDoctorDto,
    ) -> Result<ChiefDoctorAuthResponse, AppError> {
        let email = dto.email.trim().to_lowercase();

        debug!(chief_doctor.name = %dto.name, "Creating new chief doctor");

        let hospital = hospitals.find_by_id(hospital_id).await?.ok_or_else(|| {
            debug!("Hospital not found for chief doctor creation");
            AppError::not_found(anyhow::anyhow!("Hospital not found"))
        })?;

        if !password_meets_policy(&dto.password) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Password must contain at least one letter and one number"
            )));
        }

        if chief_doctors.is_email_taken(&email, None).await? {
            warn!("Attempted to create chief doctor with existing email");
            return Err(AppError::bad_request(anyhow::anyhow!("Email already taken")));
        }

        let password_hash = hash_password(&dto.password)?;

        let chief_doctor = chief_doctors
            .create(NewChiefDoctor {
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
                role: Role::ChiefDoctor,
                hospital: HospitalSnapshot::from(&hospital),
            })
            .await?;

        let tokens =
            TokenService::generate_auth_tokens(tokens, jwt_config, chief_doctor.id).await?;

        info!(
            chief_doctor.id = %chief_doctor.id,
            chief_doctor.name = %chief_doctor.name,
            "Chief doctor created successfully"
        );

        Ok(ChiefDoctorAuthResponse {
            chief_doctor,
            tokens,
        })
    }

    /// Checks credentials and issues a fresh token pair.
    #[instrument(skip(store, tokens, jwt_config, password), fields(chief_doctor.email = %email))]
    pub async fn login(
        store: &dyn ChiefDoctorStore,
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        email: &str,
        password: &str,
    ) -> Result<ChiefDoctorAuthResponse, AppError> {
        let email = email.trim().to_lowercase();

        debug!("Chief doctor login attempt");

        let Some((chief_doctor, hash)) = store.find_credentials(&email).await? else {
            warn!("Login attempt for unknown chief doctor email");
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Incorrect email or password"
            )));
        };

        if !verify_password(password, &hash)? {
            warn!(chief_doctor.id = %chief_doctor.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Incorrect email or password"
            )));
        }

        let tokens =
            TokenService::generate_auth_tokens(tokens, jwt_config, chief_doctor.id).await?;

        info!(chief_doctor.id = %chief_doctor.id, "Chief doctor logged in");

        Ok(ChiefDoctorAuthResponse {
            chief_doctor,
            tokens,
        })
    }

    #[instrument(skip(store, filters), fields(db.operation = "SELECT", db.table = "chief_doctors"))]
    pub async fn get_all_chief_doctors(
        store: &dyn ChiefDoctorStore,
        filters: ChiefDoctorFilterParams,
    ) -> Result<PaginatedChiefDoctorsResponse, AppError> {
        debug!(
            filter.name = ?filters.name,
            filter.specialization = ?filters.specialization,
            filter.hospital_id = ?filters.hospital_id,
            "Fetching chief doctors with pagination"
        );

        let (chief_doctors, total) = store.list(&filters).await?;

        debug!(total = %total, returned = %chief_doctors.len(), "Chief doctors fetched successfully");

        Ok(PaginatedChiefDoctorsResponse {
            meta: PaginationMeta::new(&filters.pagination, total),
            data: chief_doctors,
        })
    }

    #[instrument(skip(store), fields(chief_doctor.id = %chief_doctor_id, db.operation = "SELECT", db.table = "chief_doctors"))]
    pub async fn get_chief_doctor_by_id(
        store: &dyn ChiefDoctorStore,
        chief_doctor_id: Uuid,
    ) -> Result<ChiefDoctor, AppError> {
        debug!("Fetching chief doctor by ID");

        store.find_by_id(chief_doctor_id).await?.ok_or_else(|| {
            debug!("Chief doctor not found");
            AppError::not_found(anyhow::anyhow!("Chief doctor not found"))
        })
    }

    #[instrument(skip(store, dto), fields(chief_doctor.id = %chief_doctor_id, db.operation = "UPDATE", db.table = "chief_doctors"))]
    pub async fn update_chief_doctor(
        store: &dyn ChiefDoctorStore,
        chief_doctor_id: Uuid,
        dto: UpdateChiefDoctorDto,
    ) -> Result<ChiefDoctor, AppError> {
        debug!("Updating chief doctor");

        let email = match dto.email {
            Some(email) => {
                let email = email.trim().to_lowercase();
                if store.is_email_taken(&email, Some(chief_doctor_id)).await? {
                    warn!("Attempted to update chief doctor to existing email");
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

        let chief_doctor = store
            .update(
                chief_doctor_id,
                ChiefDoctorChanges {
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
                debug!("Chief doctor not found for update");
                AppError::not_found(anyhow::anyhow!("Chief doctor not found"))
            })?;

        info!(chief_doctor.id = %chief_doctor.id, "Chief doctor updated successfully");

        Ok(chief_doctor)
    }

    #[instrument(skip(store), fields(chief_doctor.id = %chief_doctor_id, db.operation = "DELETE", db.table = "chief_doctors"))]
    pub async fn delete_chief_doctor(
        store: &dyn ChiefDoctorStore,
        chief_doctor_id: Uuid,
    ) -> Result<(), AppError> {
        debug!("Deleting chief doctor");

        if !store.delete(chief_doctor_id).await? {
            debug!("Chief doctor not found for deletion");
            return Err(AppError::not_found(anyhow::anyhow!("Chief doctor not found")));
        }

        info!("Chief doctor deleted successfully");

        Ok(())
    }
}
