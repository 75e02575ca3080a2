//! Hospital account business logic.

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use medbay_auth::{Role, TokenService, TokenStore};
use medbay_config::JwtConfig;
use medbay_core::{AppError, PaginationMeta, hash_password, password_meets_policy, verify_password};

use super::model::{
    Hospital, HospitalAuthResponse, HospitalChanges, HospitalFilterParams, NewHospital,
    PaginatedHospitalsResponse, RegisterHospitalDto, UpdateHospitalDto,
};
use super::store::HospitalStore;

pub struct HospitalService;

impl HospitalService {
    /// Registers a hospital account and signs it in.
    #[instrument(skip(store, tokens, jwt_config, dto), fields(hospital.email = %dto.email, db.operation = "INSERT", db.table = "hospitals"))]
    pub async fn register(
        store: &dyn HospitalStore,
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        dto: RegisterHospitalDto,
    ) -> Result<HospitalAuthResponse, AppError> {
        let email = dto.email.trim().to_lowercase();

        debug!(hospital.name = %dto.name, "Registering new hospital");

        if !password_meets_policy(&dto.password) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Password must contain at least one letter and one number"
            )));
        }

        if !dto.registration_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Registration id must be alphanumeric"
            )));
        }

        if store.is_email_taken(&email, None).await? {
            warn!("Attempted to register hospital with existing email");
            return Err(AppError::bad_request(anyhow::anyhow!("Email already taken")));
        }

        if store.is_registration_id_taken(&dto.registration_id).await? {
            warn!(hospital.registration_id = %dto.registration_id, "Attempted to register hospital with existing registration id");
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Registration id already taken"
            )));
        }

        let password_hash = hash_password(&dto.password)?;

        let hospital = store
            .create(NewHospital {
                name: dto.name,
                email,
                password_hash,
                location: dto.location,
                registration_id: dto.registration_id,
                hospital_type: dto.hospital_type,
                contact: dto.contact,
                logo: dto.logo,
                role: Role::Hospital,
            })
            .await?;

        let tokens = TokenService::generate_auth_tokens(tokens, jwt_config, hospital.id).await?;

        info!(
            hospital.id = %hospital.id,
            hospital.name = %hospital.name,
            "Hospital registered successfully"
        );

        Ok(HospitalAuthResponse { hospital, tokens })
    }

    /// Checks credentials and issues a fresh token pair.
    #[instrument(skip(store, tokens, jwt_config, password), fields(hospital.email = %email))]
    pub async fn login(
        store: &dyn HospitalStore,
        tokens: &dyn TokenStore,
        jwt_config: &JwtConfig,
        email: &str,
        password: &str,
    ) -> Result<HospitalAuthResponse, AppError> {
        let email = email.trim().to_lowercase();

        debug!("Hospital login attempt");

        let Some((hospital, hash)) = store.find_credentials(&email).await? else {
            warn!("Login attempt for unknown hospital email");
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Incorrect email or password"
            )));
        };

        if !verify_password(password, &hash)? {
            warn!(hospital.id = %hospital.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Incorrect email or password"
            )));
        }

        let tokens = TokenService::generate_auth_tokens(tokens, jwt_config, hospital.id).await?;

        info!(hospital.id = %hospital.id, "Hospital logged in");

        Ok(HospitalAuthResponse { hospital, tokens })
    }

    #[instrument(skip(store, filters), fields(db.operation = "SELECT", db.table = "hospitals"))]
    pub async fn get_all_hospitals(
        store: &dyn HospitalStore,
        filters: HospitalFilterParams,
    ) -> Result<PaginatedHospitalsResponse, AppError> {
        debug!(
            filter.name = ?filters.name,
            filter.role = ?filters.role,
            "Fetching hospitals with pagination"
        );

        let (hospitals, total) = store.list(&filters).await?;

        debug!(total = %total, returned = %hospitals.len(), "Hospitals fetched successfully");

        Ok(PaginatedHospitalsResponse {
            meta: PaginationMeta::new(&filters.pagination, total),
            data: hospitals,
        })
    }

    #[instrument(skip(store), fields(hospital.id = %hospital_id, db.operation = "SELECT", db.table = "hospitals"))]
    pub async fn get_hospital_by_id(
        store: &dyn HospitalStore,
        hospital_id: Uuid,
    ) -> Result<Hospital, AppError> {
        debug!("Fetching hospital by ID");

        store.find_by_id(hospital_id).await?.ok_or_else(|| {
            debug!("Hospital not found");
            AppError::not_found(anyhow::anyhow!("Hospital not found"))
        })
    }

    /// Applies a partial update. Email uniqueness is re-checked when the
    /// email changes, and a new password must pass the same policy as at
    /// registration.
    #[instrument(skip(store, dto), fields(hospital.id = %hospital_id, db.operation = "UPDATE", db.table = "hospitals"))]
    pub async fn update_hospital(
        store: &dyn HospitalStore,
        hospital_id: Uuid,
        dto: UpdateHospitalDto,
    ) -> Result<Hospital, AppError> {
        debug!("Updating hospital");

        let email = match dto.email {
            Some(email) => {
                let email = email.trim().to_lowercase();
                if store.is_email_taken(&email, Some(hospital_id)).await? {
                    warn!("Attempted to update hospital to existing email");
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

        let hospital = store
            .update(
                hospital_id,
                HospitalChanges {
                    name: dto.name,
                    email,
                    password_hash,
                    location: dto.location,
                    hospital_type: dto.hospital_type,
                    contact: dto.contact,
                    logo: dto.logo,
                    is_email_verified: None,
                },
            )
            .await?
            .ok_or_else(|| {
                debug!("Hospital not found for update");
                AppError::not_found(anyhow::anyhow!("Hospital not found"))
            })?;

        info!(hospital.id = %hospital.id, "Hospital updated successfully");

        Ok(hospital)
    }

    #[instrument(skip(store), fields(hospital.id = %hospital_id, db.operation = "DELETE", db.table = "hospitals"))]
    pub async fn delete_hospital(
        store: &dyn HospitalStore,
        hospital_id: Uuid,
    ) -> Result<(), AppError> {
        debug!("Deleting hospital");

        if !store.delete(hospital_id).await? {
            debug!("Hospital not found for deletion");
            return Err(AppError::not_found(anyhow::anyhow!("Hospital not found")));
        }

        info!("Hospital deleted successfully");

        Ok(())
    }
}
