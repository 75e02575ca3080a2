//! HTTP handlers for doctor accounts.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use uuid::Uuid;

use medbay_core::AppError;

use crate::modules::auth::model::LoginDto;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateDoctorDto, Doctor, DoctorAuthResponse, DoctorFilterParams, PaginatedDoctorsResponse,
    UpdateDoctorDto,
};
use super::service::DoctorService;

/// Create a doctor under a hospital.
#[utoipa::path(
    post,
    path = "/api/hospitals/{hospital_id}/doctors",
    params(
        ("hospital_id" = Uuid, Path, description = "Hospital the doctor belongs to")
    ),
    request_body = CreateDoctorDto,
    responses(
        (status = 201, description = "Doctor created successfully", body = DoctorAuthResponse),
        (status = 400, description = "Email already taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Hospital not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Doctors",
    security(("bearer_auth" = []))
)]
pub async fn create_doctor(
    State(state): State<AppState>,
    Path(hospital_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateDoctorDto>,
) -> Result<(StatusCode, Json<DoctorAuthResponse>), AppError> {
    let response = DoctorService::create_doctor(
        state.doctors.as_ref(),
        state.hospitals.as_ref(),
        state.tokens.as_ref(),
        &state.jwt_config,
        hospital_id,
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List the doctors of one hospital.
#[utoipa::path(
    get,
    path = "/api/hospitals/{hospital_id}/doctors",
    params(
        ("hospital_id" = Uuid, Path, description = "Hospital ID"),
        ("name" = Option<String>, Query, description = "Filter by doctor name (partial match)"),
        ("specialization" = Option<String>, Query, description = "Filter by specialization (partial match)"),
        ("limit" = Option<i64>, Query, description = "Maximum number of records to return (1-100, default 10)"),
        ("offset" = Option<i64>, Query, description = "Number of records to skip"),
        ("page" = Option<i64>, Query, description = "1-based page number, takes precedence over offset")
    ),
    responses(
        (status = 200, description = "Paginated list of the hospital's doctors", body = PaginatedDoctorsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Doctors",
    security(("bearer_auth" = []))
)]
pub async fn get_hospital_doctors(
    State(state): State<AppState>,
    Path(hospital_id): Path<Uuid>,
    filters: Result<Query<DoctorFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedDoctorsResponse>, AppError> {
    let Query(mut filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    // The path wins over any hospital_id query parameter.
    filters.hospital_id = Some(hospital_id);

    let response = DoctorService::get_all_doctors(state.doctors.as_ref(), filters).await?;

    Ok(Json(response))
}

/// Log in with doctor credentials.
#[utoipa::path(
    post,
    path = "/api/doctors/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = DoctorAuthResponse),
        (status = 401, description = "Incorrect email or password"),
        (status = 422, description = "Validation error")
    ),
    tag = "Doctors"
)]
pub async fn login_doctor(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<Json<DoctorAuthResponse>, AppError> {
    let response = DoctorService::login(
        state.doctors.as_ref(),
        state.tokens.as_ref(),
        &state.jwt_config,
        &dto.email,
        &dto.password,
    )
    .await?;

    Ok(Json(response))
}

/// List doctors with optional filters and pagination.
#[utoipa::path(
    get,
    path = "/api/doctors",
    params(
        ("name" = Option<String>, Query, description = "Filter by doctor name (partial match)"),
        ("specialization" = Option<String>, Query, description = "Filter by specialization (partial match)"),
        ("hospital_id" = Option<Uuid>, Query, description = "Filter by owning hospital"),
        ("limit" = Option<i64>, Query, description = "Maximum number of records to return (1-100, default 10)"),
        ("offset" = Option<i64>, Query, description = "Number of records to skip"),
        ("page" = Option<i64>, Query, description = "1-based page number, takes precedence over offset")
    ),
    responses(
        (status = 200, description = "Paginated list of doctors", body = PaginatedDoctorsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Doctors",
    security(("bearer_auth" = []))
)]
pub async fn get_doctors(
    State(state): State<AppState>,
    filters: Result<Query<DoctorFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedDoctorsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let response = DoctorService::get_all_doctors(state.doctors.as_ref(), filters).await?;

    Ok(Json(response))
}

/// Get a single doctor by ID.
#[utoipa::path(
    get,
    path = "/api/doctors/{doctor_id}",
    params(
        ("doctor_id" = Uuid, Path, description = "Doctor ID")
    ),
    responses(
        (status = 200, description = "Doctor found", body = Doctor),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Doctor not found")
    ),
    tag = "Doctors",
    security(("bearer_auth" = []))
)]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = DoctorService::get_doctor_by_id(state.doctors.as_ref(), doctor_id).await?;

    Ok(Json(doctor))
}

/// Partially update a doctor.
#[utoipa::path(
    patch,
    path = "/api/doctors/{doctor_id}",
    params(
        ("doctor_id" = Uuid, Path, description = "Doctor ID")
    ),
    request_body = UpdateDoctorDto,
    responses(
        (status = 200, description = "Doctor updated successfully", body = Doctor),
        (status = 400, description = "Email already taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Doctor not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Doctors",
    security(("bearer_auth" = []))
)]
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateDoctorDto>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = DoctorService::update_doctor(state.doctors.as_ref(), doctor_id, dto).await?;

    Ok(Json(doctor))
}

/// Delete a doctor account.
#[utoipa::path(
    delete,
    path = "/api/doctors/{doctor_id}",
    params(
        ("doctor_id" = Uuid, Path, description = "Doctor ID")
    ),
    responses(
        (status = 204, description = "Doctor deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Doctor not found")
    ),
    tag = "Doctors",
    security(("bearer_auth" = []))
)]
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    DoctorService::delete_doctor(state.doctors.as_ref(), doctor_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
