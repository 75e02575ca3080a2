//! HTTP handlers for chief doctor accounts.

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
    ChiefDoctor, ChiefDoctorAuthResponse, ChiefDoctorFilterParams, CreateChiefDoctorDto,
    PaginatedChiefDoctorsResponse, UpdateChiefDoctorDto,
};
use super::service::ChiefDoctorService;

/// Create a chief doctor under a hospital.
#[utoipa::path(
    post,
    path = "/api/hospitals/{hospital_id}/chief-doctors",
    params(
        ("hospital_id" = Uuid, Path, description = "Hospital the chief doctor belongs to")
    ),
    request_body = CreateChiefDoctorDto,
    responses(
        (status = 201, description = "Chief doctor created successfully", body = ChiefDoctorAuthResponse),
        (status = 400, description = "Email already taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Hospital not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Chief Doctors",
    security(("bearer_auth" = []))
)]
pub async fn create_chief_doctor(
    State(state): State<AppState>,
    Path(hospital_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateChiefDoctorDto>,
) -> Result<(StatusCode, Json<ChiefDoctorAuthResponse>), AppError> {
    let response = ChiefDoctorService::create_chief_doctor(
        state.chief_doctors.as_ref(),
        state.hospitals.as_ref(),
        state.tokens.as_ref(),
        &state.jwt_config,
        hospital_id,
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List the chief doctors of one hospital.
#[utoipa::path(
    get,
    path = "/api/hospitals/{hospital_id}/chief-doctors",
    params(
        ("hospital_id" = Uuid, Path, description = "Hospital ID"),
        ("name" = Option<String>, Query, description = "Filter by chief doctor name (partial match)"),
        ("specialization" = Option<String>, Query, description = "Filter by specialization (partial match)"),
        ("limit" = Option<i64>, Query, description = "Maximum number of records to return (1-100, default 10)"),
        ("offset" = Option<i64>, Query, description = "Number of records to skip"),
        ("page" = Option<i64>, Query, description = "1-based page number, takes precedence over offset")
    ),
    responses(
        (status = 200, description = "Paginated list of the hospital's chief doctors", body = PaginatedChiefDoctorsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Chief Doctors",
    security(("bearer_auth" = []))
)]
pub async fn get_hospital_chief_doctors(
    State(state): State<AppState>,
    Path(hospital_id): Path<Uuid>,
    filters: Result<Query<ChiefDoctorFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedChiefDoctorsResponse>, AppError> {
    let Query(mut filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    // The path wins over any hospital_id query parameter.
    filters.hospital_id = Some(hospital_id);

    let response =
        ChiefDoctorService::get_all_chief_doctors(state.chief_doctors.as_ref(), filters).await?;

    Ok(Json(response))
}

/// Log in with chief doctor credentials.
#[utoipa::path(
    post,
    path = "/api/chief-doctors/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = ChiefDoctorAuthResponse),
        (status = 401, description = "Incorrect email or password"),
        (status = 422, description = "Validation error")
    ),
    tag = "Chief Doctors"
)]
pub async fn login_chief_doctor(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<Json<ChiefDoctorAuthResponse>, AppError> {
    let response = ChiefDoctorService::login(
        state.chief_doctors.as_ref(),
        state.tokens.as_ref(),
        &state.jwt_config,
        &dto.email,
        &dto.password,
    )
    .await?;

    Ok(Json(response))
}

/// List chief doctors with optional filters and pagination.
#[utoipa::path(
    get,
    path = "/api/chief-doctors",
    params(
        ("name" = Option<String>, Query, description = "Filter by chief doctor name (partial match)"),
        ("specialization" = Option<String>, Query, description = "Filter by specialization (partial match)"),
        ("hospital_id" = Option<Uuid>, Query, description = "Filter by owning hospital"),
        ("limit" = Option<i64>, Query, description = "Maximum number of records to return (1-100, default 10)"),
        ("offset" = Option<i64>, Query, description = "Number of records to skip"),
        ("page" = Option<i64>, Query, description = "1-based page number, takes precedence over offset")
    ),
    responses(
        (status = 200, description = "Paginated list of chief doctors", body = PaginatedChiefDoctorsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Chief Doctors",
    security(("bearer_auth" = []))
)]
pub async fn get_chief_doctors(
    State(state): State<AppState>,
    filters: Result<Query<ChiefDoctorFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedChiefDoctorsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let response =
        ChiefDoctorService::get_all_chief_doctors(state.chief_doctors.as_ref(), filters).await?;

    Ok(Json(response))
}

/// Get a single chief doctor by ID.
#[utoipa::path(
    get,
    path = "/api/chief-doctors/{chief_doctor_id}",
    params(
        ("chief_doctor_id" = Uuid, Path, description = "Chief doctor ID")
    ),
    responses(
        (status = 200, description = "Chief doctor found", body = ChiefDoctor),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Chief doctor not found")
    ),
    tag = "Chief Doctors",
    security(("bearer_auth" = []))
)]
pub async fn get_chief_doctor(
    State(state): State<AppState>,
    Path(chief_doctor_id): Path<Uuid>,
) -> Result<Json<ChiefDoctor>, AppError> {
    let chief_doctor =
        ChiefDoctorService::get_chief_doctor_by_id(state.chief_doctors.as_ref(), chief_doctor_id)
            .await?;

    Ok(Json(chief_doctor))
}

/// Partially update a chief doctor.
#[utoipa::path(
    patch,
    path = "/api/chief-doctors/{chief_doctor_id}",
    params(
        ("chief_doctor_id" = Uuid, Path, description = "Chief doctor ID")
    ),
    request_body = UpdateChiefDoctorDto,
    responses(
        (status = 200, description = "Chief doctor updated successfully", body = ChiefDoctor),
        (status = 400, description = "Email already taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Chief doctor not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Chief Doctors",
    security(("bearer_auth" = []))
)]
pub async fn update_chief_doctor(
    State(state): State<AppState>,
    Path(chief_doctor_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateChiefDoctorDto>,
) -> Result<Json<ChiefDoctor>, AppError> {
    let chief_doctor = ChiefDoctorService::update_chief_doctor(
        state.chief_doctors.as_ref(),
        chief_doctor_id,
        dto,
    )
    .await?;

    Ok(Json(chief_doctor))
}

/// Delete a chief doctor account.
#[utoipa::path(
    delete,
    path = "/api/chief-doctors/{chief_doctor_id}",
    params(
        ("chief_doctor_id" = Uuid, Path, description = "Chief doctor ID")
    ),
    responses(
        (status = 204, description = "Chief doctor deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Chief doctor not found")
    ),
    tag = "Chief Doctors",
    security(("bearer_auth" = []))
)]
pub async fn delete_chief_doctor(
    State(state): State<AppState>,
    Path(chief_doctor_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ChiefDoctorService::delete_chief_doctor(state.chief_doctors.as_ref(), chief_doctor_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
