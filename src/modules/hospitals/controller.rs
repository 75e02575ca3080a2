//! HTTP handlers for hospital accounts.

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
    Hospital, HospitalAuthResponse, HospitalFilterParams, PaginatedHospitalsResponse,
    RegisterHospitalDto, UpdateHospitalDto,
};
use super::service::HospitalService;

/// Register a new hospital account.
#[utoipa::path(
    post,
    path = "/api/hospitals/register",
    request_body = RegisterHospitalDto,
    responses(
        (status = 201, description = "Hospital registered successfully", body = HospitalAuthResponse),
        (status = 400, description = "Email or registration id already taken"),
        (status = 422, description = "Validation error")
    ),
    tag = "Hospitals"
)]
pub async fn register_hospital(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterHospitalDto>,
) -> Result<(StatusCode, Json<HospitalAuthResponse>), AppError> {
    let response = HospitalService::register(
        state.hospitals.as_ref(),
        state.tokens.as_ref(),
        &state.jwt_config,
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with hospital credentials.
#[utoipa::path(
    post,
    path = "/api/hospitals/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = HospitalAuthResponse),
        (status = 401, description = "Incorrect email or password"),
        (status = 422, description = "Validation error")
    ),
    tag = "Hospitals"
)]
pub async fn login_hospital(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<Json<HospitalAuthResponse>, AppError> {
    let response = HospitalService::login(
        state.hospitals.as_ref(),
        state.tokens.as_ref(),
        &state.jwt_config,
        &dto.email,
        &dto.password,
    )
    .await?;

    Ok(Json(response))
}

/// List hospitals with optional filters and pagination.
#[utoipa::path(
    get,
    path = "/api/hospitals",
    params(
        ("name" = Option<String>, Query, description = "Filter by hospital name (partial match)"),
        ("role" = Option<String>, Query, description = "Filter by account role"),
        ("limit" = Option<i64>, Query, description = "Maximum number of records to return (1-100, default 10)"),
        ("offset" = Option<i64>, Query, description = "Number of records to skip"),
        ("page" = Option<i64>, Query, description = "1-based page number, takes precedence over offset")
    ),
    responses(
        (status = 200, description = "Paginated list of hospitals", body = PaginatedHospitalsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Hospitals",
    security(("bearer_auth" = []))
)]
pub async fn get_hospitals(
    State(state): State<AppState>,
    filters: Result<Query<HospitalFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedHospitalsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let response = HospitalService::get_all_hospitals(state.hospitals.as_ref(), filters).await?;

    Ok(Json(response))
}

/// Get a single hospital by ID.
#[utoipa::path(
    get,
    path = "/api/hospitals/{hospital_id}",
    params(
        ("hospital_id" = Uuid, Path, description = "Hospital ID")
    ),
    responses(
        (status = 200, description = "Hospital found", body = Hospital),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Hospital not found")
    ),
    tag = "Hospitals",
    security(("bearer_auth" = []))
)]
pub async fn get_hospital(
    State(state): State<AppState>,
    Path(hospital_id): Path<Uuid>,
) -> Result<Json<Hospital>, AppError> {
    let hospital =
        HospitalService::get_hospital_by_id(state.hospitals.as_ref(), hospital_id).await?;

    Ok(Json(hospital))
}

/// Partially update a hospital.
#[utoipa::path(
    patch,
    path = "/api/hospitals/{hospital_id}",
    params(
        ("hospital_id" = Uuid, Path, description = "Hospital ID")
    ),
    request_body = UpdateHospitalDto,
    responses(
        (status = 200, description = "Hospital updated successfully", body = Hospital),
        (status = 400, description = "Email already taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Hospital not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Hospitals",
    security(("bearer_auth" = []))
)]
pub async fn update_hospital(
    State(state): State<AppState>,
    Path(hospital_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateHospitalDto>,
) -> Result<Json<Hospital>, AppError> {
    let hospital =
        HospitalService::update_hospital(state.hospitals.as_ref(), hospital_id, dto).await?;

    Ok(Json(hospital))
}

/// Delete a hospital account.
#[utoipa::path(
    delete,
    path = "/api/hospitals/{hospital_id}",
    params(
        ("hospital_id" = Uuid, Path, description = "Hospital ID")
    ),
    responses(
        (status = 204, description = "Hospital deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Hospital not found")
    ),
    tag = "Hospitals",
    security(("bearer_auth" = []))
)]
pub async fn delete_hospital(
    State(state): State<AppState>,
    Path(hospital_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    HospitalService::delete_hospital(state.hospitals.as_ref(), hospital_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
