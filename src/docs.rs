use medbay_auth::{AuthTokens, Role, TokenWithExpiry};
use medbay_core::{PaginationMeta, PaginationParams};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    ForgotPasswordDto, LoginDto, RefreshTokenDto, ResetPasswordDto,
};
use crate::modules::chief_doctors::model::{
    ChiefDoctor, ChiefDoctorAuthResponse, ChiefDoctorFilterParams, CreateChiefDoctorDto,
    PaginatedChiefDoctorsResponse, UpdateChiefDoctorDto,
};
use crate::modules::doctors::model::{
    CreateDoctorDto, Doctor, DoctorAuthResponse, DoctorFilterParams, PaginatedDoctorsResponse,
    UpdateDoctorDto,
};
use crate::modules::hospitals::model::{
    Hospital, HospitalAuthResponse, HospitalFilterParams, HospitalSnapshot,
    PaginatedHospitalsResponse, RegisterHospitalDto, UpdateHospitalDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::hospitals::controller::register_hospital,
        crate::modules::hospitals::controller::login_hospital,
        crate::modules::hospitals::controller::get_hospitals,
        crate::modules::hospitals::controller::get_hospital,
        crate::modules::hospitals::controller::update_hospital,
        crate::modules::hospitals::controller::delete_hospital,
        crate::modules::doctors::controller::create_doctor,
        crate::modules::doctors::controller::get_hospital_doctors,
        crate::modules::doctors::controller::login_doctor,
        crate::modules::doctors::controller::get_doctors,
        crate::modules::doctors::controller::get_doctor,
        crate::modules::doctors::controller::update_doctor,
        crate::modules::doctors::controller::delete_doctor,
        crate::modules::chief_doctors::controller::create_chief_doctor,
        crate::modules::chief_doctors::controller::get_hospital_chief_doctors,
        crate::modules::chief_doctors::controller::login_chief_doctor,
        crate::modules::chief_doctors::controller::get_chief_doctors,
        crate::modules::chief_doctors::controller::get_chief_doctor,
        crate::modules::chief_doctors::controller::update_chief_doctor,
        crate::modules::chief_doctors::controller::delete_chief_doctor,
        crate::modules::auth::controller::refresh_tokens,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::auth::controller::send_verification_email,
        crate::modules::auth::controller::verify_email,
    ),
    components(
        schemas(
            Hospital,
            HospitalSnapshot,
            RegisterHospitalDto,
            UpdateHospitalDto,
            HospitalFilterParams,
            PaginatedHospitalsResponse,
            HospitalAuthResponse,
            Doctor,
            CreateDoctorDto,
            UpdateDoctorDto,
            DoctorFilterParams,
            PaginatedDoctorsResponse,
            DoctorAuthResponse,
            ChiefDoctor,
            CreateChiefDoctorDto,
            UpdateChiefDoctorDto,
            ChiefDoctorFilterParams,
            PaginatedChiefDoctorsResponse,
            ChiefDoctorAuthResponse,
            LoginDto,
            RefreshTokenDto,
            ForgotPasswordDto,
            ResetPasswordDto,
            ErrorResponse,
            Role,
            AuthTokens,
            TokenWithExpiry,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Hospitals", description = "Hospital account and management endpoints"),
        (name = "Doctors", description = "Doctor management endpoints"),
        (name = "Chief Doctors", description = "Chief doctor management endpoints"),
        (name = "Auth", description = "Token lifecycle and account recovery endpoints")
    ),
    info(
        title = "MedBay API",
        version = "0.1.0",
        description = "A modern REST API built with Rust, Axum, and PostgreSQL featuring JWT-based authentication.",
        contact(
            name = "API Support",
            email = "support@medbay.dev"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

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
                        .build(),
                ),
            )
        }
    }
}
