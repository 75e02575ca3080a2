use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auth::router::init_auth_router;
use crate::modules::chief_doctors::router::{
    init_chief_doctors_list_router, init_chief_doctors_router,
    init_hospital_chief_doctors_router,
};
use crate::modules::doctors::router::{
    init_doctors_list_router, init_doctors_router, init_hospital_doctors_router,
};
use crate::modules::hospitals::router::{init_hospitals_list_router, init_hospitals_router};
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/health", get(health_check))
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/hospitals",
                    init_hospitals_router(state.clone())
                        .nest(
                            "/{hospital_id}/doctors",
                            init_hospital_doctors_router(state.clone()),
                        )
                        .nest(
                            "/{hospital_id}/chief-doctors",
                            init_hospital_chief_doctors_router(state.clone()),
                        ),
                )
                // Trailing-slash forms of the collection roots. Nesting a
                // router flattens its `/` route onto the bare prefix, so the
                // slashed spellings need their own mounts.
                .nest("/hospitals/", init_hospitals_list_router(state.clone()))
                .nest("/doctors", init_doctors_router(state.clone()))
                .nest("/doctors/", init_doctors_list_router(state.clone()))
                .nest("/chief-doctors", init_chief_doctors_router(state.clone()))
                .nest(
                    "/chief-doctors/",
                    init_chief_doctors_list_router(state.clone()),
                )
                .nest("/auth", init_auth_router(state.clone())),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
