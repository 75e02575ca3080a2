mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use common::{
    access_token_for, create_doctor, generate_unique_email, register_hospital, seed_admin, send,
    setup_test_app, token_of_type,
};
use http_body_util::BodyExt;
use medbay_auth::{Claims, TokenType, sign_token};
use tower::ServiceExt;
use uuid::Uuid;

async fn get_hospitals_with_header(
    app: &axum::Router,
    authorization: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri("/api/hospitals/");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_gate_rejects_missing_header() {
    let (app, _state) = setup_test_app();

    let (status, body) = get_hospitals_with_header(&app, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[tokio::test]
async fn test_gate_rejects_non_bearer_scheme() {
    let (app, _state) = setup_test_app();

    let (status, body) = get_hospitals_with_header(&app, Some("Basic dXNlcjpwYXNz")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[tokio::test]
async fn test_gate_rejects_lowercase_scheme() {
    let (app, state) = setup_test_app();
    let admin_id = seed_admin(&state).await;
    let token = access_token_for(&state, admin_id);

    let (status, _) = get_hospitals_with_header(&app, Some(&format!("bearer {token}"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_gate_rejects_garbage_token() {
    let (app, _state) = setup_test_app();

    let (status, body) = get_hospitals_with_header(&app, Some("Bearer not.a.jwt")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[tokio::test]
async fn test_gate_rejects_expired_token() {
    let (app, state) = setup_test_app();
    let admin_id = seed_admin(&state).await;

    let expired = token_of_type(
        &state,
        admin_id,
        TokenType::Access,
        Utc::now() - Duration::seconds(60),
    );

    let (status, body) = get_hospitals_with_header(&app, Some(&format!("Bearer {expired}"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[tokio::test]
async fn test_gate_rejects_refresh_token_on_protected_route() {
    let (app, state) = setup_test_app();
    let admin_id = seed_admin(&state).await;

    let refresh = token_of_type(
        &state,
        admin_id,
        TokenType::Refresh,
        Utc::now() + Duration::days(30),
    );

    let (status, body) = get_hospitals_with_header(&app, Some(&format!("Bearer {refresh}"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[tokio::test]
async fn test_gate_rejects_foreign_signature() {
    let (app, state) = setup_test_app();
    let admin_id = seed_admin(&state).await;

    let claims = Claims {
        sub: admin_id.to_string(),
        iat: Utc::now().timestamp() as usize,
        exp: (Utc::now() + Duration::minutes(5)).timestamp() as usize,
        token_type: TokenType::Access,
    };
    let forged = sign_token(&claims, "some-other-secret").unwrap();

    let (status, body) = get_hospitals_with_header(&app, Some(&format!("Bearer {forged}"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[tokio::test]
async fn test_gate_rejects_unparseable_subject() {
    let (app, state) = setup_test_app();

    let claims = Claims {
        sub: "not-a-uuid".to_string(),
        iat: Utc::now().timestamp() as usize,
        exp: (Utc::now() + Duration::minutes(5)).timestamp() as usize,
        token_type: TokenType::Access,
    };
    let token = sign_token(&claims, &state.jwt_config.secret).unwrap();

    let (status, body) = get_hospitals_with_header(&app, Some(&format!("Bearer {token}"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[tokio::test]
async fn test_gate_rejects_unknown_actor() {
    let (app, state) = setup_test_app();

    let token = access_token_for(&state, Uuid::new_v4());

    let (status, body) = get_hospitals_with_header(&app, Some(&format!("Bearer {token}"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[tokio::test]
async fn test_admin_rights_cover_staff_listings() {
    let (app, state) = setup_test_app();
    let admin_id = seed_admin(&state).await;
    let token = access_token_for(&state, admin_id);

    let (status, _) = send(&app, "GET", "/api/doctors/", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/chief-doctors/", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/hospitals/", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_rights_route_admits_any_actor() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let (_, doctor_tokens) = create_doctor(
        &app,
        hospital["id"].as_str().unwrap(),
        tokens["access"]["token"].as_str().unwrap(),
        &generate_unique_email(),
    )
    .await;

    // Doctors hold none of the admin rights, but the verification route
    // only requires a known actor.
    let doctor_token = doctor_tokens["access"]["token"].as_str().unwrap();
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/send-verification-email",
        Some(doctor_token),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_doctor_rights_do_not_cover_chief_doctors() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let (_, doctor_tokens) = create_doctor(
        &app,
        hospital["id"].as_str().unwrap(),
        tokens["access"]["token"].as_str().unwrap(),
        &generate_unique_email(),
    )
    .await;

    let doctor_token = doctor_tokens["access"]["token"].as_str().unwrap();
    let (status, body) = send(&app, "GET", "/api/chief-doctors/", Some(doctor_token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn test_forbidden_actor_gets_403_not_401() {
    let (app, _state) = setup_test_app();
    let (_, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let token = tokens["access"]["token"].as_str().unwrap();

    // A known actor without the right is refused, not asked to log in.
    let (status, body) = get_hospitals_with_header(&app, Some(&format!("Bearer {token}"))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}
