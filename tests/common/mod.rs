#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use medbay::modules::hospitals::model::NewHospital;
use medbay::router::init_router;
use medbay::state::AppState;
use medbay::testing::test_state;
use medbay_auth::{Role, TokenService, TokenType};

/// Router plus the state behind it, so tests can mint tokens and reach
/// into the stores directly.
pub fn setup_test_app() -> (Router, AppState) {
    let state = test_state();
    (init_router(state.clone()), state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

fn generate_unique_registration_id() -> String {
    // Registration ids must be 5-10 alphanumeric characters.
    let hex = Uuid::new_v4().simple().to_string();
    format!("REG{}", &hex[..7])
}

pub fn hospital_payload(email: &str) -> Value {
    json!({
        "name": "St. Vincent Medical Center",
        "email": email,
        "password": "password1",
        "location": "Portland, OR",
        "registration_id": generate_unique_registration_id(),
        "hospital_type": "general",
        "contact": "+1-503-555-0142"
    })
}

pub fn doctor_payload(email: &str) -> Value {
    json!({
        "name": "Dr. Amara Osei",
        "email": email,
        "password": "password1",
        "specialization": "Cardiology",
        "medical_license_number": "ML483920",
        "years_of_experience": 9,
        "education_qualifications": "MD, University of Washington"
    })
}

/// Sends `body` as JSON and returns the status plus the parsed response
/// body (`Null` when the response has no body).
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    execute(app, request).await
}

/// Sends a bodyless request.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).unwrap();
    execute(app, request).await
}

async fn execute(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Registers a hospital through the API. Returns the hospital record and
/// its token pair.
pub async fn register_hospital(app: &Router, email: &str) -> (Value, Value) {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/hospitals/register",
        None,
        hospital_payload(email),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    (body["hospital"].clone(), body["tokens"].clone())
}

/// Enrolls a doctor under `hospital_id` using the hospital's own access
/// token. Returns the doctor record and its token pair.
pub async fn create_doctor(
    app: &Router,
    hospital_id: &str,
    hospital_token: &str,
    email: &str,
) -> (Value, Value) {
    let (status, body) = send_json(
        app,
        "POST",
        &format!("/api/hospitals/{hospital_id}/doctors"),
        Some(hospital_token),
        doctor_payload(email),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create doctor failed: {body}");
    (body["doctor"].clone(), body["tokens"].clone())
}

/// Enrolls a chief doctor under `hospital_id` using the hospital's own
/// access token. Returns the chief doctor record and its token pair.
pub async fn create_chief_doctor(
    app: &Router,
    hospital_id: &str,
    hospital_token: &str,
    email: &str,
) -> (Value, Value) {
    let (status, body) = send_json(
        app,
        "POST",
        &format!("/api/hospitals/{hospital_id}/chief-doctors"),
        Some(hospital_token),
        doctor_payload(email),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "create chief doctor failed: {body}"
    );
    (body["chief_doctor"].clone(), body["tokens"].clone())
}

/// Signs an access token for an arbitrary actor id without going through
/// login.
pub fn access_token_for(state: &AppState, actor_id: Uuid) -> String {
    let expires_at = Utc::now() + chrono::Duration::minutes(30);
    token_of_type(state, actor_id, TokenType::Access, expires_at)
}

/// Signs a token of any type and expiry, for negative tests. Nothing is
/// persisted.
pub fn token_of_type(
    state: &AppState,
    actor_id: Uuid,
    token_type: TokenType,
    expires_at: DateTime<Utc>,
) -> String {
    TokenService::generate_token(actor_id, expires_at, token_type, &state.jwt_config.secret)
        .unwrap()
}

pub fn id_of(record: &Value) -> Uuid {
    record["id"].as_str().unwrap().parse().unwrap()
}

/// Inserts an account carrying the admin role straight into the hospitals
/// store and returns its id. Tests mint tokens for it directly, so the
/// password hash never matters.
pub async fn seed_admin(state: &AppState) -> Uuid {
    let admin = state
        .hospitals
        .create(NewHospital {
            name: "Network Operations".to_string(),
            email: generate_unique_email(),
            password_hash: "unused".to_string(),
            location: "Remote".to_string(),
            registration_id: generate_unique_registration_id(),
            hospital_type: "administrative".to_string(),
            contact: "+1-503-555-0100".to_string(),
            logo: None,
            role: Role::Admin,
        })
        .await
        .unwrap();
    admin.id
}
