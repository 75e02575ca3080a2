mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    access_token_for, generate_unique_email, hospital_payload, id_of, register_hospital, seed_admin,
    send, send_json, setup_test_app,
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn test_register_hospital_success() {
    let (app, _state) = setup_test_app();
    let email = generate_unique_email();

    let request = Request::builder()
        .method("POST")
        .uri("/api/hospitals/register")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&hospital_payload(&email)).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body["hospital"]["email"], email);
    assert_eq!(body["hospital"]["role"], "hospital");
    assert_eq!(body["hospital"]["is_email_verified"], false);
    assert!(body["hospital"].get("password").is_none());
    assert!(body["tokens"]["access"]["token"].is_string());
    assert!(body["tokens"]["refresh"]["token"].is_string());
}

#[tokio::test]
async fn test_register_hospital_duplicate_email() {
    let (app, _state) = setup_test_app();
    let email = generate_unique_email();

    register_hospital(&app, &email).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/hospitals/register",
        None,
        hospital_payload(&email),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already taken");
}

#[tokio::test]
async fn test_register_hospital_duplicate_registration_id() {
    let (app, _state) = setup_test_app();

    let mut payload = hospital_payload(&generate_unique_email());
    payload["registration_id"] = json!("REG7734001");

    let (status, _) = send_json(&app, "POST", "/api/hospitals/register", None, payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    payload["email"] = json!(generate_unique_email());
    let (status, body) = send_json(&app, "POST", "/api/hospitals/register", None, payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Registration id already taken");
}

#[tokio::test]
async fn test_register_hospital_rejects_password_without_number() {
    let (app, _state) = setup_test_app();

    let mut payload = hospital_payload(&generate_unique_email());
    payload["password"] = json!("passwordonly");

    let (status, body) = send_json(&app, "POST", "/api/hospitals/register", None, payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "Password must contain at least one letter and one number"
    );
}

#[tokio::test]
async fn test_register_hospital_rejects_short_password() {
    let (app, _state) = setup_test_app();

    let mut payload = hospital_payload(&generate_unique_email());
    payload["password"] = json!("pass1");

    let (status, _) = send_json(&app, "POST", "/api/hospitals/register", None, payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_hospital_rejects_invalid_email() {
    let (app, _state) = setup_test_app();

    let mut payload = hospital_payload(&generate_unique_email());
    payload["email"] = json!("not-an-email");

    let (status, _) = send_json(&app, "POST", "/api/hospitals/register", None, payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_hospital_rejects_symbolic_registration_id() {
    let (app, _state) = setup_test_app();

    let mut payload = hospital_payload(&generate_unique_email());
    payload["registration_id"] = json!("REG-22/04");

    let (status, body) = send_json(&app, "POST", "/api/hospitals/register", None, payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Registration id must be alphanumeric");
}

#[tokio::test]
async fn test_register_hospital_rejects_registration_id_out_of_bounds() {
    let (app, _state) = setup_test_app();

    // 5-10 characters, so 4 is too short and 11 too long.
    let mut payload = hospital_payload(&generate_unique_email());
    payload["registration_id"] = json!("REG1");
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/hospitals/register",
        None,
        payload.clone(),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    payload["registration_id"] = json!("REG12345678");
    let (status, _) = send_json(&app, "POST", "/api/hospitals/register", None, payload).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_hospital_missing_field_is_bad_request() {
    let (app, _state) = setup_test_app();

    let mut payload = hospital_payload(&generate_unique_email());
    payload.as_object_mut().unwrap().remove("password");

    let (status, _) = send_json(&app, "POST", "/api/hospitals/register", None, payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_normalizes_email() {
    let (app, _state) = setup_test_app();
    let email = format!("MiXeD-{}@Test.Com", Uuid::new_v4());

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/hospitals/register",
        None,
        hospital_payload(&email),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["hospital"]["email"], email.to_lowercase());
}

#[tokio::test]
async fn test_register_hospital_stores_logo() {
    let (app, _state) = setup_test_app();

    let mut payload = hospital_payload(&generate_unique_email());
    payload["logo"] = json!("https://cdn.example.com/mercy.png");

    let (status, body) = send_json(&app, "POST", "/api/hospitals/register", None, payload).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["hospital"]["logo"], "https://cdn.example.com/mercy.png");
}

#[tokio::test]
async fn test_login_hospital_success() {
    let (app, _state) = setup_test_app();
    let email = generate_unique_email();
    register_hospital(&app, &email).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/hospitals/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": email,
                "password": "password1"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body["hospital"]["email"], email);
    assert!(body["tokens"]["access"]["token"].is_string());
}

#[tokio::test]
async fn test_login_hospital_wrong_password() {
    let (app, _state) = setup_test_app();
    let email = generate_unique_email();
    register_hospital(&app, &email).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/hospitals/login",
        None,
        json!({ "email": email, "password": "wrongpass1" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Incorrect email or password");
}

#[tokio::test]
async fn test_login_hospital_unknown_email() {
    let (app, _state) = setup_test_app();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/hospitals/login",
        None,
        json!({ "email": "nobody@test.com", "password": "password1" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Incorrect email or password");
}

#[tokio::test]
async fn test_login_accepts_differently_cased_email() {
    let (app, _state) = setup_test_app();
    let email = generate_unique_email();
    register_hospital(&app, &email).await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/hospitals/login",
        None,
        json!({ "email": email.to_uppercase(), "password": "password1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_hospitals_requires_auth() {
    let (app, _state) = setup_test_app();

    let (status, body) = send(&app, "GET", "/api/hospitals/", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[tokio::test]
async fn test_hospital_role_cannot_list_hospitals() {
    let (app, _state) = setup_test_app();
    let (_, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let token = tokens["access"]["token"].as_str().unwrap();

    let (status, body) = send(&app, "GET", "/api/hospitals/", Some(token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn test_admin_lists_hospitals_with_pagination() {
    let (app, state) = setup_test_app();

    for _ in 0..3 {
        register_hospital(&app, &generate_unique_email()).await;
    }

    let admin_id = seed_admin(&state).await;
    let token = access_token_for(&state, admin_id);

    let (status, body) = send(&app, "GET", "/api/hospitals/?limit=2", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    // The admin account itself lives in the hospitals store.
    assert_eq!(body["meta"]["total"], 4);
    assert_eq!(body["meta"]["limit"], 2);
    assert_eq!(body["meta"]["has_more"], true);

    let (status, body) = send(
        &app,
        "GET",
        "/api/hospitals/?limit=2&page=2",
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["has_more"], false);
}

#[tokio::test]
async fn test_admin_filters_hospitals_by_name() {
    let (app, state) = setup_test_app();

    let mut payload = hospital_payload(&generate_unique_email());
    payload["name"] = json!("Mercy West");
    let (status, _) = send_json(&app, "POST", "/api/hospitals/register", None, payload).await;
    assert_eq!(status, StatusCode::CREATED);

    register_hospital(&app, &generate_unique_email()).await;

    let admin_id = seed_admin(&state).await;
    let token = access_token_for(&state, admin_id);

    let (status, body) = send(&app, "GET", "/api/hospitals/?name=mercy", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Mercy West");
}

#[tokio::test]
async fn test_hospital_reads_own_record() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let token = tokens["access"]["token"].as_str().unwrap();
    let id = id_of(&hospital);

    let (status, body) = send(&app, "GET", &format!("/api/hospitals/{id}"), Some(token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], hospital["id"]);
}

#[tokio::test]
async fn test_hospital_cannot_read_other_hospital() {
    let (app, _state) = setup_test_app();
    let (_, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let (other, _) = register_hospital(&app, &generate_unique_email()).await;
    let token = tokens["access"]["token"].as_str().unwrap();
    let other_id = id_of(&other);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/hospitals/{other_id}"),
        Some(token),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn test_admin_reads_any_hospital() {
    let (app, state) = setup_test_app();
    let (hospital, _) = register_hospital(&app, &generate_unique_email()).await;
    let id = id_of(&hospital);

    let admin_id = seed_admin(&state).await;
    let token = access_token_for(&state, admin_id);

    let (status, body) = send(&app, "GET", &format!("/api/hospitals/{id}"), Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], hospital["id"]);
}

#[tokio::test]
async fn test_get_hospital_not_found() {
    let (app, state) = setup_test_app();
    let admin_id = seed_admin(&state).await;
    let token = access_token_for(&state, admin_id);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/hospitals/{}", Uuid::new_v4()),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Hospital not found");
}

#[tokio::test]
async fn test_hospital_updates_own_record() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let token = tokens["access"]["token"].as_str().unwrap();
    let id = id_of(&hospital);

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/hospitals/{id}"),
        Some(token),
        json!({ "name": "Renamed Medical Center", "logo": "https://cdn.test/logo.png" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed Medical Center");
    assert_eq!(body["logo"], "https://cdn.test/logo.png");
    // Untouched fields survive a partial update.
    assert_eq!(body["email"], hospital["email"]);
    assert_eq!(body["registration_id"], hospital["registration_id"]);
}

#[tokio::test]
async fn test_update_hospital_rejects_taken_email() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let other_email = generate_unique_email();
    register_hospital(&app, &other_email).await;

    let token = tokens["access"]["token"].as_str().unwrap();
    let id = id_of(&hospital);

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/hospitals/{id}"),
        Some(token),
        json!({ "email": other_email }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already taken");
}

#[tokio::test]
async fn test_update_hospital_rejects_weak_password() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let token = tokens["access"]["token"].as_str().unwrap();
    let id = id_of(&hospital);

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/hospitals/{id}"),
        Some(token),
        json!({ "password": "12345678" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "Password must contain at least one letter and one number"
    );
}

#[tokio::test]
async fn test_hospital_deletes_own_record() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let token = tokens["access"]["token"].as_str().unwrap();
    let id = id_of(&hospital);

    let (status, _) = send(&app, "DELETE", &format!("/api/hospitals/{id}"), Some(token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The account is gone, so its access token no longer resolves.
    let (status, body) = send(&app, "GET", &format!("/api/hospitals/{id}"), Some(token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}
