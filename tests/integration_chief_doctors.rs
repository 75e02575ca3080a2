mod common;

use axum::http::StatusCode;
use common::{
    access_token_for, create_chief_doctor, doctor_payload, generate_unique_email,
    register_hospital, seed_admin, send, send_json, setup_test_app,
};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_hospital_creates_chief_doctor() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let hospital_id = hospital["id"].as_str().unwrap();
    let token = tokens["access"]["token"].as_str().unwrap();

    let email = generate_unique_email();
    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/hospitals/{hospital_id}/chief-doctors"),
        Some(token),
        doctor_payload(&email),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["chief_doctor"]["email"], email);
    assert_eq!(body["chief_doctor"]["role"], "chiefDoctor");
    assert_eq!(
        body["chief_doctor"]["hospital"]["hospital_id"],
        hospital["id"]
    );
    assert!(body["chief_doctor"].get("password").is_none());
    assert!(body["tokens"]["access"]["token"].is_string());
}

#[tokio::test]
async fn test_create_right_admits_hospital_under_foreign_path() {
    let (app, _state) = setup_test_app();
    let (_, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let (other, _) = register_hospital(&app, &generate_unique_email()).await;

    let token = tokens["access"]["token"].as_str().unwrap();
    let other_id = other["id"].as_str().unwrap();

    // Unlike doctor creation, the hospital role carries createChiefDoctors,
    // so the rights check passes without the owner check. The new chief
    // doctor lands under the hospital named in the path.
    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/hospitals/{other_id}/chief-doctors"),
        Some(token),
        doctor_payload(&generate_unique_email()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["chief_doctor"]["hospital"]["hospital_id"], other["id"]);
}

#[tokio::test]
async fn test_login_chief_doctor() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let email = generate_unique_email();
    create_chief_doctor(
        &app,
        hospital["id"].as_str().unwrap(),
        tokens["access"]["token"].as_str().unwrap(),
        &email,
    )
    .await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/chief-doctors/login",
        None,
        json!({ "email": email, "password": "password1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chief_doctor"]["email"], email);
    assert!(body["tokens"]["refresh"]["token"].is_string());
}

#[tokio::test]
async fn test_chief_doctor_reads_self() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let (chief, chief_tokens) = create_chief_doctor(
        &app,
        hospital["id"].as_str().unwrap(),
        tokens["access"]["token"].as_str().unwrap(),
        &generate_unique_email(),
    )
    .await;

    let chief_id = chief["id"].as_str().unwrap();
    let token = chief_tokens["access"]["token"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/chief-doctors/{chief_id}"),
        Some(token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], chief["id"]);
}

#[tokio::test]
async fn test_chief_doctor_cannot_list_chief_doctors() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let (_, chief_tokens) = create_chief_doctor(
        &app,
        hospital["id"].as_str().unwrap(),
        tokens["access"]["token"].as_str().unwrap(),
        &generate_unique_email(),
    )
    .await;

    let token = chief_tokens["access"]["token"].as_str().unwrap();

    let (status, body) = send(&app, "GET", "/api/chief-doctors/", Some(token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn test_chief_doctor_cannot_read_peer() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let hospital_id = hospital["id"].as_str().unwrap();
    let hospital_token = tokens["access"]["token"].as_str().unwrap();

    let (_, chief_tokens) =
        create_chief_doctor(&app, hospital_id, hospital_token, &generate_unique_email()).await;
    let (peer, _) =
        create_chief_doctor(&app, hospital_id, hospital_token, &generate_unique_email()).await;

    let peer_id = peer["id"].as_str().unwrap();
    let token = chief_tokens["access"]["token"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/chief-doctors/{peer_id}"),
        Some(token),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn test_admin_lists_chief_doctors_with_filter() {
    let (app, state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let hospital_id = hospital["id"].as_str().unwrap();
    let hospital_token = tokens["access"]["token"].as_str().unwrap();

    create_chief_doctor(&app, hospital_id, hospital_token, &generate_unique_email()).await;

    let mut payload = doctor_payload(&generate_unique_email());
    payload["specialization"] = json!("Neurology");
    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/hospitals/{hospital_id}/chief-doctors"),
        Some(hospital_token),
        payload,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let admin_id = seed_admin(&state).await;
    let token = access_token_for(&state, admin_id);

    let (status, body) = send(
        &app,
        "GET",
        "/api/chief-doctors/?specialization=neuro",
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["specialization"], "Neurology");
}

#[tokio::test]
async fn test_hospital_lists_own_chief_doctors() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let hospital_id = hospital["id"].as_str().unwrap();
    let token = tokens["access"]["token"].as_str().unwrap();

    create_chief_doctor(&app, hospital_id, token, &generate_unique_email()).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/hospitals/{hospital_id}/chief-doctors"),
        Some(token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["hospital"]["hospital_id"], hospital["id"]);
}

#[tokio::test]
async fn test_chief_doctor_updates_self() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let (chief, chief_tokens) = create_chief_doctor(
        &app,
        hospital["id"].as_str().unwrap(),
        tokens["access"]["token"].as_str().unwrap(),
        &generate_unique_email(),
    )
    .await;

    let chief_id = chief["id"].as_str().unwrap();
    let token = chief_tokens["access"]["token"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/chief-doctors/{chief_id}"),
        Some(token),
        json!({ "work_history": "12 years at Mercy West" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["work_history"], "12 years at Mercy West");
}

#[tokio::test]
async fn test_chief_doctor_cannot_update_peer() {
    let (app, _state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let hospital_id = hospital["id"].as_str().unwrap();
    let hospital_token = tokens["access"]["token"].as_str().unwrap();

    let (_, chief_tokens) =
        create_chief_doctor(&app, hospital_id, hospital_token, &generate_unique_email()).await;
    let (peer, _) =
        create_chief_doctor(&app, hospital_id, hospital_token, &generate_unique_email()).await;

    let peer_id = peer["id"].as_str().unwrap();
    let token = chief_tokens["access"]["token"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/chief-doctors/{peer_id}"),
        Some(token),
        json!({ "availability": "Nights" }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn test_admin_deletes_chief_doctor() {
    let (app, state) = setup_test_app();
    let (hospital, tokens) = register_hospital(&app, &generate_unique_email()).await;
    let (chief, _) = create_chief_doctor(
        &app,
        hospital["id"].as_str().unwrap(),
        tokens["access"]["token"].as_str().unwrap(),
        &generate_unique_email(),
    )
    .await;

    let admin_id = seed_admin(&state).await;
    let token = access_token_for(&state, admin_id);
    let chief_id = chief["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/chief-doctors/{chief_id}"),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/chief-doctors/{chief_id}"),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Chief doctor not found");
}

#[tokio::test]
async fn test_get_chief_doctor_not_found() {
    let (app, state) = setup_test_app();
    let admin_id = seed_admin(&state).await;
    let token = access_token_for(&state, admin_id);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/chief-doctors/{}", Uuid::new_v4()),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Chief doctor not found");
}
