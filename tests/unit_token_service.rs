use axum::http::StatusCode;
use chrono::{Duration, Utc};
use medbay::testing::{InMemoryTokenStore, test_jwt_config};
use medbay_auth::{TokenService, TokenStore, TokenType};
use uuid::Uuid;

#[tokio::test]
async fn test_auth_pair_persists_only_refresh() {
    let store = InMemoryTokenStore::default();
    let config = test_jwt_config();
    let actor_id = Uuid::new_v4();

    let pair = TokenService::generate_auth_tokens(&store, &config, actor_id)
        .await
        .unwrap();

    let refresh = TokenService::verify_token(&store, &config, &pair.refresh.token, TokenType::Refresh)
        .await
        .unwrap();
    assert_eq!(refresh.actor_id, actor_id);
    assert_eq!(refresh.token_type, TokenType::Refresh);
    assert!(!refresh.blacklisted);

    // The access token decodes fine but has no backing record.
    let err = TokenService::verify_token(&store, &config, &pair.access.token, TokenType::Access)
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert_eq!(err.error.to_string(), "Token not found");
}

#[tokio::test]
async fn test_purpose_token_round_trip() {
    let store = InMemoryTokenStore::default();
    let config = test_jwt_config();
    let actor_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::minutes(10);

    let token = TokenService::generate_purpose_token(
        &store,
        &config,
        actor_id,
        TokenType::ResetPassword,
        expires_at,
    )
    .await
    .unwrap();

    let record = TokenService::verify_token(&store, &config, &token, TokenType::ResetPassword)
        .await
        .unwrap();

    assert_eq!(record.actor_id, actor_id);
    assert_eq!(record.token_type, TokenType::ResetPassword);
}

#[tokio::test]
async fn test_verify_rejects_mismatched_type() {
    let store = InMemoryTokenStore::default();
    let config = test_jwt_config();
    let actor_id = Uuid::new_v4();

    let token = TokenService::generate_purpose_token(
        &store,
        &config,
        actor_id,
        TokenType::VerifyEmail,
        Utc::now() + Duration::minutes(10),
    )
    .await
    .unwrap();

    let err = TokenService::verify_token(&store, &config, &token, TokenType::ResetPassword)
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert_eq!(err.error.to_string(), "Token not found");
}

#[tokio::test]
async fn test_verify_rejects_blacklisted_record() {
    let store = InMemoryTokenStore::default();
    let config = test_jwt_config();
    let actor_id = Uuid::new_v4();

    let pair = TokenService::generate_auth_tokens(&store, &config, actor_id)
        .await
        .unwrap();

    let record = store
        .find_by_token(&pair.refresh.token, TokenType::Refresh)
        .await
        .unwrap()
        .unwrap();
    store.blacklist(record.id).await.unwrap();

    let err = TokenService::verify_token(&store, &config, &pair.refresh.token, TokenType::Refresh)
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert_eq!(err.error.to_string(), "Token not found");
}

#[tokio::test]
async fn test_verify_rejects_garbage() {
    let store = InMemoryTokenStore::default();
    let config = test_jwt_config();

    let err = TokenService::verify_token(&store, &config, "nonsense", TokenType::Access)
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert_eq!(err.error.to_string(), "Invalid or expired token");
}

#[tokio::test]
async fn test_verify_rejects_expired_token() {
    let store = InMemoryTokenStore::default();
    let config = test_jwt_config();
    let actor_id = Uuid::new_v4();
    let expired_at = Utc::now() - Duration::seconds(30);

    let token =
        TokenService::generate_token(actor_id, expired_at, TokenType::Refresh, &config.secret)
            .unwrap();
    TokenService::save_token(&store, &token, actor_id, expired_at, TokenType::Refresh, false)
        .await
        .unwrap();

    // Expiry is enforced by the JWT itself even though a record exists.
    let err = TokenService::verify_token(&store, &config, &token, TokenType::Refresh)
        .await
        .unwrap_err();

    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert_eq!(err.error.to_string(), "Invalid or expired token");
}

#[tokio::test]
async fn test_delete_for_actor_scopes_by_type() {
    let store = InMemoryTokenStore::default();
    let config = test_jwt_config();
    let actor_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::minutes(10);

    for _ in 0..2 {
        TokenService::generate_purpose_token(
            &store,
            &config,
            actor_id,
            TokenType::ResetPassword,
            expires_at,
        )
        .await
        .unwrap();
    }
    let verify_token = TokenService::generate_purpose_token(
        &store,
        &config,
        actor_id,
        TokenType::VerifyEmail,
        expires_at,
    )
    .await
    .unwrap();

    let removed = store
        .delete_for_actor(actor_id, TokenType::ResetPassword)
        .await
        .unwrap();
    assert_eq!(removed, 2);

    // Tokens of other types survive.
    let record = TokenService::verify_token(&store, &config, &verify_token, TokenType::VerifyEmail)
        .await
        .unwrap();
    assert_eq!(record.actor_id, actor_id);
}
