//! JWT claims and token kinds.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The four kinds of token the API issues.
///
/// The serialized tags double as the `type` claim inside tokens and as the
/// `token_type` column of persisted records, so both stay in camelCase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[sqlx(type_name = "token_type", rename_all = "camelCase")]
pub enum TokenType {
    Access,
    Refresh,
    ResetPassword,
    VerifyEmail,
}

impl TokenType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
            TokenType::ResetPassword => "resetPassword",
            TokenType::VerifyEmail => "verifyEmail",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by every MedBay JWT.
///
/// The shape is fixed: `sub` holds the actor id, `iat` and `exp` are unix
/// timestamps in seconds, and `type` tags the kind of token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the actor the token was issued to.
    pub sub: String,
    /// Issued-at time, seconds since the unix epoch.
    pub iat: usize,
    /// Expiry time, seconds since the unix epoch.
    pub exp: usize,
    /// Kind of token this is.
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claims_serialize_to_wire_shape() {
        let claims = Claims {
            sub: "0c7f94f0-7cc5-4f9d-9d1b-6a87c2fb3a9e".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_000_900,
            token_type: TokenType::ResetPassword,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            value,
            json!({
                "sub": claims.sub,
                "iat": 1_700_000_000,
                "exp": 1_700_000_900,
                "type": "resetPassword",
            })
        );
    }

    #[test]
    fn test_claims_roundtrip() {
        let claims = Claims {
            sub: "b2f9c1d4-0000-4000-8000-000000000001".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
            token_type: TokenType::Access,
        };

        let encoded = serde_json::to_string(&claims).unwrap();
        let decoded: Claims = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_token_type_tags() {
        assert_eq!(TokenType::Access.as_str(), "access");
        assert_eq!(TokenType::Refresh.as_str(), "refresh");
        assert_eq!(TokenType::ResetPassword.as_str(), "resetPassword");
        assert_eq!(TokenType::VerifyEmail.as_str(), "verifyEmail");

        for token_type in [
            TokenType::Access,
            TokenType::Refresh,
            TokenType::ResetPassword,
            TokenType::VerifyEmail,
        ] {
            let tag = serde_json::to_value(token_type).unwrap();
            assert_eq!(tag, json!(token_type.as_str()));
        }
    }
}
