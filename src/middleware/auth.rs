use anyhow::anyhow;
use axum::{
    RequestPartsExt,
    extract::{FromRequestParts, RawPathParams, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use medbay_auth::{TokenType, decode_token};
use medbay_core::AppError;

use crate::modules::auth::model::Actor;
use crate::state::AppState;

/// Picks the owning subject's id out of a route's raw path parameters.
///
/// Routes that operate on a single account pass one of the [`owner`]
/// extractors to [`gate`] so an actor short on rights can still reach its
/// own record.
pub type OwnerIdExtractor = fn(&RawPathParams) -> Option<Uuid>;

/// Named [`OwnerIdExtractor`]s for the path parameters routes use.
pub mod owner {
    use axum::extract::RawPathParams;
    use uuid::Uuid;

    fn param_uuid(params: &RawPathParams, name: &str) -> Option<Uuid> {
        params
            .iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| Uuid::parse_str(value).ok())
    }

    pub fn hospital_id(params: &RawPathParams) -> Option<Uuid> {
        param_uuid(params, "hospital_id")
    }

    pub fn doctor_id(params: &RawPathParams) -> Option<Uuid> {
        param_uuid(params, "doctor_id")
    }

    pub fn chief_doctor_id(params: &RawPathParams) -> Option<Uuid> {
        param_uuid(params, "chief_doctor_id")
    }
}

/// Outcome of verifying a request against the role registry.
#[derive(Debug, Clone)]
pub enum AuthDecision {
    /// The actor is known and allowed through.
    Authenticated(Actor),
    /// No usable access token, or the token does not resolve to an actor.
    Unauthenticated,
    /// The actor is known but lacks the required rights and does not own
    /// the addressed record.
    Forbidden,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Verifies a request and decides whether it may proceed.
///
/// Any problem with the credential itself (missing or malformed header,
/// bad signature, expiry, wrong token type, unknown actor) collapses into
/// [`AuthDecision::Unauthenticated`]. Once the actor is known, the rights
/// check applies: with a non-empty `required_rights` the actor must hold
/// every right, or own the record addressed by the path. An empty
/// `required_rights` admits any authenticated actor.
///
/// Store failures surface as errors rather than decisions.
pub async fn verify_request(
    state: &AppState,
    parts: &mut Parts,
    required_rights: &[&str],
    owner_id: Option<OwnerIdExtractor>,
) -> Result<AuthDecision, AppError> {
    let Some(token) = bearer_token(parts) else {
        return Ok(AuthDecision::Unauthenticated);
    };
    let Ok(claims) = decode_token(token, &state.jwt_config.secret) else {
        return Ok(AuthDecision::Unauthenticated);
    };
    if claims.token_type != TokenType::Access {
        return Ok(AuthDecision::Unauthenticated);
    }
    let Ok(actor_id) = Uuid::parse_str(&claims.sub) else {
        return Ok(AuthDecision::Unauthenticated);
    };
    let Some(actor) = state.actors().find_by_id(actor_id).await? else {
        return Ok(AuthDecision::Unauthenticated);
    };

    if !required_rights.is_empty() && !state.registry.has_all(actor.role(), required_rights) {
        let owns_record = match owner_id {
            Some(extract) => {
                let params = parts.extract::<RawPathParams>().await.ok();
                params.as_ref().and_then(extract) == Some(actor.id())
            }
            None => false,
        };

        if !owns_record {
            warn!(
                actor.id = %actor.id(),
                actor.role = %actor.role(),
                path = %parts.uri.path(),
                ?required_rights,
                "Request forbidden"
            );
            return Ok(AuthDecision::Forbidden);
        }
    }

    Ok(AuthDecision::Authenticated(actor))
}

/// Authorization gate applied to protected routes.
///
/// On success the verified actor is attached to the request so handlers
/// can read it through [`CurrentActor`]. Unauthenticated requests get a
/// 401, authenticated ones without the required rights a 403.
///
/// # Example
///
/// ```ignore
/// const MANAGE: &[&str] = &[rights::MANAGE_HOSPITALS];
///
/// Router::new()
///     .route("/{hospital_id}", patch(update_hospital))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state: State<AppState>, req: Request, next: Next| {
///             gate(state, req, next, MANAGE, Some(owner::hospital_id))
///         },
///     ))
/// ```
pub async fn gate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    required_rights: &'static [&'static str],
    owner_id: Option<OwnerIdExtractor>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    match verify_request(&state, &mut parts, required_rights, owner_id).await? {
        AuthDecision::Authenticated(actor) => {
            parts.extensions.insert(CurrentActor(actor));
            let req = Request::from_parts(parts, body);
            Ok(next.run(req).await)
        }
        AuthDecision::Unauthenticated => {
            Err(AppError::unauthorized(anyhow!("Please authenticate")))
        }
        AuthDecision::Forbidden => Err(AppError::forbidden(anyhow!("Forbidden"))),
    }
}

/// Extractor handing handlers the actor the gate verified.
///
/// Only works behind [`gate`]; elsewhere the extension is missing and the
/// extractor rejects with a 401.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentActor>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(anyhow!("Please authenticate")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;

    fn parts_with_authorization(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/hospitals");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (parts, _) = builder.body(Body::empty()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_authorization(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header_yields_none() {
        let parts = parts_with_authorization(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_non_bearer_scheme_yields_none() {
        let parts = parts_with_authorization(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts), None);

        // The scheme check is case sensitive and requires the space.
        let parts = parts_with_authorization(Some("bearer abc"));
        assert_eq!(bearer_token(&parts), None);

        let parts = parts_with_authorization(Some("Bearerabc"));
        assert_eq!(bearer_token(&parts), None);
    }
}
