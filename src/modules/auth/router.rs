use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    routing::post,
};

use crate::middleware::auth::gate;
use crate::state::AppState;

use super::controller::{
    forgot_password, logout, refresh_tokens, reset_password, send_verification_email, verify_email,
};

/// No specific rights, any authenticated actor passes.
const AUTHENTICATED: &[&str] = &[];

/// Routes under `/api/auth`.
///
/// Everything here is public except send-verification-email, which needs
/// a logged-in actor to know whose address to verify.
pub fn init_auth_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/refresh-tokens", post(refresh_tokens))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/verify-email", post(verify_email));

    let authenticated = Router::new()
        .route("/send-verification-email", post(send_verification_email))
        .route_layer(middleware::from_fn_with_state(
            state,
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, AUTHENTICATED, None)
            },
        ));

    public.merge(authenticated)
}
