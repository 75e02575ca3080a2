use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    routing::{get, patch, post},
};

use medbay_auth::rights;

use crate::middleware::auth::{gate, owner};
use crate::state::AppState;

use super::controller::{
    delete_hospital, get_hospital, get_hospitals, login_hospital, register_hospital,
    update_hospital,
};

const READ_RIGHTS: &[&str] = &[rights::GET_HOSPITALS];
const MANAGE_RIGHTS: &[&str] = &[rights::MANAGE_HOSPITALS];

/// Routes under `/api/hospitals`.
///
/// Register and login are public. Listing requires the get-hospitals
/// right; reading or modifying a single hospital also admits the hospital
/// itself through the owner check.
pub fn init_hospitals_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register_hospital))
        .route("/login", post(login_hospital));

    let list = init_hospitals_list_router(state.clone());

    let read = Router::new()
        .route("/{hospital_id}", get(get_hospital))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, READ_RIGHTS, Some(owner::hospital_id))
            },
        ));

    let manage = Router::new()
        .route(
            "/{hospital_id}",
            patch(update_hospital).delete(delete_hospital),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, MANAGE_RIGHTS, Some(owner::hospital_id))
            },
        ));

    public.merge(list).merge(read).merge(manage)
}

/// The gated listing route on its own.
///
/// Exposed separately so the app router can serve the collection root both
/// with and without a trailing slash (`/api/hospitals` and
/// `/api/hospitals/`), which nesting a single `/` route cannot express.
pub fn init_hospitals_list_router(state: AppState) -> Router<AppState> {
    Router::new().route("/", get(get_hospitals)).route_layer(
        middleware::from_fn_with_state(
            state,
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, READ_RIGHTS, None)
            },
        ),
    )
}
