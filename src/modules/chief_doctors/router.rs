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
    create_chief_doctor, delete_chief_doctor, get_chief_doctor, get_chief_doctors,
    get_hospital_chief_doctors, login_chief_doctor, update_chief_doctor,
};

const CREATE_RIGHTS: &[&str] = &[rights::CREATE_CHIEF_DOCTORS];
const READ_RIGHTS: &[&str] = &[rights::GET_CHIEF_DOCTORS];
const MANAGE_RIGHTS: &[&str] = &[rights::MANAGE_CHIEF_DOCTORS];

/// Routes under `/api/chief-doctors`.
///
/// Login is public. Reading or modifying a single chief doctor also admits
/// the chief doctor itself through the owner check.
pub fn init_chief_doctors_router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/login", post(login_chief_doctor));

    let list = init_chief_doctors_list_router(state.clone());

    let read = Router::new()
        .route("/{chief_doctor_id}", get(get_chief_doctor))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, READ_RIGHTS, Some(owner::chief_doctor_id))
            },
        ));

    let manage = Router::new()
        .route(
            "/{chief_doctor_id}",
            patch(update_chief_doctor).delete(delete_chief_doctor),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            |state: State<AppState>, req: Request, next: Next| {
                gate(
                    state,
                    req,
                    next,
                    MANAGE_RIGHTS,
                    Some(owner::chief_doctor_id),
                )
            },
        ));

    public.merge(list).merge(read).merge(manage)
}

/// The gated listing route on its own.
///
/// Exposed separately so the app router can serve the collection root both
/// with and without a trailing slash (`/api/chief-doctors` and
/// `/api/chief-doctors/`), which nesting a single `/` route cannot express.
pub fn init_chief_doctors_list_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_chief_doctors))
        .route_layer(middleware::from_fn_with_state(
            state,
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, READ_RIGHTS, None)
            },
        ))
}

/// Routes nested under `/api/hospitals/{hospital_id}/chief-doctors`.
///
/// A hospital operating on its own staff passes the owner check even
/// without the create or get rights.
pub fn init_hospital_chief_doctors_router(state: AppState) -> Router<AppState> {
    let create = Router::new()
        .route("/", post(create_chief_doctor))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, CREATE_RIGHTS, Some(owner::hospital_id))
            },
        ));

    let list = Router::new()
        .route("/", get(get_hospital_chief_doctors))
        .route_layer(middleware::from_fn_with_state(
            state,
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, READ_RIGHTS, Some(owner::hospital_id))
            },
        ));

    create.merge(list)
}
