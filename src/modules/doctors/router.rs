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
    create_doctor, delete_doctor, get_doctor, get_doctors, get_hospital_doctors, login_doctor,
    update_doctor,
};

const CREATE_RIGHTS: &[&str] = &[rights::CREATE_DOCTORS];
const READ_RIGHTS: &[&str] = &[rights::GET_DOCTORS];
const MANAGE_RIGHTS: &[&str] = &[rights::MANAGE_DOCTORS];

/// Routes under `/api/doctors`.
///
/// Login is public. Reading or modifying a single doctor also admits the
/// doctor itself through the owner check.
pub fn init_doctors_router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/login", post(login_doctor));

    let list = init_doctors_list_router(state.clone());

    let read = Router::new()
        .route("/{doctor_id}", get(get_doctor))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, READ_RIGHTS, Some(owner::doctor_id))
            },
        ));

    let manage = Router::new()
        .route("/{doctor_id}", patch(update_doctor).delete(delete_doctor))
        .route_layer(middleware::from_fn_with_state(
            state,
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, MANAGE_RIGHTS, Some(owner::doctor_id))
            },
        ));

    public.merge(list).merge(read).merge(manage)
}

/// The gated listing route on its own.
///
/// Exposed separately so the app router can serve the collection root both
/// with and without a trailing slash (`/api/doctors` and `/api/doctors/`),
/// which nesting a single `/` route cannot express.
pub fn init_doctors_list_router(state: AppState) -> Router<AppState> {
    Router::new().route("/", get(get_doctors)).route_layer(
        middleware::from_fn_with_state(
            state,
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, READ_RIGHTS, None)
            },
        ),
    )
}

/// Routes nested under `/api/hospitals/{hospital_id}/doctors`.
///
/// A hospital operating on its own staff passes the owner check even
/// without the create or get rights.
pub fn init_hospital_doctors_router(state: AppState) -> Router<AppState> {
    let create = Router::new().route("/", post(create_doctor)).route_layer(
        middleware::from_fn_with_state(
            state.clone(),
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, CREATE_RIGHTS, Some(owner::hospital_id))
            },
        ),
    );

    let list = Router::new()
        .route("/", get(get_hospital_doctors))
        .route_layer(middleware::from_fn_with_state(
            state,
            |state: State<AppState>, req: Request, next: Next| {
                gate(state, req, next, READ_RIGHTS, Some(owner::hospital_id))
            },
        ));

    create.merge(list)
}
