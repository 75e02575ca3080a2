//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: the authorization gate applied to protected routes, plus the
//!   [`auth::CurrentActor`] extractor handlers use to read the verified
//!   actor
//!
//! # Authentication Flow
//!
//! 1. Client sends a request with an `Authorization: Bearer <token>` header
//! 2. The gate decodes the access token and resolves the actor it names
//! 3. The gate checks the actor's rights against the ones the route
//!    requires, with a self-access escape hatch for routes that carry the
//!    subject's id in their path
//! 4. The actor is attached to the request and the handler executes
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{gate, owner};
//!
//! const MANAGE: &[&str] = &[rights::MANAGE_HOSPITALS];
//!
//! let router = Router::new()
//!     .route("/{hospital_id}", patch(update_hospital))
//!     .route_layer(middleware::from_fn_with_state(
//!         state.clone(),
//!         |state: State<AppState>, req: Request, next: Next| {
//!             gate(state, req, next, MANAGE, Some(owner::hospital_id))
//!         },
//!     ));
//! ```

pub mod auth;
