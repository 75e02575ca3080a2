//! Authentication and authorization primitives for the MedBay API.
//!
//! * [`Claims`] and [`TokenType`] fix the wire shape of every JWT the API
//!   issues.
//! * [`TokenService`] signs, persists and verifies tokens against a
//!   [`TokenStore`].
//! * [`RoleRegistry`] is the immutable role-to-rights table the
//!   authorization gate consults; [`rights`] holds the right names routes
//!   reference.

pub mod claims;
pub mod jwt;
pub mod rights;
pub mod roles;
pub mod service;
pub mod tokens;

pub use claims::{Claims, TokenType};
pub use jwt::{TokenError, decode_token, sign_token};
pub use roles::{DEFAULT_ROLE_RIGHTS, RegistryError, Role, RoleRegistry};
pub use service::{AuthTokens, TokenService, TokenWithExpiry};
pub use tokens::{NewTokenRecord, TokenRecord, TokenStore};
