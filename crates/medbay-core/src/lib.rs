//! Shared foundation for the MedBay API.
//!
//! Houses the pieces every other crate leans on: the [`AppError`] type that
//! maps failures to HTTP responses, bcrypt password helpers, and the
//! pagination primitives used by list endpoints.

pub mod errors;
pub mod pagination;
pub mod password;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, password_meets_policy, verify_password};
