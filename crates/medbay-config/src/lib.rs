//! Environment-driven configuration for the MedBay API.
//!
//! Each config struct exposes a `from_env` constructor that reads its
//! section of the environment once at startup. Missing optional values
//! fall back to documented defaults; required values panic with a clear
//! message so a misconfigured deployment fails fast.

pub mod cors;
pub mod email;
pub mod jwt;

pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
