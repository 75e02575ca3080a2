//! Utility modules for the MedBay API.
//!
//! This module contains shared utilities used throughout the application:
//!
//! - [`email`]: Email sending utilities using SMTP
//! - [`serde`]: Custom serde serialization/deserialization helpers

pub mod email;
pub mod serde;
