//! SMTP and outbound email configuration.

use std::env;

/// Settings for transactional email delivery.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Whether outbound email is enabled at all. When false the email
    /// service logs and drops messages instead of connecting to SMTP.
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    /// Address used in the `From` header.
    pub from_email: String,
    /// Display name used in the `From` header.
    pub from_name: String,
    /// Base URL of the frontend, used to build links in emails.
    pub frontend_url: String,
}

impl EmailConfig {
    /// Reads the email configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("SMTP_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@medbay.dev".to_string()),
            from_name: env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "MedBay".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }

    /// Config that never sends anything. Used by tests.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@medbay.dev".to_string(),
            from_name: "MedBay".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}
