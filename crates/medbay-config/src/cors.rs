//! CORS configuration.

use std::env;

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Exact origins allowed by CORS. Empty means no cross-origin access.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Reads `CORS_ALLOWED_ORIGINS` as a comma-separated list of origins.
    pub fn from_env() -> Self {
        let allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self { allowed_origins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_comma_separated_origins() {
        let config = CorsConfig {
            allowed_origins: "http://localhost:3000, https://medbay.example ,"
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        };
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "https://medbay.example"]
        );
    }
}
