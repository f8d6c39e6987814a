//! Environment-driven service settings.

use std::env;

/// Settings read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Allowed CORS origins; `*` means any.
    pub cors_origins: Vec<String>,
    /// Base URL of the MRMS data server.
    pub mrms_base_url: String,
    /// Seconds between latest-scan refresh attempts.
    pub refresh_seconds: u64,
}

impl Settings {
    pub fn from_env() -> Self {
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mrms_base_url =
            env::var("MRMS_BASE_URL").unwrap_or_else(|_| "https://mrms.ncep.noaa.gov".to_string());

        let refresh_seconds = env::var("RADAR_REFRESH_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(180);

        Self {
            cors_origins,
            mrms_base_url,
            refresh_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_list_parsing() {
        // from_env reads the process environment; exercise the parsing rules
        // through a locally built value instead of mutating global state
        let raw = "https://a.example, https://b.example ,";
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }
}
