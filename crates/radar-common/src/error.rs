//! Error types for radar-tiles services.

use thiserror::Error;

/// Result type alias using RadarError.
pub type RadarResult<T> = Result<T, RadarError>;

/// Primary error type for tile operations.
#[derive(Debug, Error)]
pub enum RadarError {
    /// Tile address outside the pyramid: x or y not in `[0, 2^z)`.
    #[error("Invalid tile address: {z}/{x}/{y}")]
    InvalidTileAddress { z: u32, x: u32, y: u32 },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RadarError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            RadarError::InvalidTileAddress { .. } | RadarError::InvalidParameter { .. } => 400,
            RadarError::Upstream(_) => 502,
            _ => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for RadarError {
    fn from(err: std::io::Error) -> Self {
        RadarError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for RadarError {
    fn from(err: serde_json::Error) -> Self {
        RadarError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err = RadarError::InvalidTileAddress { z: 2, x: 4, y: 0 };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(RadarError::Upstream("timeout".into()).http_status_code(), 502);
        assert_eq!(RadarError::Render("oom".into()).http_status_code(), 500);
    }

    #[test]
    fn test_display_includes_address() {
        let err = RadarError::InvalidTileAddress { z: 3, x: 9, y: 1 };
        assert_eq!(err.to_string(), "Invalid tile address: 3/9/1");
    }
}
