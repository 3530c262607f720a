use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Configuration Errors
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Duplicate trading symbol in registry: {0}")]
    DuplicateSymbol(String),

    // Provider Errors
    #[error("Price provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Price provider timed out after {timeout_ms}ms")]
    ProviderTimeout { timeout_ms: u64 },

    #[error("Price provider returned status {status}")]
    ProviderStatus { status: u16 },

    #[error("Provider response deserialization failed: {0}")]
    DeserializationError(String),

    // Lookup Errors
    #[error("No price data for provider id: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Upstream failures a stale snapshot may stand in for.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ProviderUnavailable(_)
                | Error::ProviderTimeout { .. }
                | Error::ProviderStatus { .. }
                | Error::DeserializationError(_)
        )
    }

    /// Stable short code used in the `error` field of failure envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ConfigurationError(_) | Error::DuplicateSymbol(_) => "configuration_error",
            Error::NotFound(_) => "not_found",
            _ => "provider_unavailable",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct FailureEnvelope {
    success: bool,
    message: String,
    error: &'static str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Error::NotFound(_) => "Price not found".to_string(),
            _ => "Failed to fetch real-time prices".to_string(),
        };

        tracing::debug!(error = %self, status = status.as_u16(), "Request failed");

        let body = FailureEnvelope {
            success: false,
            message: format!("{}: {}", message, self),
            error: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}
