use error_location::ErrorLocation;
use thiserror::Error;

/// Failures at the REST boundary.
///
/// All variants include `ErrorLocation` for call-site tracking. The UI
/// only ever sees [`ApiError::user_message`]; raw transport detail stays
/// in the logs.
#[derive(Error, Debug)]
pub(crate) enum ApiError {
    /// The server could not be reached (connect, timeout, TLS).
    #[error("Transport error: {reason} {location}")]
    Transport {
        /// Description of the transport failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The server answered with an error status and a detail message.
    #[error("Request rejected ({status}): {detail} {location}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail, or a generic fallback.
        detail: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The referenced question or attempt does not exist.
    #[error("Not found: {detail} {location}")]
    NotFound {
        /// Server-provided detail, or a generic fallback.
        detail: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The server returned a payload that could not be interpreted.
    /// Logged for diagnostics; shown to the user as a generic failure.
    #[error("Invalid response: {reason} {location}")]
    InvalidResponse {
        /// Description of the decode failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl ApiError {
    /// Human-readable message safe to show in the UI.
    pub(crate) fn user_message(&self) -> String {
        match self {
            ApiError::Transport { .. } => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ApiError::Rejected { detail, .. } => detail.clone(),
            ApiError::NotFound { detail, .. } => detail.clone(),
            ApiError::InvalidResponse { .. } => {
                "The server returned an unexpected response. Please try again.".to_string()
            }
        }
    }
}

/// Result type alias using [`ApiError`].
pub(crate) type ApiResult<T> = std::result::Result<T, ApiError>;
