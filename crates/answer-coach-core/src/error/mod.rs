use error_location::ErrorLocation;
use thiserror::Error;

/// Audio capture errors with source location tracking.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The OS refused access to the microphone.
    #[error("Microphone permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No input device present, or the device failed mid-session.
    #[error("Audio device unavailable: {reason} {location}")]
    DeviceUnavailable {
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recording stopped without accumulating any audio.
    #[error("No audio captured {location}")]
    NoAudioCaptured {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Finalizing the take into a WAV container failed.
    #[error("Audio encoding failed: {reason} {location}")]
    EncodingFailed {
        /// Description of the encoder error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CaptureError`].
pub type Result<T> = std::result::Result<T, CaptureError>;
