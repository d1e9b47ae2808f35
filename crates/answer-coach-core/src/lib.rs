//! Answer-coach Core Library
//!
//! Microphone capture for spoken practice answers, built on CPAL and
//! hound. One [`CaptureSession`] owns at most one live device stream and
//! turns a completed take into a WAV [`AudioArtifact`].
//!
//! # Example
//!
//! ```no_run
//! use answer_coach_core::{CaptureSession, CoreResult};
//!
//! use std::{thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let mut session = CaptureSession::new();
//!
//!     session.start()?;
//!     sleep(Duration::from_secs(3));
//!     let artifact = session.stop()?;
//!
//!     if let Some(artifact) = artifact {
//!         println!("Recorded {}s of audio", artifact.duration_seconds);
//!     }
//!     Ok(())
//! }
//! ```

mod audio;
mod error;

pub use {
    audio::AudioArtifact, audio::CaptureSession, error::CaptureError, error::Result as CoreResult,
};

#[cfg(test)]
mod tests;
