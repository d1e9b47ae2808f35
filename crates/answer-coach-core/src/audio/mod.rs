mod artifact;
pub(crate) mod capture;
pub(crate) mod encoder;
mod session;

pub(crate) use capture::AudioCapturer;

pub use {artifact::AudioArtifact, session::CaptureSession};
