use crate::{
    CoreResult,
    audio::{AudioArtifact, AudioCapturer, encoder},
};

use std::time::Instant;

use tracing::{info, instrument, warn};

/// The microphone end of one practice take.
///
/// Owns the device stream and the elapsed counter for at most one active
/// capture at a time. The device is resolved fresh on every [`start`],
/// so a failed attempt (permission denied, unplugged microphone) can be
/// retried after the user fixes the cause.
///
/// Release guarantee: every exit path ([`stop`], [`abort`], or dropping
/// the session mid-capture) frees the underlying stream.
///
/// [`start`]: CaptureSession::start
/// [`stop`]: CaptureSession::stop
/// [`abort`]: CaptureSession::abort
#[derive(Default)]
pub struct CaptureSession {
    active: Option<ActiveCapture>,
}

struct ActiveCapture {
    capturer: AudioCapturer,
    started_at: Instant,
}

impl CaptureSession {
    /// Create a session with no active capture. Does not touch the device.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a capture is in progress.
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Whole seconds since the current capture started.
    ///
    /// Display only: monotonic non-decreasing during a session, 0 when no
    /// capture is active, reset at the start of each new session.
    pub fn elapsed_seconds(&self) -> u64 {
        self.active
            .as_ref()
            .map(|a| a.started_at.elapsed().as_secs())
            .unwrap_or(0)
    }

    /// Begin accumulating audio from the default input device.
    ///
    /// Starting while already recording is a no-op: the active capture
    /// keeps its stream and its counter.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` or `DeviceUnavailable` if the microphone cannot
    /// be opened. The session stays idle and `start()` can be retried.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<()> {
        if self.active.is_some() {
            warn!("start() while already recording, ignoring");
            return Ok(());
        }

        let mut capturer = AudioCapturer::new()?;
        capturer.start()?;

        self.active = Some(ActiveCapture {
            capturer,
            started_at: Instant::now(),
        });

        info!("Capture session started");

        Ok(())
    }

    /// Finalize the accumulated audio into a single [`AudioArtifact`].
    ///
    /// The stream is released unconditionally before encoding, so the
    /// device is freed even when finalization fails. Duration is the
    /// elapsed counter value at stop time.
    ///
    /// # Errors
    ///
    /// `NoAudioCaptured` when nothing accumulated, `EncodingFailed` when
    /// the WAV container cannot be written. Returns `Ok(None)` when no
    /// capture was in progress (stop-when-idle is a no-op).
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<Option<AudioArtifact>> {
        let Some(mut active) = self.active.take() else {
            return Ok(None);
        };

        let duration_seconds = active.started_at.elapsed().as_secs();
        let sample_rate = active.capturer.sample_rate();
        let channels = active.capturer.channels();

        // stop() releases the stream before handing back samples; if it
        // fails, dropping `active` still frees the device.
        let samples = active.capturer.stop()?;

        let artifact = encoder::encode_wav(&samples, sample_rate, channels, duration_seconds)?;

        info!(
            duration_seconds,
            encoded_len = artifact.len(),
            "Capture session finalized"
        );

        Ok(Some(artifact))
    }

    /// Tear down an in-progress capture without producing an artifact.
    ///
    /// Partially accumulated chunks are discarded. No-op when idle.
    #[instrument(skip(self))]
    pub fn abort(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.capturer.release();
            info!("Capture session aborted");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.abort();
    }
}
