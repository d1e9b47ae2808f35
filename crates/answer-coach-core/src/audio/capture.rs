use crate::{CaptureError, CoreResult};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Maximum samples to buffer (10 minutes at 48kHz mono).
/// Prevents unbounded memory growth if the user forgets to stop.
///
/// **Memory footprint at max capacity:**
/// - 48,000 Hz * 60s * 10 min * 4 bytes/f32 = ~115MB
/// - Hard upper bound; practice answers are typically a few minutes
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 10;

/// Classify a backend error message into a capture error.
///
/// cpal reports OS-level microphone denial as a backend-specific string,
/// so classification is by message. Anything that is not recognizably a
/// permission problem is treated as a device failure.
#[track_caller]
pub(crate) fn classify_device_error(reason: String) -> CaptureError {
    let lowered = reason.to_lowercase();
    if lowered.contains("permission") || lowered.contains("access denied") {
        CaptureError::PermissionDenied {
            location: ErrorLocation::from(Location::caller()),
        }
    } else {
        CaptureError::DeviceUnavailable {
            reason,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub struct AudioCapturer {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    samples: Arc<Mutex<VecDeque<f32>>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream to ensure no in-flight callback writes after
    /// the lock is acquired in `stop()`.
    shutdown: Arc<AtomicBool>,
}

impl AudioCapturer {
    #[track_caller]
    #[instrument]
    pub(crate) fn new() -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or(CaptureError::DeviceUnavailable {
                reason: "No input device found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_input_config()
            .map_err(|e| classify_device_error(format!("Failed to get config: {}", e)))?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "AudioCapturer initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            samples: Arc::new(Mutex::new(VecDeque::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    #[track_caller]
    #[instrument(skip(self))]
    pub(crate) fn start(&mut self) -> CoreResult<()> {
        let samples = Arc::clone(&self.samples);
        let shutdown = Arc::clone(&self.shutdown);

        // Reset shutdown flag for new recording session
        self.shutdown.store(false, Ordering::Release);

        // Clear previous samples
        samples
            .lock()
            .map_err(|e| CaptureError::DeviceUnavailable {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .clear();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Check shutdown flag before acquiring lock. Once stop()
                    // sets this flag, no new samples are written even if cpal
                    // fires one more callback before the stream is dropped.
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // Recover from lock poison rather than silently dropping
                    // audio. The VecDeque data is still valid and usable.
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    buf.extend(data.iter().copied());
                    // Ring buffer: O(1) amortized drop of oldest samples
                    while buf.len() > MAX_BUFFER_SAMPLES {
                        buf.pop_front();
                    }
                },
                |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| classify_device_error(format!("Failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| classify_device_error(format!("Failed to start stream: {}", e)))?;

        self.stream = Some(stream);
        info!("Audio capture started");

        Ok(())
    }

    /// Release the stream and return the accumulated samples in arrival
    /// order. The device is freed before the sample lock is taken, so
    /// the microphone indicator goes dark even if draining fails.
    #[track_caller]
    #[instrument(skip(self))]
    pub(crate) fn stop(&mut self) -> CoreResult<Vec<f32>> {
        // Signal callback to stop writing BEFORE dropping the stream, so
        // the callback observes the flag and returns early even if a
        // backend's drop() is asynchronous.
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Brief yield so any in-flight callback observes the shutdown
            // flag and completes before we drain the buffer.
            std::thread::sleep(std::time::Duration::from_millis(5));
            info!("Audio capture stopped");
        }

        let samples: Vec<f32> = self
            .samples
            .lock()
            .map_err(|e| CaptureError::DeviceUnavailable {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .iter()
            .copied()
            .collect();

        debug!(sample_count = samples.len(), "Captured audio samples");

        Ok(samples)
    }

    /// Release the stream and discard whatever was accumulated.
    /// Used on teardown, where partial audio is not turned into a take.
    #[instrument(skip(self))]
    pub(crate) fn release(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Audio capture released, partial take discarded");
        }
    }

    pub(crate) fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    pub(crate) fn channels(&self) -> u16 {
        self.config.channels
    }
}

impl Drop for AudioCapturer {
    // The stream must never outlive its capturer, whatever the exit path.
    fn drop(&mut self) {
        self.release();
    }
}
