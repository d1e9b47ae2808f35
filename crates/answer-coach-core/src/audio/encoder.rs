use crate::{CaptureError, CoreResult, audio::AudioArtifact};

use std::{io::Cursor, panic::Location};

use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::debug;

/// MIME type of the container produced by [`encode_wav`].
pub(crate) const WAV_MIME_TYPE: &str = "audio/wav";

/// Encode interleaved f32 samples into a single in-memory WAV container.
///
/// Samples are written in arrival order as 16-bit PCM. The whole take is
/// encoded in one pass; there is no streaming encoder because a practice
/// answer is a few minutes at most.
#[track_caller]
pub(crate) fn encode_wav(
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
    duration_seconds: u64,
) -> CoreResult<AudioArtifact> {
    if samples.is_empty() {
        return Err(CaptureError::NoAudioCaptured {
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| CaptureError::EncodingFailed {
                reason: format!("Failed to create WAV writer: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        for &sample in samples {
            // Clamp before conversion: cpal callbacks may deliver values
            // slightly outside [-1.0, 1.0] on some backends.
            let clamped = sample.clamp(-1.0, 1.0);
            let quantized = (clamped * f32::from(i16::MAX)) as i16;
            writer
                .write_sample(quantized)
                .map_err(|e| CaptureError::EncodingFailed {
                    reason: format!("Failed to write sample: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        writer.finalize().map_err(|e| CaptureError::EncodingFailed {
            reason: format!("Failed to finalize WAV container: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
    }

    let encoded_bytes = cursor.into_inner();
    debug!(
        sample_count = samples.len(),
        encoded_len = encoded_bytes.len(),
        duration_seconds,
        "Take encoded"
    );

    Ok(AudioArtifact {
        encoded_bytes,
        mime_type: WAV_MIME_TYPE,
        duration_seconds,
    })
}
