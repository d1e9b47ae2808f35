use crate::CaptureError;
use crate::audio::encoder::{WAV_MIME_TYPE, encode_wav};

use std::io::Cursor;

/// WHAT: Encoding produces a readable WAV container with all samples
/// WHY: The submitted artifact must be a single valid container in
/// arrival order
#[test]
#[allow(clippy::unwrap_used)]
fn given_samples_when_encoding_then_wav_container_round_trips() {
    // Given: One second of a quiet ramp at 16kHz mono
    let samples: Vec<f32> = (0..16_000).map(|i| (i as f32 / 16_000.0) * 0.1).collect();

    // When: Encoding into an in-memory WAV container
    let artifact = encode_wav(&samples, 16_000, 1, 1).unwrap();

    // Then: hound reads back the same shape of audio
    let reader = hound::WavReader::new(Cursor::new(artifact.encoded_bytes.clone())).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len(), 16_000);
    assert_eq!(artifact.mime_type, WAV_MIME_TYPE);
    assert_eq!(artifact.duration_seconds, 1);
}

/// WHAT: Encoding preserves arrival order of chunks
/// WHY: Concatenation order is part of the artifact contract
#[test]
#[allow(clippy::unwrap_used)]
fn given_two_chunks_when_encoding_then_order_preserved() {
    // Given: Two distinguishable chunks concatenated in arrival order
    let mut samples = vec![-0.5f32; 100];
    samples.extend(vec![0.5f32; 100]);

    // When: Encoding and decoding the samples
    let artifact = encode_wav(&samples, 8_000, 1, 0).unwrap();
    let mut reader = hound::WavReader::new(Cursor::new(artifact.encoded_bytes)).unwrap();
    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    // Then: First half is negative, second half positive
    assert_eq!(decoded.len(), 200);
    assert!(decoded[..100].iter().all(|&s| s < 0));
    assert!(decoded[100..].iter().all(|&s| s > 0));
}

/// WHAT: Out-of-range samples are clamped instead of wrapping
/// WHY: Backend callbacks may deliver values slightly outside [-1, 1]
#[test]
#[allow(clippy::unwrap_used)]
fn given_out_of_range_samples_when_encoding_then_clamped() {
    // Given: Samples beyond full scale in both directions
    let samples = vec![1.5f32, -1.5f32];

    // When: Encoding and decoding
    let artifact = encode_wav(&samples, 8_000, 1, 0).unwrap();
    let mut reader = hound::WavReader::new(Cursor::new(artifact.encoded_bytes)).unwrap();
    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    // Then: Values saturate at the i16 limits
    assert_eq!(decoded[0], i16::MAX);
    assert_eq!(decoded[1], -i16::MAX);
}

/// WHAT: Empty sample slice is rejected before touching the encoder
/// WHY: A take with no audio must surface NoAudioCaptured, not a
/// zero-length artifact
#[test]
fn given_no_samples_when_encoding_then_no_audio_captured_error() {
    // Given: An empty capture
    let samples: Vec<f32> = vec![];

    // When: Attempting to encode
    let result = encode_wav(&samples, 16_000, 1, 0);

    // Then: Returns NoAudioCaptured
    assert!(matches!(result, Err(CaptureError::NoAudioCaptured { .. })));
}
