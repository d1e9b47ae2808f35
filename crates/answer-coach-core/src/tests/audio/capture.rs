use crate::CaptureError;
use crate::audio::capture::{MAX_BUFFER_SAMPLES, classify_device_error};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// WHAT: Buffer respects MAX_BUFFER_SAMPLES limit
/// WHY: Prevents unbounded memory growth when the user forgets to stop
#[test]
fn given_buffer_at_max_capacity_when_adding_samples_then_oldest_discarded() {
    // Given: A VecDeque at max capacity filled with 0.0
    let mut buf = VecDeque::with_capacity(MAX_BUFFER_SAMPLES);
    buf.extend(std::iter::repeat(0.0f32).take(MAX_BUFFER_SAMPLES));
    assert_eq!(buf.len(), MAX_BUFFER_SAMPLES);

    // When: Adding 1024 new samples (value 1.0) beyond the limit
    let new_samples = vec![1.0f32; 1024];
    buf.extend(new_samples.iter().copied());
    while buf.len() > MAX_BUFFER_SAMPLES {
        buf.pop_front();
    }

    // Then: Buffer stays at MAX_BUFFER_SAMPLES and newest samples preserved
    assert_eq!(buf.len(), MAX_BUFFER_SAMPLES);
    assert!((buf[MAX_BUFFER_SAMPLES - 1] - 1.0).abs() < f32::EPSILON);
    assert!((buf[MAX_BUFFER_SAMPLES - 1024] - 1.0).abs() < f32::EPSILON);
}

/// WHAT: Lock poison recovery preserves buffer data
/// WHY: Ensures audio data is never silently lost on mutex poison
#[test]
fn given_poisoned_mutex_when_recovering_then_data_preserved() {
    // Given: A mutex poisoned by a panic while holding the lock
    let buf = Arc::new(Mutex::new(VecDeque::from(vec![0.5f32; 100])));
    let buf_clone = Arc::clone(&buf);

    let _ = std::thread::spawn(move || {
        let _guard = buf_clone.lock().unwrap();
        panic!("intentional panic to poison mutex");
    })
    .join();

    // When: Recovering from poisoned lock using unwrap_or_else
    let recovered = buf.lock().unwrap_or_else(|e| e.into_inner());

    // Then: Original data is fully preserved
    assert_eq!(recovered.len(), 100);
    assert!(recovered.iter().all(|&s| (s - 0.5).abs() < f32::EPSILON));
}

/// WHAT: OS permission refusals classify as PermissionDenied
/// WHY: The controller must distinguish "grant access" from "no device"
#[test]
fn given_permission_message_when_classifying_then_permission_denied() {
    // Given/When: Backend messages that indicate an OS-level denial
    let denied = classify_device_error("Permission denied by the OS".to_string());
    let access = classify_device_error("microphone access denied".to_string());

    // Then: Both classify as PermissionDenied
    assert!(matches!(denied, CaptureError::PermissionDenied { .. }));
    assert!(matches!(access, CaptureError::PermissionDenied { .. }));
}

/// WHAT: Non-permission failures classify as DeviceUnavailable
/// WHY: Unknown device errors must not masquerade as permission prompts
#[test]
#[allow(clippy::panic)]
fn given_device_message_when_classifying_then_device_unavailable() {
    // Given/When: A backend message with no permission wording
    let result = classify_device_error("Failed to build stream: device disconnected".to_string());

    // Then: Classified as DeviceUnavailable carrying the reason
    match result {
        CaptureError::DeviceUnavailable { reason, .. } => {
            assert!(reason.contains("device disconnected"));
        }
        other => panic!("expected DeviceUnavailable, got {:?}", other),
    }
}
