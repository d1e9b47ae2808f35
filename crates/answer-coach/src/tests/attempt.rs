use crate::{
    api::{ApiError, types::GradedResult},
    attempt::{AttemptController, AttemptState, PendingSubmission},
};

use answer_coach_core::AudioArtifact;

use std::panic::Location;

use error_location::ErrorLocation;

fn artifact() -> AudioArtifact {
    AudioArtifact {
        encoded_bytes: vec![82, 73, 70, 70],
        mime_type: "audio/wav",
        duration_seconds: 12,
    }
}

fn graded(id: i64, score: Option<f64>) -> GradedResult {
    GradedResult {
        id,
        score,
        transcript: None,
        feedback: None,
    }
}

fn server_error() -> ApiError {
    ApiError::Rejected {
        status: 500,
        detail: "Internal server error".to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// WHAT: A fresh controller starts in Idle with nothing held
/// WHY: The artifact invariant: none exists before a take is recorded
#[test]
fn given_new_controller_when_inspecting_then_idle_without_artifact() {
    // Given/When: A controller for question 7
    let controller = AttemptController::new(7);

    // Then: Idle, no artifact, counter at zero
    assert_eq!(*controller.state(), AttemptState::Idle);
    assert!(controller.state().artifact().is_none());
    assert_eq!(controller.elapsed_seconds(), 0);
    assert_eq!(controller.question_id(), 7);
}

/// WHAT: submit() from Idle is a no-op
/// WHY: Invalid transitions must leave state unchanged, not error
#[test]
fn given_idle_when_submitting_then_refused_and_state_unchanged() {
    // Given: An idle controller
    let mut controller = AttemptController::new(1);

    // When: Submitting without a recording
    let pending = controller.submit();

    // Then: Nothing dispatched, still Idle
    assert!(pending.is_none());
    assert_eq!(*controller.state(), AttemptState::Idle);
}

/// WHAT: finish_recording() outside Recording is a no-op
/// WHY: Stop must not fabricate a take from nothing
#[test]
fn given_idle_when_finishing_recording_then_state_unchanged() {
    // Given: An idle controller
    let mut controller = AttemptController::new(1);

    // When: Finishing a recording that never started
    controller.finish_recording();

    // Then: Still Idle
    assert_eq!(*controller.state(), AttemptState::Idle);
}

/// WHAT: begin_recording() while a submission is in flight is a no-op
/// WHY: The validity check precedes any device access
#[test]
fn given_submitting_when_beginning_recording_then_state_unchanged() {
    // Given: A controller with a submission in flight
    let mut controller = AttemptController::new(1);
    controller.seed_state(AttemptState::Submitting {
        artifact: artifact(),
    });

    // When: Trying to start a new recording
    controller.begin_recording();

    // Then: Still Submitting
    assert!(matches!(
        controller.state(),
        AttemptState::Submitting { .. }
    ));
}

/// WHAT: submit() from Recorded dispatches exactly one payload
/// WHY: The payload carries the held artifact and the question id
#[test]
#[allow(clippy::unwrap_used)]
fn given_recorded_take_when_submitting_then_payload_dispatched() {
    // Given: A controller holding a recorded take
    let mut controller = AttemptController::new(42);
    controller.seed_state(AttemptState::Recorded {
        artifact: artifact(),
    });

    // When: Submitting
    let pending: PendingSubmission = controller.submit().unwrap();

    // Then: Payload matches the take, state is Submitting and retains it
    assert_eq!(pending.submission.question_id, 42);
    assert_eq!(pending.submission.artifact, artifact());
    assert!(matches!(
        controller.state(),
        AttemptState::Submitting { .. }
    ));
    assert_eq!(controller.state().artifact(), Some(&artifact()));
}

/// WHAT: A second submit() while Submitting is refused
/// WHY: At most one grading request in flight per take
#[test]
fn given_submission_in_flight_when_submitting_again_then_refused() {
    // Given: A dispatched submission
    let mut controller = AttemptController::new(42);
    controller.seed_state(AttemptState::Recorded {
        artifact: artifact(),
    });
    let first = controller.submit();
    assert!(first.is_some());

    // When: Submitting again in rapid succession
    let second = controller.submit();

    // Then: Exactly one network call results
    assert!(second.is_none());
    assert!(matches!(
        controller.state(),
        AttemptState::Submitting { .. }
    ));
}

/// WHAT: A successful completion lands in Graded
/// WHY: The happy path of the lifecycle table
#[test]
#[allow(clippy::unwrap_used, clippy::panic)]
fn given_submission_in_flight_when_completing_ok_then_graded() {
    // Given: A dispatched submission
    let mut controller = AttemptController::new(42);
    controller.seed_state(AttemptState::Recorded {
        artifact: artifact(),
    });
    let pending = controller.submit().unwrap();

    // When: The grading response arrives
    controller.complete_submission(pending.epoch, Ok(graded(9, Some(8.5))));

    // Then: Graded holding the result, artifact released
    match controller.state() {
        AttemptState::Graded { result } => {
            assert_eq!(result.id, 9);
            assert_eq!(result.score, Some(8.5));
        }
        other => panic!("expected Graded, got {:?}", other),
    }
    assert!(controller.state().artifact().is_none());
}

/// WHAT: A failed completion preserves the artifact for retry
/// WHY: The user must be able to re-send without re-recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_server_failure_when_completing_then_artifact_retained_for_retry() {
    // Given: A dispatched submission that the server rejects with a 500
    let mut controller = AttemptController::new(42);
    controller.seed_state(AttemptState::Recorded {
        artifact: artifact(),
    });
    let pending = controller.submit().unwrap();
    controller.complete_submission(pending.epoch, Err(server_error()));

    // Then: SubmissionFailed still holds the original take
    assert!(matches!(
        controller.state(),
        AttemptState::SubmissionFailed { .. }
    ));
    assert_eq!(controller.state().artifact(), Some(&artifact()));

    // When: Retrying
    let retry = controller.submit().unwrap();

    // Then: The same artifact is re-sent
    assert_eq!(retry.submission.artifact, artifact());
    assert!(matches!(
        controller.state(),
        AttemptState::Submitting { .. }
    ));
}

/// WHAT: A completion carrying a stale epoch is dropped
/// WHY: reset()/teardown must not let a late callback resurrect an
/// abandoned attempt
#[test]
#[allow(clippy::unwrap_used)]
fn given_reset_after_dispatch_when_stale_completion_arrives_then_ignored() {
    // Given: A dispatched submission, then the user navigates away
    let mut controller = AttemptController::new(42);
    controller.seed_state(AttemptState::Recorded {
        artifact: artifact(),
    });
    let pending = controller.submit().unwrap();
    controller.reset();
    assert_eq!(*controller.state(), AttemptState::Idle);

    // When: The stray completion finally lands
    controller.complete_submission(pending.epoch, Ok(graded(9, Some(8.5))));

    // Then: Still Idle; the graded result is not applied
    assert_eq!(*controller.state(), AttemptState::Idle);
}

/// WHAT: A completion in a non-Submitting state is dropped
/// WHY: Only the in-flight transition may consume a completion
#[test]
fn given_recorded_state_when_completion_arrives_then_ignored() {
    // Given: A take that was never dispatched
    let mut controller = AttemptController::new(42);
    controller.seed_state(AttemptState::Recorded {
        artifact: artifact(),
    });

    // When: A completion arrives with the current epoch
    controller.complete_submission(controller.current_epoch(), Ok(graded(9, None)));

    // Then: The recorded take is untouched
    assert!(matches!(controller.state(), AttemptState::Recorded { .. }));
}

/// WHAT: reset() discards held state from every lifecycle stage
/// WHY: Back-navigation returns a clean attempt to start over
#[test]
fn given_each_terminal_state_when_resetting_then_idle_and_empty() {
    let states = [
        AttemptState::Recorded {
            artifact: artifact(),
        },
        AttemptState::Submitting {
            artifact: artifact(),
        },
        AttemptState::Graded {
            result: graded(1, Some(7.0)),
        },
        AttemptState::SubmissionFailed {
            artifact: artifact(),
            message: "Internal server error".to_string(),
        },
        AttemptState::CaptureFailed {
            message: "denied".to_string(),
        },
    ];

    for state in states {
        // Given: A controller in one of the non-idle states
        let mut controller = AttemptController::new(1);
        controller.seed_state(state);

        // When: Resetting
        controller.reset();

        // Then: Idle with nothing held and a fresh counter
        assert_eq!(*controller.state(), AttemptState::Idle);
        assert!(controller.state().artifact().is_none());
        assert_eq!(controller.elapsed_seconds(), 0);
    }
}

/// WHAT: A late completion from a torn-down controller never lands on
/// its replacement
/// WHY: Epochs are process-unique, so a fresh controller with its own
/// submission in flight cannot match a payload dispatched by a
/// previous instance for a different question
#[test]
#[allow(clippy::unwrap_used, clippy::panic)]
fn given_replacement_controller_when_predecessors_completion_arrives_then_ignored() {
    // Given: Question 1's submission in flight when the user backs out
    let mut first = AttemptController::new(1);
    first.seed_state(AttemptState::Recorded {
        artifact: artifact(),
    });
    let stray = first.submit().unwrap();
    drop(first);

    // And: A fresh controller for question 2, also mid-submission
    let mut second = AttemptController::new(2);
    second.seed_state(AttemptState::Recorded {
        artifact: artifact(),
    });
    let in_flight = second.submit().unwrap();

    // When: Question 1's grade arrives first
    second.complete_submission(stray.epoch, Ok(graded(111, Some(9.0))));

    // Then: Ignored; question 2's own result still applies afterwards
    assert!(matches!(second.state(), AttemptState::Submitting { .. }));
    second.complete_submission(in_flight.epoch, Ok(graded(222, Some(7.0))));
    match second.state() {
        AttemptState::Graded { result } => assert_eq!(result.id, 222),
        other => panic!("expected Graded, got {:?}", other),
    }
}

/// WHAT: begin_recording() from Recorded or SubmissionFailed starts
/// over, discarding the held take
/// WHY: Redoing an answer replaces the artifact rather than being
/// refused, so the take is never locked in before the user submits
#[test]
fn given_held_take_when_beginning_recording_then_take_discarded() {
    let states = [
        AttemptState::Recorded {
            artifact: artifact(),
        },
        AttemptState::SubmissionFailed {
            artifact: artifact(),
            message: "Internal server error".to_string(),
        },
    ];

    for state in states {
        // Given: A controller holding a finished take
        let mut controller = AttemptController::new(1);
        controller.seed_state(state);

        // When: Recording again
        controller.begin_recording();

        // Then: The old take is gone; the controller is capturing a new
        // one, or reporting the device failure on hosts without an input
        assert!(controller.state().artifact().is_none());
        assert!(matches!(
            controller.state(),
            AttemptState::Recording | AttemptState::CaptureFailed { .. }
        ));
    }
}

/// WHAT: submit() is invalid from CaptureFailed
/// WHY: No artifact exists after a capture failure, so there is
/// nothing to send
#[test]
fn given_capture_failed_when_submitting_then_refused() {
    // Given: A controller whose capture was denied
    let mut controller = AttemptController::new(1);
    controller.seed_state(AttemptState::CaptureFailed {
        message: "Could not access microphone. Please grant permission.".to_string(),
    });

    // When: Submitting
    let pending = controller.submit();

    // Then: Refused, no artifact exists
    assert!(pending.is_none());
    assert!(controller.state().artifact().is_none());
    assert!(matches!(
        controller.state(),
        AttemptState::CaptureFailed { .. }
    ));
}
