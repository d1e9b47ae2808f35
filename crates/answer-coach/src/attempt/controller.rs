use crate::{
    api::{
        ApiError,
        types::{AttemptSubmission, GradedResult},
    },
    attempt::AttemptState,
};

use std::sync::atomic::{AtomicU64, Ordering};

use answer_coach_core::{CaptureError, CaptureSession};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Epochs are process-unique, never per-controller, so a completion
/// raced by teardown cannot match a replacement controller's epoch.
static NEXT_EPOCH: AtomicU64 = AtomicU64::new(0);

fn next_epoch() -> u64 {
    NEXT_EPOCH.fetch_add(1, Ordering::Relaxed)
}

/// A submission handed to the event loop for dispatch, tagged with the
/// epoch it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingSubmission {
    /// Epoch at the moment `submit()` accepted the request. A completion
    /// carrying a stale epoch is discarded.
    pub epoch: u64,
    /// The payload to send; built once, sent once.
    pub submission: AttemptSubmission,
}

/// Drives one practice attempt through its lifecycle.
///
/// Single-threaded by construction: every transition happens on the
/// event-loop task, and asynchronous completions re-enter through
/// [`complete_submission`] guarded by an epoch. Each controller (and
/// each `reset()`) takes a fresh process-unique epoch, so a completion
/// that raced a reset, a teardown, or a controller replacement is
/// ignored rather than applied to the wrong attempt.
///
/// Invalid operations are uniformly no-ops that leave state unchanged.
///
/// [`complete_submission`]: AttemptController::complete_submission
pub(crate) struct AttemptController {
    question_id: i64,
    state: AttemptState,
    epoch: u64,
    session: CaptureSession,
    /// Correlation id for log lines across this attempt's lifetime.
    attempt_session: Uuid,
}

impl AttemptController {
    /// New controller in `Idle` for the given question.
    pub(crate) fn new(question_id: i64) -> Self {
        Self {
            question_id,
            state: AttemptState::Idle,
            epoch: next_epoch(),
            session: CaptureSession::new(),
            attempt_session: Uuid::new_v4(),
        }
    }

    pub(crate) fn state(&self) -> &AttemptState {
        &self.state
    }

    pub(crate) fn question_id(&self) -> i64 {
        self.question_id
    }

    /// Elapsed whole seconds of the active capture, for display.
    pub(crate) fn elapsed_seconds(&self) -> u64 {
        self.session.elapsed_seconds()
    }

    /// Start capturing audio. Valid from `Idle`, `CaptureFailed`,
    /// `Recorded`, or `SubmissionFailed`; starting over discards the
    /// held take. A repeat call while `Recording` is ignored, as is a
    /// call while a submission is in flight or already graded.
    #[instrument(skip(self), fields(session = %self.attempt_session))]
    pub(crate) fn begin_recording(&mut self) {
        match self.state {
            AttemptState::Idle | AttemptState::CaptureFailed { .. } => {}
            AttemptState::Recorded { .. } | AttemptState::SubmissionFailed { .. } => {
                debug!("begin_recording discards the held take");
            }
            AttemptState::Recording => {
                debug!("begin_recording while recording, ignoring");
                return;
            }
            _ => {
                debug!(state = self.state.name(), "begin_recording invalid, ignoring");
                return;
            }
        }

        match self.session.start() {
            Ok(()) => {
                info!(question_id = self.question_id, "Recording started");
                self.state = AttemptState::Recording;
            }
            Err(e) => {
                warn!(error = ?e, "Capture failed to start");
                self.state = AttemptState::CaptureFailed {
                    message: capture_message(&e),
                };
            }
        }
    }

    /// Stop capturing and hold the finalized take. Valid from
    /// `Recording` only.
    #[instrument(skip(self), fields(session = %self.attempt_session))]
    pub(crate) fn finish_recording(&mut self) {
        if self.state != AttemptState::Recording {
            debug!(state = self.state.name(), "finish_recording invalid, ignoring");
            return;
        }

        match self.session.stop() {
            Ok(Some(artifact)) => {
                info!(
                    duration_seconds = artifact.duration_seconds,
                    encoded_len = artifact.len(),
                    "Take recorded"
                );
                self.state = AttemptState::Recorded { artifact };
            }
            Ok(None) => {
                // Session lost its capture without producing a take.
                warn!("finish_recording found no active capture");
                self.state = AttemptState::CaptureFailed {
                    message: capture_message_for_empty_take(),
                };
            }
            Err(e) => {
                warn!(error = ?e, "Capture failed at stop");
                self.state = AttemptState::CaptureFailed {
                    message: capture_message(&e),
                };
            }
        }
    }

    /// Request submission of the held take.
    ///
    /// Valid from `Recorded` or `SubmissionFailed`; returns the payload
    /// the event loop should dispatch. From any other state (including
    /// `Submitting`) returns `None`, which is what guarantees at most
    /// one grading request in flight per controller.
    #[instrument(skip(self), fields(session = %self.attempt_session))]
    pub(crate) fn submit(&mut self) -> Option<PendingSubmission> {
        let artifact = match &self.state {
            AttemptState::Recorded { artifact }
            | AttemptState::SubmissionFailed { artifact, .. } => artifact.clone(),
            AttemptState::Submitting { .. } => {
                debug!("submit while submitting, ignoring");
                return None;
            }
            _ => {
                debug!(state = self.state.name(), "submit invalid, ignoring");
                return None;
            }
        };

        info!(
            question_id = self.question_id,
            duration_seconds = artifact.duration_seconds,
            "Submission dispatched"
        );

        self.state = AttemptState::Submitting {
            artifact: artifact.clone(),
        };

        Some(PendingSubmission {
            epoch: self.epoch,
            submission: AttemptSubmission {
                question_id: self.question_id,
                artifact,
            },
        })
    }

    /// Apply the outcome of a dispatched submission.
    ///
    /// Ignored unless `epoch` matches the current epoch and the state is
    /// still `Submitting`; a completion that lost a race against
    /// `reset()` is dropped here.
    #[instrument(skip(self, outcome), fields(session = %self.attempt_session))]
    pub(crate) fn complete_submission(
        &mut self,
        epoch: u64,
        outcome: Result<GradedResult, ApiError>,
    ) {
        if epoch != self.epoch {
            debug!(
                stale_epoch = epoch,
                current_epoch = self.epoch,
                "Stale submission completion, ignoring"
            );
            return;
        }

        let artifact = match std::mem::replace(&mut self.state, AttemptState::Idle) {
            AttemptState::Submitting { artifact } => artifact,
            other => {
                debug!(
                    state = other.name(),
                    "Completion without submission in flight, ignoring"
                );
                self.state = other;
                return;
            }
        };

        match outcome {
            Ok(result) => {
                info!(attempt_id = result.id, score = ?result.score, "Attempt graded");
                self.state = AttemptState::Graded { result };
            }
            Err(e) => {
                warn!(error = ?e, "Submission failed, take retained for retry");
                self.state = AttemptState::SubmissionFailed {
                    message: e.user_message(),
                    artifact,
                };
            }
        }
    }

    /// Return to `Idle`, discarding any held artifact, result, or
    /// in-progress capture. Safe from any state; late completions for
    /// the abandoned attempt are dropped by the epoch bump.
    #[instrument(skip(self), fields(session = %self.attempt_session))]
    pub(crate) fn reset(&mut self) {
        self.epoch = next_epoch();
        self.session.abort();
        if self.state != AttemptState::Idle {
            info!(from = self.state.name(), "Attempt reset");
        }
        self.state = AttemptState::Idle;
    }

    #[cfg(test)]
    pub(crate) fn seed_state(&mut self, state: AttemptState) {
        self.state = state;
    }

    #[cfg(test)]
    pub(crate) fn current_epoch(&self) -> u64 {
        self.epoch
    }
}

/// UI wording for capture failures, keyed by error kind. Raw backend
/// detail stays in the logs.
fn capture_message(error: &CaptureError) -> String {
    match error {
        CaptureError::PermissionDenied { .. } => {
            "Could not access microphone. Please grant permission.".to_string()
        }
        CaptureError::DeviceUnavailable { .. } => {
            "No microphone available. Check your input device and try again.".to_string()
        }
        CaptureError::NoAudioCaptured { .. } => capture_message_for_empty_take(),
        CaptureError::EncodingFailed { .. } => {
            "The recording could not be processed. Please record again.".to_string()
        }
    }
}

fn capture_message_for_empty_take() -> String {
    "No audio was captured. Please record again.".to_string()
}
