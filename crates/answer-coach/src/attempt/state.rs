use crate::api::types::GradedResult;

use answer_coach_core::AudioArtifact;

/// Lifecycle state of a single practice attempt.
///
/// ```text
/// Idle -> Recording -> Recorded -> Submitting -> Graded
///                                         \-> SubmissionFailed -> Submitting (retry)
/// Recording -> CaptureFailed
/// Idle/CaptureFailed -> CaptureFailed (start refused)
/// ```
///
/// Invariant: an [`AudioArtifact`] is held exactly in `Recorded`,
/// `Submitting`, and `SubmissionFailed`. A failed submission keeps the
/// artifact so the user retries without re-recording.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AttemptState {
    /// Nothing recorded yet.
    Idle,
    /// The capture session is live.
    Recording,
    /// A finalized take is held, awaiting submission.
    Recorded {
        /// The finalized recording.
        artifact: AudioArtifact,
    },
    /// Submission in flight; at most one per controller at a time.
    Submitting {
        /// Retained so a failed submission can restore it for retry.
        artifact: AudioArtifact,
    },
    /// Terminal success: the grading result arrived.
    Graded {
        /// The grading collaborator's response.
        result: GradedResult,
    },
    /// The network submission failed; retryable via `submit()`.
    SubmissionFailed {
        /// The take to re-send on retry.
        artifact: AudioArtifact,
        /// Human-readable failure message for display.
        message: String,
    },
    /// The capture could not start or produced nothing. The user must
    /// act (grant permission, fix the device) and start again.
    CaptureFailed {
        /// Human-readable failure message for display.
        message: String,
    },
}

impl AttemptState {
    /// Short name for logs.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            AttemptState::Idle => "idle",
            AttemptState::Recording => "recording",
            AttemptState::Recorded { .. } => "recorded",
            AttemptState::Submitting { .. } => "submitting",
            AttemptState::Graded { .. } => "graded",
            AttemptState::SubmissionFailed { .. } => "submission_failed",
            AttemptState::CaptureFailed { .. } => "capture_failed",
        }
    }

    /// The artifact currently held, if the state carries one.
    pub(crate) fn artifact(&self) -> Option<&AudioArtifact> {
        match self {
            AttemptState::Recorded { artifact }
            | AttemptState::Submitting { artifact }
            | AttemptState::SubmissionFailed { artifact, .. } => Some(artifact),
            _ => None,
        }
    }
}
