use answer_coach_core::AudioArtifact;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An interview question prompt. Read-only on the client; lifecycle is
/// owned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Question {
    /// Server-assigned id.
    pub id: i64,
    /// User who created the question.
    #[serde(default)]
    pub creator_id: Option<i64>,
    /// Short prompt title.
    pub title: String,
    /// Full prompt text.
    pub description: String,
    /// Optional category tag.
    #[serde(default)]
    pub category: Option<String>,
    /// Server-side creation timestamp (opaque, display only).
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Structured feedback attached to a graded attempt. Every field is
/// absent-tolerant: the grader may return any subset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub(crate) struct Feedback {
    /// Short prose summary of the answer quality.
    #[serde(default)]
    pub summary: Option<String>,
    /// Per-criterion scores on a 0..10 scale, keyed by criterion name.
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
    /// What the answer did well.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// What the answer should improve.
    #[serde(default)]
    pub improvements: Vec<String>,
}

/// A graded attempt as returned by the server. Immutable once received;
/// only `id` is guaranteed present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct GradedResult {
    /// Attempt id.
    pub id: i64,
    /// Overall score, absent until grading completes.
    #[serde(default)]
    pub score: Option<f64>,
    /// Speech-to-text transcript of the answer.
    #[serde(default)]
    pub transcript: Option<String>,
    /// Structured grading feedback.
    #[serde(default)]
    pub feedback: Option<Feedback>,
}

/// One row of the global or friends leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LeaderboardEntry {
    /// User id.
    pub user_id: i64,
    /// Display name.
    pub username: String,
    /// Number of graded attempts.
    pub total_attempts: i64,
    /// Mean score across graded attempts.
    pub average_score: f64,
}

/// Opaque bearer credential. Persisted outside this crate's concern;
/// attached explicitly to the calls that need it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct AuthToken(String);

impl AuthToken {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// Response from the register/login endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthResponse {
    /// Bearer token for subsequent authenticated calls.
    #[serde(alias = "access_token")]
    pub token: String,
    /// Display name, when the server echoes it back.
    #[serde(default)]
    pub username: Option<String>,
}

/// The authenticated user's own profile, from the session-restore
/// endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserProfile {
    /// User id.
    pub id: i64,
    /// Display name.
    pub username: String,
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Error body the server sends with 4xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    /// Human-readable rejection reason.
    pub detail: String,
}

/// The request payload for one attempt: built once from the held
/// artifact and the active question, consumed by a single submission.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AttemptSubmission {
    /// Question being answered.
    pub question_id: i64,
    /// The finalized recording.
    pub artifact: AudioArtifact,
}
