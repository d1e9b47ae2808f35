//! Single-focus navigation among the app's screens.
//!
//! A flat tagged-union "current screen" value with explicit, named
//! transitions. No history stack, no URL addressing. "Back" always
//! lands on the question list; the caller is responsible for resetting
//! any in-progress attempt when leaving a detail screen.

use tracing::{debug, instrument};

/// The screen in focus, carrying the minimal payload it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Pre-auth login form.
    Login,
    /// Pre-auth registration form.
    Register,
    /// Browsable list of question prompts.
    QuestionList,
    /// One question with the recording surface.
    QuestionDetail {
        /// Question in focus.
        question_id: i64,
    },
    /// Feedback for a graded attempt. Reachable only from a completed
    /// detail submission; there is no deep link into results.
    AttemptResults {
        /// Attempt in focus.
        attempt_id: i64,
    },
    /// Global/friends ranking.
    Leaderboard,
}

/// Non-hierarchical screen state machine. Transitions not listed for
/// the current screen are no-ops.
pub(crate) struct ViewRouter {
    current: Screen,
}

impl ViewRouter {
    /// Start on the login screen, or straight on the list when a
    /// persisted credential is present.
    pub(crate) fn new(authenticated: bool) -> Self {
        Self {
            current: if authenticated {
                Screen::QuestionList
            } else {
                Screen::Login
            },
        }
    }

    pub(crate) fn current(&self) -> &Screen {
        &self.current
    }

    /// Login → Register.
    #[instrument(skip(self))]
    pub(crate) fn show_register(&mut self) {
        self.transition(Screen::Login == self.current, Screen::Register);
    }

    /// Register → Login.
    #[instrument(skip(self))]
    pub(crate) fn show_login(&mut self) {
        self.transition(Screen::Register == self.current, Screen::Login);
    }

    /// Login/Register → QuestionList, after authentication succeeds.
    #[instrument(skip(self))]
    pub(crate) fn logged_in(&mut self) {
        let valid = matches!(self.current, Screen::Login | Screen::Register);
        self.transition(valid, Screen::QuestionList);
    }

    /// QuestionList → QuestionDetail.
    #[instrument(skip(self))]
    pub(crate) fn open_question(&mut self, question_id: i64) {
        let valid = self.current == Screen::QuestionList;
        self.transition(valid, Screen::QuestionDetail { question_id });
    }

    /// QuestionDetail → AttemptResults, once an attempt is graded.
    #[instrument(skip(self))]
    pub(crate) fn show_results(&mut self, attempt_id: i64) {
        let valid = matches!(self.current, Screen::QuestionDetail { .. });
        self.transition(valid, Screen::AttemptResults { attempt_id });
    }

    /// QuestionList → Login, after the credential is dropped.
    #[instrument(skip(self))]
    pub(crate) fn logged_out(&mut self) {
        let valid = self.current == Screen::QuestionList;
        self.transition(valid, Screen::Login);
    }

    /// QuestionList → Leaderboard.
    #[instrument(skip(self))]
    pub(crate) fn open_leaderboard(&mut self) {
        let valid = self.current == Screen::QuestionList;
        self.transition(valid, Screen::Leaderboard);
    }

    /// Detail/Results/Leaderboard → QuestionList.
    ///
    /// Returns `true` when a transition happened, so the caller knows to
    /// discard in-progress attempt state.
    #[instrument(skip(self))]
    pub(crate) fn back(&mut self) -> bool {
        let valid = matches!(
            self.current,
            Screen::QuestionDetail { .. } | Screen::AttemptResults { .. } | Screen::Leaderboard
        );
        self.transition(valid, Screen::QuestionList)
    }

    fn transition(&mut self, valid: bool, to: Screen) -> bool {
        if valid {
            debug!(from = ?self.current, to = ?to, "Screen transition");
            self.current = to;
            true
        } else {
            debug!(current = ?self.current, refused = ?to, "Transition invalid, ignoring");
            false
        }
    }
}
