use crate::api::{ApiError, types::GradedResult};

/// Commands delivered to the main application loop.
#[derive(Debug)]
pub(crate) enum AppCommand {
    /// One line of user input from the terminal.
    Input(String),
    /// A dispatched submission resolved. Applied only if `epoch` still
    /// matches the controller's current epoch.
    SubmissionComplete {
        /// Epoch captured when the submission was dispatched.
        epoch: u64,
        /// The grading collaborator's response or failure.
        outcome: Result<GradedResult, ApiError>,
    },
    /// Request application shutdown.
    Shutdown,
}
