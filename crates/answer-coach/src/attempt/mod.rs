mod controller;
mod state;

pub(crate) use {
    controller::{AttemptController, PendingSubmission},
    state::AttemptState,
};
