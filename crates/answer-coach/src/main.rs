//! Answer-Coach: practice spoken interview answers and get graded feedback.

mod api;
mod app;
mod app_command;
mod attempt;
mod config;
mod error;
mod presenter;
mod router;
#[cfg(test)]
mod tests;
mod token_store;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
};

use crate::{
    api::{ApiClient, ApiError},
    config::Config,
    router::ViewRouter,
};

use tokio::sync::mpsc;
use tracing::{error, warn};

/// Application entry point.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("answer_coach=debug")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let mut client = match ApiClient::new(&config.api.base_url, config.api.timeout_seconds) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create API client: {:?}", e);
            std::process::exit(1);
        }
    };

    // A token persisted by a previous session skips the login screens,
    // once the server confirms it still names a user.
    let authenticated = match token_store::load() {
        Ok(Some(token)) => {
            client.set_token(token);
            match client.current_user().await {
                Ok(user) => {
                    println!("Welcome back, {}!", user.username);
                    true
                }
                Err(e @ (ApiError::Rejected { .. } | ApiError::NotFound { .. })) => {
                    warn!(error = ?e, "Persisted token rejected, logging out");
                    if let Err(e) = token_store::clear() {
                        warn!(error = ?e, "Failed to clear token");
                    }
                    client.clear_token();
                    false
                }
                Err(e) => {
                    // Server unreachable; keep the session and let the
                    // question list surface the transport error.
                    warn!(error = ?e, "Could not verify persisted session");
                    true
                }
            }
        }
        Ok(None) => false,
        Err(e) => {
            error!("Failed to load token: {:?}", e);
            false
        }
    };

    let (command_tx, command_rx) = mpsc::channel(32);

    let app = App {
        client,
        router: ViewRouter::new(authenticated),
        controller: None,
        command_tx,
        command_rx,
    };

    app.run().await;
}
