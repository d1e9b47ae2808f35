use crate::{
    AppCommand,
    api::{ApiClient, ApiError, types::AuthToken},
    attempt::{AttemptController, AttemptState},
    presenter,
    router::{Screen, ViewRouter},
    token_store,
};

use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

/// Main application state.
///
/// Runs on the async runtime. User input arrives as lines from a
/// blocking stdin-reader task; submission completions arrive from
/// spawned network tasks. Both funnel into one command channel, so
/// every state transition happens on this single logical thread.
pub(crate) struct App {
    pub(crate) client: ApiClient,
    pub(crate) router: ViewRouter,
    pub(crate) controller: Option<AttemptController>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) {
        info!("Answer-Coach starting");

        // Stdin forwarding via single persistent blocking task.
        //
        // Shutdown: when command_rx is dropped (main loop breaks),
        // blocking_send() fails, breaking the blocking loop.
        let input_tx = self.command_tx.clone();
        let stdin_handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            let mut line = String::new();
            loop {
                line.clear();
                match stdin.read_line(&mut line) {
                    Ok(0) => {
                        let _ = input_tx.blocking_send(AppCommand::Shutdown);
                        break;
                    }
                    Ok(_) => {
                        if input_tx
                            .blocking_send(AppCommand::Input(line.trim().to_string()))
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read stdin");
                        let _ = input_tx.blocking_send(AppCommand::Shutdown);
                        break;
                    }
                }
            }
        });

        self.render_screen().await;

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                AppCommand::Input(line) => {
                    if !self.handle_input(&line).await {
                        break;
                    }
                }
                AppCommand::SubmissionComplete { epoch, outcome } => {
                    self.handle_submission_complete(epoch, outcome).await;
                }
                AppCommand::Shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        // Discard any in-progress attempt; the capture session releases
        // the device on drop.
        if let Some(controller) = &mut self.controller {
            controller.reset();
        }

        drop(self.command_rx);
        stdin_handle.abort();

        info!("Answer-Coach shut down");
    }

    /// Route one line of input to the active screen. Returns `false`
    /// when the user asked to quit.
    async fn handle_input(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }
        if line == "quit" || line == "q" {
            return false;
        }

        match self.router.current().clone() {
            Screen::Login => self.handle_login_input(line).await,
            Screen::Register => self.handle_register_input(line).await,
            Screen::QuestionList => self.handle_list_input(line).await,
            Screen::QuestionDetail { question_id } => {
                self.handle_detail_input(line, question_id).await;
            }
            Screen::AttemptResults { .. } | Screen::Leaderboard => {
                self.handle_back_only_input(line).await;
            }
        }

        true
    }

    async fn handle_login_input(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("login") => {
                let (Some(email), Some(password)) = (parts.next(), parts.next()) else {
                    println!("Usage: login <email> <password>");
                    return;
                };
                match self.client.login(email, password).await {
                    Ok(auth) => self.finish_auth(auth.token, auth.username).await,
                    Err(e) => println!("Login failed: {}", e.user_message()),
                }
            }
            Some("register") => {
                self.router.show_register();
                self.render_screen().await;
            }
            _ => println!("Commands: login <email> <password> | register | quit"),
        }
    }

    async fn handle_register_input(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("register") => {
                let (Some(username), Some(email), Some(password)) =
                    (parts.next(), parts.next(), parts.next())
                else {
                    println!("Usage: register <username> <email> <password>");
                    return;
                };
                match self.client.register(username, email, password).await {
                    Ok(auth) => self.finish_auth(auth.token, auth.username).await,
                    Err(e) => println!("Registration failed: {}", e.user_message()),
                }
            }
            Some("login") => {
                self.router.show_login();
                self.render_screen().await;
            }
            _ => println!("Commands: register <username> <email> <password> | login | quit"),
        }
    }

    async fn finish_auth(&mut self, token: String, username: Option<String>) {
        let token = AuthToken::new(token);
        if let Err(e) = token_store::save(&token) {
            warn!(error = ?e, "Failed to persist token");
        }
        self.client.set_token(token);
        println!("Welcome{}!", username.map(|u| format!(", {}", u)).unwrap_or_default());
        self.router.logged_in();
        self.render_screen().await;
    }

    async fn handle_list_input(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("open") => {
                let Some(id) = parts.next().and_then(|s| s.parse::<i64>().ok()) else {
                    println!("Usage: open <question-id>");
                    return;
                };
                self.router.open_question(id);
                self.controller = Some(AttemptController::new(id));
                self.render_screen().await;
            }
            Some("board") => {
                self.router.open_leaderboard();
                self.render_screen().await;
            }
            Some("new") => {
                self.create_question(line).await;
            }
            Some("list") => self.render_screen().await,
            Some("logout") => {
                if let Err(e) = token_store::clear() {
                    warn!(error = ?e, "Failed to clear token");
                }
                self.client.clear_token();
                self.router.logged_out();
                self.render_screen().await;
            }
            _ => println!(
                "Commands: open <id> | board | new <title> | <description> | [category] | \
                 list | logout | quit"
            ),
        }
    }

    /// Parse `new <title> | <description> | [category]` and create it.
    async fn create_question(&mut self, line: &str) {
        let rest = line.trim_start_matches("new").trim();
        let mut fields = rest.split('|').map(str::trim);
        let (Some(title), Some(description)) = (fields.next(), fields.next()) else {
            println!("Usage: new <title> | <description> | [category]");
            return;
        };
        let category = fields.next().filter(|c| !c.is_empty());

        match self.client.create_question(title, description, category).await {
            Ok(question) => println!("Created question #{}: {}", question.id, question.title),
            Err(e) => println!("Could not create question: {}", e.user_message()),
        }
    }

    async fn handle_detail_input(&mut self, line: &str, question_id: i64) {
        match line {
            "record" | "r" => self.toggle_recording(),
            "submit" | "s" => self.dispatch_submission(question_id),
            "time" | "t" => {
                if let Some(controller) = &self.controller {
                    println!("{}", format_elapsed(controller.elapsed_seconds()));
                }
            }
            "back" | "b" => self.go_back().await,
            _ => println!("Commands: record | submit | time | back | quit"),
        }
    }

    fn toggle_recording(&mut self) {
        let Some(controller) = &mut self.controller else {
            return;
        };

        if matches!(controller.state(), AttemptState::Recording) {
            controller.finish_recording();
            match controller.state() {
                AttemptState::Recorded { artifact } => {
                    println!(
                        "Recording completed: {}",
                        format_elapsed(artifact.duration_seconds)
                    );
                    println!("Type 'submit' to send your answer, or 'record' to redo.");
                }
                AttemptState::CaptureFailed { message } => println!("{}", message),
                _ => {}
            }
        } else {
            controller.begin_recording();
            match controller.state() {
                AttemptState::Recording => {
                    println!("Recording... type 'record' again to stop.");
                }
                AttemptState::CaptureFailed { message } => println!("{}", message),
                _ => println!("Cannot record right now."),
            }
        }
    }

    /// Ask the controller for a submission and hand it to a network
    /// task. The controller refuses while one is already in flight, so
    /// mashing 'submit' sends exactly one request.
    fn dispatch_submission(&mut self, question_id: i64) {
        let Some(controller) = &mut self.controller else {
            return;
        };

        let Some(pending) = controller.submit() else {
            match controller.state() {
                AttemptState::Submitting { .. } => println!("Already submitting..."),
                _ => println!("Record an answer first."),
            }
            return;
        };

        println!("Submitting your answer...");

        let client = self.client.clone();
        let command_tx = self.command_tx.clone();
        tokio::task::spawn(async move {
            let outcome = client.submit_attempt(&pending.submission).await;
            if command_tx
                .send(AppCommand::SubmissionComplete {
                    epoch: pending.epoch,
                    outcome,
                })
                .await
                .is_err()
            {
                warn!(question_id, "App loop gone, dropping submission outcome");
            }
        });
    }

    async fn handle_submission_complete(
        &mut self,
        epoch: u64,
        outcome: Result<crate::api::types::GradedResult, ApiError>,
    ) {
        let Some(controller) = &mut self.controller else {
            // Controller torn down while the call was in flight.
            info!("Submission completed after teardown, ignoring");
            return;
        };

        controller.complete_submission(epoch, outcome);

        let graded_id = match controller.state() {
            AttemptState::Graded { result } => Some(result.id),
            AttemptState::SubmissionFailed { message, .. } => {
                println!("Submission failed: {}", message);
                println!("Your recording is kept - type 'submit' to retry.");
                None
            }
            _ => None,
        };

        if let Some(attempt_id) = graded_id {
            self.router.show_results(attempt_id);
            self.render_screen().await;
        }
    }

    async fn handle_back_only_input(&mut self, line: &str) {
        match line {
            "back" | "b" => self.go_back().await,
            "friends" if *self.router.current() == Screen::Leaderboard => {
                self.render_leaderboard(true).await;
            }
            _ => println!("Commands: back | quit"),
        }
    }

    /// Leave the current screen for the list, discarding any
    /// in-progress attempt.
    async fn go_back(&mut self) {
        if self.router.back() {
            if let Some(controller) = &mut self.controller {
                controller.reset();
            }
            self.controller = None;
            self.render_screen().await;
        }
    }

    async fn render_screen(&mut self) {
        match self.router.current().clone() {
            Screen::Login => {
                println!("\n== Answer Coach ==");
                println!("login <email> <password>  |  register  |  quit");
            }
            Screen::Register => {
                println!("\n== Create account ==");
                println!("register <username> <email> <password>  |  login  |  quit");
            }
            Screen::QuestionList => self.render_question_list().await,
            Screen::QuestionDetail { question_id } => self.render_question(question_id).await,
            Screen::AttemptResults { attempt_id } => self.render_results(attempt_id).await,
            Screen::Leaderboard => self.render_leaderboard(false).await,
        }
    }

    async fn render_question_list(&mut self) {
        println!("\n== Questions ==");
        match self.client.questions().await {
            Ok(questions) if questions.is_empty() => {
                println!("No questions yet. Add one with 'new'.");
            }
            Ok(questions) => {
                for q in &questions {
                    let category = q
                        .category
                        .as_deref()
                        .map(|c| format!(" [{}]", c))
                        .unwrap_or_default();
                    println!("  #{}{} {}", q.id, category, q.title);
                }
                println!("open <id> | board | new <title> | <description> | [category] | logout");
            }
            Err(e) => println!("Failed to get questions: {}", e.user_message()),
        }
    }

    async fn render_question(&mut self, question_id: i64) {
        match self.client.question(question_id).await {
            Ok(question) => {
                println!("\n== {} ==", question.title);
                if let Some(category) = &question.category {
                    println!("[{}]", category);
                }
                println!("{}", question.description);
                println!("\nRecord your answer: record | submit | time | back");
            }
            Err(e @ ApiError::NotFound { .. }) => {
                println!("Question not found: {}", e.user_message());
                println!("Type 'back' to return to the questions.");
            }
            Err(e) => println!("Failed to get question: {}", e.user_message()),
        }
    }

    async fn render_results(&mut self, attempt_id: i64) {
        // Re-fetch by id: grading may still be filling in transcript and
        // feedback server-side after the submission response.
        let result = match self.client.attempt(attempt_id).await {
            Ok(result) => Some(result),
            Err(e @ ApiError::NotFound { .. }) => {
                println!("Results not found: {}", e.user_message());
                None
            }
            Err(e) => {
                warn!(error = ?e, "Falling back to held result");
                match self.controller.as_ref().map(|c| c.state()) {
                    Some(AttemptState::Graded { result }) => Some(result.clone()),
                    _ => {
                        println!("Failed to load results: {}", e.user_message());
                        None
                    }
                }
            }
        };

        let Some(result) = result else {
            println!("Type 'back' to return to the questions.");
            return;
        };

        let view = presenter::present(&result);

        println!("\n== Results ==");
        match view.score_band {
            Some(band) => println!("Overall score: {} ({})", view.score_display, band.label()),
            None => println!("Overall score: {}", view.score_display),
        }

        if let Some(summary) = &view.summary {
            println!("\nSummary\n  {}", summary);
        }

        if !view.bars.is_empty() {
            println!("\nDetailed scores");
            for bar in &view.bars {
                println!(
                    "  {:<16} {:>6}  {:>3}%  {}",
                    bar.label,
                    bar.display,
                    bar.width_pct,
                    bar.band.label()
                );
            }
        }

        if !view.strengths.is_empty() {
            println!("\nStrengths");
            for item in &view.strengths {
                println!("  - {}", item);
            }
        }

        if !view.improvements.is_empty() {
            println!("\nAreas for improvement");
            for item in &view.improvements {
                println!("  - {}", item);
            }
        }

        if let Some(transcript) = &view.transcript {
            println!("\nYour answer transcript\n  {}", transcript);
        }

        println!("\nType 'back' to return to the questions.");
    }

    async fn render_leaderboard(&mut self, friends: bool) {
        let entries = if friends {
            self.client.friends_leaderboard().await
        } else {
            self.client.global_leaderboard().await
        };

        let title = if friends { "Friends" } else { "Global" };
        println!("\n== {} leaderboard ==", title);
        match entries {
            Ok(entries) if entries.is_empty() => println!("No graded attempts yet."),
            Ok(entries) => {
                for (rank, entry) in entries.iter().enumerate() {
                    println!(
                        "  {:>2}. {:<20} avg {:.2} over {} attempts",
                        rank + 1,
                        entry.username,
                        entry.average_score,
                        entry.total_attempts
                    );
                }
            }
            Err(e) => println!("Failed to load leaderboard: {}", e.user_message()),
        }
        println!("friends | back");
    }
}

fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
