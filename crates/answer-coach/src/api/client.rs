use crate::api::{
    ApiError, ApiResult,
    types::{
        AttemptSubmission, AuthResponse, AuthToken, ErrorBody, GradedResult, LeaderboardEntry,
        Question, UserProfile,
    },
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use reqwest::{StatusCode, Url, multipart};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument, warn};

/// Client for the practice-server REST API.
///
/// The bearer token is held as explicit state set after login, never
/// read from ambient storage, so tests can construct a client with or
/// without a credential.
#[derive(Clone)]
pub(crate) struct ApiClient {
    base: Url,
    http: reqwest::Client,
    token: Option<AuthToken>,
}

impl ApiClient {
    /// Build a client against `base_url` with the given request timeout.
    pub(crate) fn new(base_url: &str, timeout_seconds: u64) -> ApiResult<Self> {
        let base = Url::parse(base_url).map_err(|e| ApiError::Transport {
            reason: format!("Invalid base URL {:?}: {}", base_url, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ApiError::Transport {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            base,
            http,
            token: None,
        })
    }

    /// Attach the bearer credential used by authenticated calls.
    pub(crate) fn set_token(&mut self, token: AuthToken) {
        self.token = Some(token);
    }

    /// Drop the bearer credential (logout).
    pub(crate) fn clear_token(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base.join(path).map_err(|e| ApiError::Transport {
            reason: format!("Invalid URL path {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn bearer(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            req.bearer_auth(token.as_str())
        } else {
            req
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        req.send().await.map_err(|e| ApiError::Transport {
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Decode a success body, or turn an error status into the
    /// `{detail}`-carrying rejection the server sends with 4xx.
    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
        let status = resp.status();
        if status.is_success() {
            resp.json::<T>().await.map_err(|e| {
                warn!(error = %e, "Undecodable response body");
                ApiError::InvalidResponse {
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })
        } else {
            Err(Self::rejection(status, resp).await)
        }
    }

    async fn rejection(status: StatusCode, resp: reqwest::Response) -> ApiError {
        let detail = resp
            .json::<ErrorBody>()
            .await
            .map(|body| body.detail)
            .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));

        if status == StatusCode::NOT_FOUND {
            ApiError::NotFound {
                detail,
                location: ErrorLocation::from(Location::caller()),
            }
        } else {
            ApiError::Rejected {
                status: status.as_u16(),
                detail,
                location: ErrorLocation::from(Location::caller()),
            }
        }
    }

    /// Register a new account.
    #[instrument(skip(self, password))]
    pub(crate) async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthResponse> {
        let url = self.url("auth/register")?;
        let body = json!({ "username": username, "email": email, "password": password });
        let resp = self.send(self.http.post(url).json(&body)).await?;
        Self::read_json(resp).await
    }

    /// Exchange credentials for a bearer token.
    #[instrument(skip(self, password))]
    pub(crate) async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let url = self.url("auth/login")?;
        let body = json!({ "email": email, "password": password });
        let resp = self.send(self.http.post(url).json(&body)).await?;
        Self::read_json(resp).await
    }

    /// Fetch the profile behind the current bearer token
    /// (authenticated). Used to validate a persisted token at startup.
    #[instrument(skip(self))]
    pub(crate) async fn current_user(&self) -> ApiResult<UserProfile> {
        let url = self.url("auth/me")?;
        let resp = self.send(self.bearer(self.http.get(url))).await?;
        Self::read_json(resp).await
    }

    /// List all question prompts.
    #[instrument(skip(self))]
    pub(crate) async fn questions(&self) -> ApiResult<Vec<Question>> {
        let url = self.url("questions/")?;
        let resp = self.send(self.http.get(url)).await?;
        Self::read_json(resp).await
    }

    /// Fetch one question by id.
    #[instrument(skip(self))]
    pub(crate) async fn question(&self, id: i64) -> ApiResult<Question> {
        let url = self.url(&format!("questions/{}", id))?;
        let resp = self.send(self.http.get(url)).await?;
        Self::read_json(resp).await
    }

    /// Create a new question prompt (authenticated).
    #[instrument(skip(self, description))]
    pub(crate) async fn create_question(
        &self,
        title: &str,
        description: &str,
        category: Option<&str>,
    ) -> ApiResult<Question> {
        let url = self.url("questions/")?;
        let body = json!({ "title": title, "description": description, "category": category });
        let resp = self.send(self.bearer(self.http.post(url).json(&body))).await?;
        Self::read_json(resp).await
    }

    /// Submit a recorded attempt for grading (authenticated).
    ///
    /// Multipart form: the encoded artifact as the `audio` part plus a
    /// `question_id` text part. The artifact bytes are cloned into the
    /// request so the caller keeps its copy for a retry.
    #[instrument(skip(self, submission), fields(question_id = submission.question_id))]
    pub(crate) async fn submit_attempt(
        &self,
        submission: &AttemptSubmission,
    ) -> ApiResult<GradedResult> {
        let url = self.url("attempts/")?;

        let audio = multipart::Part::bytes(submission.artifact.encoded_bytes.clone())
            .file_name("recording.wav")
            .mime_str(submission.artifact.mime_type)
            .map_err(|e| ApiError::Transport {
                reason: format!("Failed to build audio part: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let form = multipart::Form::new()
            .part("audio", audio)
            .text("question_id", submission.question_id.to_string());

        debug!(
            audio_len = submission.artifact.len(),
            duration_seconds = submission.artifact.duration_seconds,
            "Submitting attempt"
        );

        let resp = self
            .send(self.bearer(self.http.post(url).multipart(form)))
            .await?;
        Self::read_json(resp).await
    }

    /// Fetch a graded attempt by id (authenticated).
    #[instrument(skip(self))]
    pub(crate) async fn attempt(&self, id: i64) -> ApiResult<GradedResult> {
        let url = self.url(&format!("attempts/{}", id))?;
        let resp = self.send(self.bearer(self.http.get(url))).await?;
        Self::read_json(resp).await
    }

    /// Leaderboard across all users.
    #[instrument(skip(self))]
    pub(crate) async fn global_leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>> {
        let url = self.url("leaderboard/global")?;
        let resp = self.send(self.http.get(url)).await?;
        Self::read_json(resp).await
    }

    /// Leaderboard restricted to the caller's friends (authenticated).
    #[instrument(skip(self))]
    pub(crate) async fn friends_leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>> {
        let url = self.url("leaderboard/friends")?;
        let resp = self.send(self.bearer(self.http.get(url))).await?;
        Self::read_json(resp).await
    }
}
