//! HTTP client for the summary/notes backend.
//!
//! One method per endpoint. Non-2xx responses become
//! `NetworkError::Status` carrying the backend's `error` field when it sent
//! one, otherwise the raw body or the status reason.

use crate::error::{ClientError, DataError, NetworkError};
use crate::models::{
    ClientIdentity, ErrorBody, MindMapData, NewNote, Note, SummaryRequest, SummaryResponse,
    SummaryResult, UserRequest, UserResponse, WatchedVideo, WatchedVideoRequest,
};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NetworkError> {
        let parsed =
            Url::parse(base_url).map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(NetworkError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vidnotes/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn user_endpoint(&self, user_id: i64, rest: &str) -> String {
        self.endpoint(&format!("/users/{}{}", user_id, rest))
    }

    // ========================================================================
    // Liveness
    // ========================================================================

    /// `GET /`. Any failure counts as offline.
    pub async fn ping(&self) -> bool {
        match self.http.get(self.endpoint("/")).send().await {
            Ok(resp) => {
                debug!(status = resp.status().as_u16(), "backend status check");
                resp.status().is_success()
            }
            Err(e) => {
                warn!(error = %e, "backend status check failed");
                false
            }
        }
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_or_create_user(&self, client: &ClientIdentity) -> Result<i64, ClientError> {
        let resp = self
            .http
            .post(self.endpoint("/get_or_create_user"))
            .json(&UserRequest {
                client_generated_user_id: client.as_str(),
            })
            .send()
            .await
            .map_err(NetworkError::from)?;
        let body: UserResponse = decode(check(resp).await?).await?;
        body.user_id
            .ok_or(ClientError::Data(DataError::MissingField("user_id")))
    }

    // ========================================================================
    // Summaries
    // ========================================================================

    pub async fn summarize(&self, video_id: &str) -> Result<SummaryResult, ClientError> {
        let resp = self
            .http
            .post(self.endpoint("/summarize"))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&SummaryRequest { video_id })
            .send()
            .await
            .map_err(NetworkError::from)?;
        let body: SummaryResponse = decode(check(resp).await?).await?;
        // An empty string is as good as no summary at all.
        let summary = body
            .summary
            .filter(|s| !s.is_empty())
            .ok_or(ClientError::Data(DataError::MissingField("summary")))?;
        if let Some(ref info) = body.debug_info {
            debug!(?info, "summary debug info");
        }
        Ok(SummaryResult {
            summary,
            debug_info: body.debug_info,
        })
    }

    // ========================================================================
    // Notes
    // ========================================================================

    pub async fn list_notes(&self, user_id: i64) -> Result<Vec<Note>, ClientError> {
        self.get_json(self.user_endpoint(user_id, "/notes")).await
    }

    pub async fn notes_for_video(&self, user_id: i64, video_id: &str) -> Result<Vec<Note>, ClientError> {
        let rest = format!("/notes_by_video/{}", urlencoding::encode(video_id));
        self.get_json(self.user_endpoint(user_id, &rest)).await
    }

    /// The backend answers a created note with 201; anything else is a failure.
    pub async fn create_note(&self, user_id: i64, note: &NewNote) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.user_endpoint(user_id, "/notes"))
            .json(note)
            .send()
            .await
            .map_err(NetworkError::from)?;
        let resp = check(resp).await?;
        if resp.status() != StatusCode::CREATED {
            return Err(NetworkError::Status {
                status: resp.status().as_u16(),
                message: "note was not created".to_string(),
            }
            .into());
        }
        Ok(())
    }

    // ========================================================================
    // History and Mind Map
    // ========================================================================

    pub async fn mind_map_data(&self, user_id: i64) -> Result<MindMapData, ClientError> {
        self.get_json(self.user_endpoint(user_id, "/mind_map_data")).await
    }

    pub async fn watched_videos(&self, user_id: i64) -> Result<Vec<WatchedVideo>, ClientError> {
        self.get_json(self.user_endpoint(user_id, "/watched_videos")).await
    }

    /// The backend deduplicates entries logged within a few minutes, so
    /// repeated calls are harmless.
    pub async fn log_watched_video(
        &self,
        user_id: i64,
        video_id: &str,
        video_title: Option<&str>,
    ) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.user_endpoint(user_id, "/watched_videos"))
            .json(&WatchedVideoRequest {
                video_id,
                video_title,
            })
            .send()
            .await
            .map_err(NetworkError::from)?;
        check(resp).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ClientError> {
        let resp = self.http.get(url).send().await.map_err(NetworkError::from)?;
        decode(check(resp).await?).await
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.error)
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    Err(NetworkError::Status {
        status: status.as_u16(),
        message,
    }
    .into())
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let bytes = resp.bytes().await.map_err(NetworkError::from)?;
    serde_json::from_slice(&bytes).map_err(|e| DataError::Decode(e.to_string()).into())
}
