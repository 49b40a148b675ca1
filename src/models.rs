//! Data models for the summary and notes client.
//!
//! Wire types mirror the backend's JSON payloads. The rest (summary lines,
//! panel state, notices) exist only on the client side.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identity
// ============================================================================

/// Locally generated, opaque device identifier. Created once and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub fn generate() -> Self {
        ClientIdentity(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ClientIdentity {
    fn from(value: String) -> Self {
        ClientIdentity(value)
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned user, resolved once per session and kept in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: i64,
    pub client_id: ClientIdentity,
}

// ============================================================================
// Backend Payloads
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UserRequest<'a> {
    pub client_generated_user_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    #[serde(default)]
    pub id: Option<i64>,
    pub video_id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNote {
    pub video_id: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryRequest<'a> {
    #[serde(rename = "videoId")]
    pub video_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    pub summary: Option<String>,
    #[serde(default)]
    pub debug_info: Option<DebugInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DebugInfo {
    pub timestamp: Option<String>,
    pub summary_length: Option<usize>,
    pub transcript_length: Option<usize>,
}

/// Summary text as delivered by the backend. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResult {
    pub summary: String,
    pub debug_info: Option<DebugInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedVideo {
    #[serde(default)]
    pub id: Option<i64>,
    pub video_id: String,
    #[serde(default)]
    pub video_title: Option<String>,
    pub watched_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct WatchedVideoRequest<'a> {
    pub video_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_title: Option<&'a str>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MindMapData {
    #[serde(default)]
    pub videos: Vec<WatchedVideo>,
    #[serde(default)]
    pub all_notes_keywords: Vec<String>,
}

impl MindMapData {
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty() && self.all_notes_keywords.is_empty()
    }
}

/// `{"error": "..."}` body the backend attaches to failures.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

// ============================================================================
// Summary Rendering
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryPoint {
    /// `MM:SS` as written by the backend.
    pub timestamp: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SummaryLine {
    Point(SummaryPoint),
    Plain(String),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SummaryView {
    /// At least one line matched a timestamp format.
    Points { lines: Vec<SummaryLine> },
    /// Nothing matched; show the text verbatim.
    Raw { text: String },
    Empty,
}

// ============================================================================
// Session and Panel State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unidentified,
    Identifying,
    Identified,
    IdentityFailed,
    SummaryLoading,
    SummaryShown,
    SummaryError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Blocking message, the `alert()` of the host page.
    Alert,
    Error,
    Success,
}

/// Transient message surfaced to the user outside the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn alert(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Alert,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }
}
