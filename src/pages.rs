//! Standalone pages: every saved note, the mind map and the status popup.

use crate::backend::BackendClient;
use crate::error::PageError;
use crate::identity::UserIdentity;
use crate::models::{MindMapData, Note};
use crate::navigation::watch_url;
use crate::templates::{html_escape, render_markdown};
use tracing::{error, info, warn};

const DISPLAY_TIME: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// All Notes
// ============================================================================

pub async fn load_all_notes(identity: &UserIdentity, backend: &BackendClient) -> Result<Vec<Note>, PageError> {
    let user = identity.resolve().await?;
    let notes = backend
        .list_notes(user.user_id)
        .await
        .map_err(|e| PageError::load("notes", e))?;
    info!(user_id = user.user_id, count = notes.len(), "loaded all notes");
    Ok(notes)
}

pub fn render_all_notes(notes: &Result<Vec<Note>, PageError>) -> String {
    let body = match notes {
        Err(e) => {
            error!(error = %e, "all notes page failed");
            format!(r#"<p class="error-text">{}</p>"#, html_escape(&e.to_string()))
        }
        Ok(notes) if notes.is_empty() => "<p>You haven't saved any notes yet.</p>".to_string(),
        Ok(notes) => notes.iter().map(render_note_item).collect(),
    };

    format!(
        r#"<h1>All My Notes</h1>
        <div id="all-notes-container">{}</div>"#,
        body
    )
}

fn render_note_item(note: &Note) -> String {
    let url = html_escape(&watch_url(&note.video_id));
    format!(
        r#"<div class="note-item">
            <p class="note-content">{}</p>
            <p class="note-video">Video: <a href="{url}" target="_blank">{url}</a></p>
            <p class="note-timestamps">Created: {} | Updated: {}</p>
        </div>"#,
        html_escape(&note.content),
        note.created_at.format(DISPLAY_TIME),
        note.updated_at.format(DISPLAY_TIME),
        url = url
    )
}

// ============================================================================
// Mind Map
// ============================================================================

/// Mind map data, or just the watch history when the backend has no
/// mind map route to offer.
pub async fn load_mind_map(identity: &UserIdentity, backend: &BackendClient) -> Result<MindMapData, PageError> {
    let user = identity.resolve().await?;
    let err = match backend.mind_map_data(user.user_id).await {
        Ok(data) => return Ok(data),
        Err(e) => e,
    };

    warn!(error = %err, "mind map data unavailable, falling back to watch history");
    match backend.watched_videos(user.user_id).await {
        Ok(videos) => Ok(MindMapData {
            videos,
            all_notes_keywords: Vec::new(),
        }),
        Err(history_err) => {
            error!(error = %history_err, "watch history unavailable");
            Err(PageError::load("mind map data", err))
        }
    }
}

/// Outline of watched videos and note keywords as markdown headings.
pub fn mind_map_markdown(data: &MindMapData) -> String {
    let mut markdown = String::new();

    if data.videos.is_empty() {
        markdown.push_str("# My Watched Videos\n- No videos watched yet.\n");
    } else {
        markdown.push_str("# My Watched Videos\n");
        for video in &data.videos {
            let title = video.video_title.as_deref().unwrap_or(&video.video_id);
            markdown.push_str(&format!(
                "## [{} (ID: {})]({})\n",
                title,
                video.video_id,
                watch_url(&video.video_id)
            ));
            markdown.push_str(&format!("### Watched: {}\n", video.watched_at.format(DISPLAY_TIME)));
        }
    }

    if !data.all_notes_keywords.is_empty() {
        markdown.push_str("\n# Common Keywords from Notes\n");
        for keyword in &data.all_notes_keywords {
            markdown.push_str(&format!("## {}\n", keyword));
        }
    }

    if markdown.trim().is_empty() {
        "# Mind Map\n- No data available.".to_string()
    } else {
        markdown
    }
}

pub fn render_mind_map(data: &Result<MindMapData, PageError>) -> String {
    let body = match data {
        Err(e) => {
            error!(error = %e, "mind map page failed");
            format!(
                r#"<div class="message-overlay error">{}</div>"#,
                html_escape(&e.to_string())
            )
        }
        Ok(data) if data.is_empty() => r#"<div class="message-overlay">No data available to display in the mind map (no videos or keywords found).</div>"#
            .to_string(),
        Ok(data) => render_markdown(&mind_map_markdown(data)),
    };

    format!(r#"<div id="mindmap-container">{}</div>"#, body)
}

// ============================================================================
// Popup
// ============================================================================

pub fn render_popup(backend_online: bool) -> String {
    let (class, text) = if backend_online {
        ("success", "&#10003; Server is running")
    } else {
        ("error", "&#10007; Server is offline")
    };

    format!(
        r#"<h1>Video Summary Notes</h1>
        <div id="status" class="status {}">{}</div>
        <p><a class="btn" href="/notes">View All Notes</a> <a class="btn" href="/mind-map">View Mind Map</a></p>"#,
        class, text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IdentityError, NetworkError};
    use crate::models::WatchedVideo;
    use crate::storage::MemoryStore;
    use chrono::NaiveDateTime;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn video(id: &str, title: Option<&str>) -> WatchedVideo {
        WatchedVideo {
            id: None,
            video_id: id.to_string(),
            video_title: title.map(str::to_string),
            watched_at: at("2024-05-01T10:00:00"),
        }
    }

    #[test]
    fn test_mind_map_markdown_videos_and_keywords() {
        let data = MindMapData {
            videos: vec![video("abc", Some("Rust talk")), video("xyz", None)],
            all_notes_keywords: vec!["ownership".into(), "traits".into()],
        };
        assert_eq!(
            mind_map_markdown(&data),
            "# My Watched Videos\n\
             ## [Rust talk (ID: abc)](https://www.youtube.com/watch?v=abc)\n\
             ### Watched: 2024-05-01 10:00:00\n\
             ## [xyz (ID: xyz)](https://www.youtube.com/watch?v=xyz)\n\
             ### Watched: 2024-05-01 10:00:00\n\
             \n# Common Keywords from Notes\n\
             ## ownership\n\
             ## traits\n"
        );
    }

    #[test]
    fn test_mind_map_markdown_without_videos() {
        let data = MindMapData {
            videos: vec![],
            all_notes_keywords: vec!["rust".into()],
        };
        assert!(mind_map_markdown(&data).starts_with("# My Watched Videos\n- No videos watched yet.\n"));
        assert_eq!(
            mind_map_markdown(&MindMapData::default()),
            "# My Watched Videos\n- No videos watched yet.\n"
        );
    }

    #[test]
    fn test_render_mind_map_states() {
        let empty = render_mind_map(&Ok(MindMapData::default()));
        assert!(empty.contains("No data available to display in the mind map"));

        let full = render_mind_map(&Ok(MindMapData {
            videos: vec![video("abc", Some("<script>x</script>Talk"))],
            all_notes_keywords: vec![],
        }));
        assert!(full.contains("<h1>My Watched Videos</h1>"));
        assert!(full.contains(r#"href="https://www.youtube.com/watch?v=abc""#));
        assert!(!full.contains("<script>"));

        let failed = render_mind_map(&Err(PageError::Init(IdentityError::Network(
            NetworkError::Transport("refused".into()),
        ))));
        assert!(failed.contains("message-overlay error"));
        assert!(failed.contains("Please try refreshing."));
    }

    #[test]
    fn test_render_all_notes() {
        assert!(render_all_notes(&Ok(vec![])).contains("You haven't saved any notes yet."));

        let note = Note {
            id: Some(1),
            video_id: "abc".into(),
            content: "<i>remember</i>".into(),
            created_at: at("2024-01-02T03:04:05"),
            updated_at: at("2024-01-03T03:04:05"),
        };
        let html = render_all_notes(&Ok(vec![note]));
        assert!(html.contains("&lt;i&gt;remember&lt;/i&gt;"));
        assert!(html.contains("Created: 2024-01-02 03:04:05 | Updated: 2024-01-03 03:04:05"));
        assert!(html.contains("https://www.youtube.com/watch?v=abc"));
    }

    #[test]
    fn test_render_popup() {
        assert!(render_popup(true).contains("status success"));
        assert!(render_popup(false).contains("Server is offline"));
    }

    async fn identified_backend(server: &MockServer) -> (UserIdentity, BackendClient) {
        Mock::given(method("POST"))
            .and(path("/get_or_create_user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": 4})))
            .mount(server)
            .await;
        let backend = BackendClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let identity = UserIdentity::new(Arc::new(MemoryStore::new()), backend.clone());
        (identity, backend)
    }

    #[tokio::test]
    async fn test_mind_map_falls_back_to_watch_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/4/mind_map_data"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/4/watched_videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 1,
                "video_id": "abc",
                "video_title": "Rust talk",
                "watched_at": "2024-05-01T10:00:00"
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let (identity, backend) = identified_backend(&server).await;
        let data = load_mind_map(&identity, &backend).await.unwrap();
        assert_eq!(data.videos.len(), 1);
        assert!(data.all_notes_keywords.is_empty());
        assert!(mind_map_markdown(&data).contains("## [Rust talk (ID: abc)]"));
    }

    #[tokio::test]
    async fn test_mind_map_prefers_mind_map_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/4/mind_map_data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "videos": [],
                "all_notes_keywords": ["ownership"]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/4/watched_videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let (identity, backend) = identified_backend(&server).await;
        let data = load_mind_map(&identity, &backend).await.unwrap();
        assert_eq!(data.all_notes_keywords, vec!["ownership".to_string()]);
    }

    #[tokio::test]
    async fn test_mind_map_reports_error_when_both_fail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/4/mind_map_data"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/4/watched_videos"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
            .mount(&server)
            .await;

        let (identity, backend) = identified_backend(&server).await;
        let err = load_mind_map(&identity, &backend).await.unwrap_err();
        assert_eq!(err.to_string(), "Error loading mind map data: db down");
    }

    #[tokio::test]
    async fn test_load_all_notes_surfaces_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get_or_create_user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": 4})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/4/notes"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "User not found"})))
            .mount(&server)
            .await;

        let backend = BackendClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let identity = UserIdentity::new(Arc::new(MemoryStore::new()), backend.clone());
        let err = load_all_notes(&identity, &backend).await.unwrap_err();
        assert_eq!(err.to_string(), "Error loading notes: User not found");
    }
}
