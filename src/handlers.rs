//! HTTP route handlers for the companion pages.
//!
//! The watch page stands in for the host site: each request feeds the
//! requested URL to the shared session, then renders the page with whatever
//! the session mounted on it.

use crate::host_page::HostPage;
use crate::models::{Notice, SummaryView};
use crate::navigation::{watch_url, watch_video_id, Navigation};
use crate::pages::{load_all_notes, load_mind_map, render_all_notes, render_mind_map, render_popup};
use crate::summary::parse_summary_points;
use crate::templates::{base_html, html_escape, panel_column, render_notices, render_panel, Column};
use crate::{AppState, NetworkError, SummaryError};
use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

const HOME_URL: &str = "https://www.youtube.com/";

// ============================================================================
// Status
// ============================================================================

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let online = state.backend.ping().await;
    let content = format!(
        r#"{}
        <form class="open-video" action="/watch" method="get">
            <input type="text" name="url" placeholder="Paste a video URL...">
            <button type="submit" class="btn">Open</button>
        </form>"#,
        render_popup(online)
    );
    Html(base_html("Video Summary Notes", &content, Some(online), state.config.dark_mode))
}

// ============================================================================
// Watch Page
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct WatchQuery {
    pub v: Option<String>,
    /// Player start offset, `160s` or `160`.
    pub t: Option<String>,
    /// A full watch URL pasted into the open form.
    pub url: Option<String>,
}

pub async fn watch(State(state): State<Arc<AppState>>, Query(query): Query<WatchQuery>) -> Response {
    if let Some(url) = query.url.as_deref().filter(|u| !u.trim().is_empty()) {
        return match watch_video_id(url.trim()) {
            Some(video_id) => {
                Redirect::to(&format!("/watch?v={}", urlencoding::encode(&video_id))).into_response()
            }
            None => {
                state
                    .session
                    .lock()
                    .await
                    .page_mut()
                    .notify(Notice::alert(format!("Not a watch page URL: {}", url)));
                Redirect::to("/watch").into_response()
            }
        };
    }

    let Some(video_id) = query.v.filter(|v| !v.is_empty()) else {
        state.session.navigate(HOME_URL).await;
        let notices = state.session.lock().await.page_mut().take_notices();
        let content = format!(
            r#"{}<p class="muted">Open a video from the status page to see its summary.</p>"#,
            render_notices(&notices)
        );
        return Html(base_html("Watch", &content, None, state.config.dark_mode)).into_response();
    };

    let visit = state.session.navigate(&watch_url(&video_id)).await;
    if visit.navigation == Navigation::Unchanged {
        info!(video_id = %video_id, "same video requested, keeping panel");
    }

    let mut session = state.session.lock().await;
    let page = session.page();
    let dark = page.is_dark_mode();
    let panel_html = match (page.panel(), page.insertion_point()) {
        (Some(panel), Some(point)) if panel.video_id == video_id => {
            Some((render_panel(panel, point, dark), panel_column(point)))
        }
        _ => None,
    };
    let notices = session.page_mut().take_notices();
    drop(session);

    let start = query.t.as_deref().and_then(parse_start).unwrap_or(0);
    let content = render_watch_page(&video_id, start, panel_html, &render_notices(&notices));
    Html(base_html("Watch", &content, None, dark)).into_response()
}

fn render_watch_page(
    video_id: &str,
    start: u32,
    panel: Option<(String, Column)>,
    notices: &str,
) -> String {
    let (mut primary, mut secondary, mut overlay) = (String::new(), String::new(), String::new());
    if let Some((html, column)) = panel {
        match column {
            Column::Primary => primary = html,
            Column::Secondary => secondary = html,
            Column::Overlay => overlay = html,
        }
    }

    format!(
        r#"{notices}
        <div class="watch">
            <div id="primary">
                <div class="player">
                    <iframe id="player" src="https://www.youtube.com/embed/{embed}?start={start}" allow="autoplay; encrypted-media" allowfullscreen></iframe>
                </div>
                <div id="below">{primary}</div>
            </div>
            <div id="secondary">
                {secondary}
                <p class="related-placeholder">Related videos for {video}</p>
            </div>
        </div>
        {overlay}"#,
        notices = notices,
        embed = urlencoding::encode(video_id),
        start = start,
        primary = primary,
        secondary = secondary,
        video = html_escape(video_id),
        overlay = overlay,
    )
}

fn parse_start(t: &str) -> Option<u32> {
    t.trim_end_matches('s').parse().ok()
}

#[derive(Debug, Deserialize)]
pub struct RetryForm {
    pub video_id: String,
}

pub async fn retry_summary(State(state): State<Arc<AppState>>, Form(form): Form<RetryForm>) -> Redirect {
    if let Err(e) = state.session.retry_summary(&form.video_id).await {
        warn!(error = %e, video_id = %form.video_id, "retry requested without a matching panel");
        state
            .session
            .lock()
            .await
            .page_mut()
            .notify(Notice::alert(format!("Summary Error: {}", e)));
    }
    Redirect::to(&format!("/watch?v={}", urlencoding::encode(&form.video_id)))
}

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    pub video_id: String,
    pub content: String,
}

pub async fn save_note(State(state): State<Arc<AppState>>, Form(form): Form<NoteForm>) -> Redirect {
    // Outcome is reported through the page notices.
    let _ = state.session.save_note(&form.video_id, &form.content).await;
    Redirect::to(&format!("/watch?v={}", urlencoding::encode(&form.video_id)))
}

// ============================================================================
// Standalone Pages
// ============================================================================

pub async fn all_notes(State(state): State<Arc<AppState>>) -> Html<String> {
    let notes = load_all_notes(&state.identity, &state.backend).await;
    Html(base_html("All My Notes", &render_all_notes(&notes), None, state.config.dark_mode))
}

pub async fn mind_map(State(state): State<Arc<AppState>>) -> Html<String> {
    let data = load_mind_map(&state.identity, &state.backend).await;
    Html(base_html("Mind Map", &render_mind_map(&data), None, state.config.dark_mode))
}

// ============================================================================
// JSON API
// ============================================================================

pub struct ApiError(SummaryError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SummaryError::Identity(_) => StatusCode::SERVICE_UNAVAILABLE,
            SummaryError::Network(NetworkError::Status { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Parsed summary points for a video. The user is identified first.
pub async fn api_summary(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<SummaryView>, ApiError> {
    state
        .identity
        .resolve()
        .await
        .map_err(|e| ApiError(SummaryError::from(e)))?;
    let result = state
        .backend
        .summarize(&video_id)
        .await
        .map_err(|e| ApiError(SummaryError::from(e)))?;
    Ok(Json(parse_summary_points(&result.summary)))
}
