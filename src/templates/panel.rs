//! HTML for the summary panel and the notes widget inside it.

use crate::host_page::InsertionPoint;
use crate::models::{Note, SummaryLine, SummaryView};
use crate::notes_widget::{NotesListing, NotesWidget};
use crate::summary::{timestamp_to_seconds, Panel, PanelContent};

use super::components::html_escape;

/// Where on the watch page the panel ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Right-hand column, next to related videos.
    Secondary,
    /// Under the player.
    Primary,
    Overlay,
}

pub fn panel_column(point: &InsertionPoint) -> Column {
    match point {
        InsertionPoint::FixedOverlay => Column::Overlay,
        InsertionPoint::Anchor { selector, .. } => {
            if selector.contains("secondary") || selector.contains("related") || selector.starts_with("ytd-") {
                Column::Secondary
            } else {
                Column::Primary
            }
        }
    }
}

// ============================================================================
// Panel
// ============================================================================

pub fn render_panel(panel: &Panel, point: &InsertionPoint, dark: bool) -> String {
    let mut classes = vec!["yt-summary-container"];
    if dark {
        classes.push("dark");
    }
    if panel_column(point) == Column::Overlay {
        classes.push("overlay");
    }

    let body = match &panel.content {
        PanelContent::Loading => {
            r#"<div class="yt-summary-loading">Loading summary...</div>"#.to_string()
        }
        PanelContent::Summary(view) => render_summary_view(view, &panel.video_id),
        PanelContent::Error { message } => render_panel_error(message, &panel.video_id),
    };

    let notes = panel.notes.as_ref().map(render_notes_widget).unwrap_or_default();

    format!(
        r#"<div id="yt-summary-panel" class="{}" data-video-id="{}" data-panel="{}">
            <div class="yt-summary-header"><span>Video Summary</span></div>
            <div class="yt-summary-content">{}</div>
            {}
        </div>"#,
        classes.join(" "),
        html_escape(&panel.video_id),
        panel.id,
        body,
        notes
    )
}

pub fn render_summary_view(view: &SummaryView, video_id: &str) -> String {
    match view {
        SummaryView::Empty => {
            r#"<div class="yt-summary-error">Error: Received empty summary</div>"#.to_string()
        }
        SummaryView::Raw { text } => format!(
            r#"<div class="yt-summary-error">No formatted points found. Raw summary:</div>
            <pre class="yt-summary-raw">{}</pre>"#,
            html_escape(text)
        ),
        SummaryView::Points { lines } => lines
            .iter()
            .map(|line| match line {
                SummaryLine::Point(point) => {
                    let seconds = timestamp_to_seconds(&point.timestamp).unwrap_or(0);
                    format!(
                        r#"<div class="yt-summary-point">
                <a class="yt-summary-timestamp" href="/watch?v={}&amp;t={}s" data-timestamp="{}" data-seconds="{}">[{}]</a>
                <div>{}</div>
            </div>"#,
                        urlencoding::encode(video_id),
                        seconds,
                        html_escape(&point.timestamp),
                        seconds,
                        html_escape(&point.timestamp),
                        html_escape(&point.text)
                    )
                }
                SummaryLine::Plain(text) => {
                    format!(r#"<div class="yt-summary-point">{}</div>"#, html_escape(text))
                }
            })
            .collect(),
    }
}

fn render_panel_error(message: &str, video_id: &str) -> String {
    format!(
        r#"<div class="yt-summary-error">
            <p><strong>Summary Error:</strong> {}</p>
            <p>Please check:</p>
            <ol>
                <li>The backend server is running</li>
                <li>The video has captions available</li>
                <li>Your network connection</li>
            </ol>
            <form method="post" action="/watch/retry">
                <input type="hidden" name="video_id" value="{}">
                <button type="submit" class="btn">Retry Summary</button>
            </form>
        </div>"#,
        html_escape(message),
        html_escape(video_id)
    )
}

// ============================================================================
// Notes Widget
// ============================================================================

pub fn render_notes_widget(widget: &NotesWidget) -> String {
    format!(
        r#"<div class="yt-notes-section">
            <h3>My Notes for this Video</h3>
            <form method="post" action="/watch/notes">
                <input type="hidden" name="video_id" value="{}">
                <textarea name="content" placeholder="Type your note here...">{}</textarea>
                <button type="submit" class="btn">Save Note</button>
            </form>
            <div id="video-notes-display">{}</div>
        </div>"#,
        html_escape(widget.video_id()),
        html_escape(&widget.input),
        render_listing(widget.listing())
    )
}

fn render_listing(listing: &NotesListing) -> String {
    match listing {
        NotesListing::NotLoaded => r#"<p class="muted">Loading notes...</p>"#.to_string(),
        NotesListing::Unidentified => {
            r#"<p class="error-text">User not identified. Notes cannot be loaded or saved.</p>"#.to_string()
        }
        NotesListing::Failed(message) => {
            format!(r#"<p class="error-text">{}</p>"#, html_escape(message))
        }
        NotesListing::Loaded(notes) if notes.is_empty() => {
            r#"<p class="muted">No notes for this video yet.</p>"#.to_string()
        }
        NotesListing::Loaded(notes) => notes.iter().map(render_note).collect(),
    }
}

fn render_note(note: &Note) -> String {
    format!(
        r#"<div class="yt-individual-note">{}</div>"#,
        html_escape(&note.content)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host_page::Placement;
    use crate::models::SummaryPoint;

    fn sidebar() -> InsertionPoint {
        InsertionPoint::anchor("#secondary-inner", Placement::Prepend)
    }

    #[test]
    fn test_panel_column() {
        assert_eq!(panel_column(&sidebar()), Column::Secondary);
        assert_eq!(
            panel_column(&InsertionPoint::anchor("ytd-ad-slot-renderer", Placement::Before)),
            Column::Secondary
        );
        assert_eq!(
            panel_column(&InsertionPoint::anchor("#comments", Placement::Before)),
            Column::Primary
        );
        assert_eq!(panel_column(&InsertionPoint::FixedOverlay), Column::Overlay);
    }

    #[test]
    fn test_points_link_to_seconds() {
        let view = SummaryView::Points {
            lines: vec![
                SummaryLine::Plain("Intro".to_string()),
                SummaryLine::Point(SummaryPoint {
                    timestamp: "02:40".to_string(),
                    text: "Borrowing <rules>".to_string(),
                }),
            ],
        };
        let html = render_summary_view(&view, "abc");
        assert!(html.contains(r#"data-seconds="160""#));
        assert!(html.contains("/watch?v=abc&amp;t=160s"));
        assert!(html.contains("Borrowing &lt;rules&gt;"));
        assert!(html.find("Intro").unwrap() < html.find("[02:40]").unwrap());
    }

    #[test]
    fn test_raw_and_empty_views() {
        let raw = render_summary_view(&SummaryView::Raw { text: "plain".into() }, "abc");
        assert!(raw.contains("No formatted points found. Raw summary:"));
        assert!(raw.contains("<pre class=\"yt-summary-raw\">plain</pre>"));
        assert!(render_summary_view(&SummaryView::Empty, "abc").contains("Received empty summary"));
    }

    #[test]
    fn test_error_panel_offers_retry() {
        let panel = Panel::new(3, "abc", PanelContent::Error { message: "Server error: 500 - x".into() });
        let html = render_panel(&panel, &InsertionPoint::FixedOverlay, true);
        assert!(html.contains("Retry Summary"));
        assert!(html.contains("yt-summary-container dark overlay"));
        assert!(!html.contains("yt-notes-section"));
    }

    #[test]
    fn test_notes_widget_listing() {
        let mut panel = Panel::new(1, "abc", PanelContent::Loading);
        NotesWidget::attach(&mut panel, "abc");
        let html = render_panel(&panel, &sidebar(), false);
        assert!(html.contains("My Notes for this Video"));
        assert!(html.contains("Loading notes..."));
    }
}
