//! The summary panel.
//!
//! A panel is mounted in a loading state, the backend is asked for the
//! summary, and the result is applied to the panel only if that same panel
//! is still mounted. Results for a panel that navigation already replaced
//! are dropped on the floor.

use crate::backend::BackendClient;
use crate::error::{DomError, SummaryError};
use crate::host_page::{HostPage, InsertionPoint, InsertionStrategy};
use crate::models::{SummaryLine, SummaryPoint, SummaryResult, SummaryView};
use crate::notes_widget::NotesWidget;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

pub type PanelId = u64;

// ============================================================================
// Parsing
// ============================================================================

/// Line formats the backend uses for key points, tried in order.
fn point_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"Timestamp: \[(\d{2}:\d{2})\] - Key Point: (.*)").unwrap(),
            Regex::new(r"^(\d{2}:\d{2}) - Key Point: (.*)").unwrap(),
            Regex::new(r"\[(\d{2}:\d{2})\] - (.*)").unwrap(),
        ]
    })
}

fn match_point(line: &str) -> Option<SummaryPoint> {
    point_patterns().iter().find_map(|re| {
        let caps = re.captures(line)?;
        Some(SummaryPoint {
            timestamp: caps[1].to_string(),
            text: caps[2].trim_end().to_string(),
        })
    })
}

/// Split summary text into timestamped points.
///
/// Blank lines are skipped. Lines that match no format are kept as plain
/// entries in their original position. If not a single line matched, the
/// whole text comes back as `Raw`.
pub fn parse_summary_points(summary: &str) -> SummaryView {
    if summary.trim().is_empty() {
        return SummaryView::Empty;
    }

    let mut lines = Vec::new();
    let mut matched = false;
    for line in summary.lines().filter(|l| !l.trim().is_empty()) {
        match match_point(line) {
            Some(point) => {
                matched = true;
                lines.push(SummaryLine::Point(point));
            }
            None => lines.push(SummaryLine::Plain(line.trim().to_string())),
        }
    }

    if matched {
        SummaryView::Points { lines }
    } else {
        warn!("no timestamp formatting matches found in summary");
        SummaryView::Raw {
            text: summary.to_string(),
        }
    }
}

/// `MM:SS` (or `HH:MM:SS`) to seconds.
pub fn timestamp_to_seconds(timestamp: &str) -> Option<u32> {
    let mut total: u32 = 0;
    for part in timestamp.split(':') {
        let value: u32 = part.trim().parse().ok()?;
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}

// ============================================================================
// Panel
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Loading,
    Summary(SummaryView),
    /// Inline error with a retry control.
    Error { message: String },
}

#[derive(Debug)]
pub struct Panel {
    pub id: PanelId,
    pub video_id: String,
    pub content: PanelContent,
    pub notes: Option<NotesWidget>,
}

impl Panel {
    pub fn new(id: PanelId, video_id: &str, content: PanelContent) -> Self {
        Self {
            id,
            video_id: video_id.to_string(),
            content,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelOutcome {
    Shown,
    Failed,
    /// The panel was removed or replaced before the result arrived.
    Discarded,
}

pub struct SummaryPanel {
    strategy: InsertionStrategy,
    last_id: PanelId,
}

impl SummaryPanel {
    pub fn new(strategy: InsertionStrategy) -> Self {
        Self {
            strategy,
            last_id: 0,
        }
    }

    /// Remove any panel on the page and insert a fresh one in the loading
    /// state.
    pub fn mount<P: HostPage + ?Sized>(
        &mut self,
        page: &mut P,
        video_id: &str,
    ) -> Result<PanelId, DomError> {
        if let Some(old) = page.remove_panel() {
            debug!(panel = old.id, "removed previous summary panel");
        }

        self.last_id += 1;
        let id = self.last_id;
        let point = self.strategy.find(&*page);
        let panel = Panel::new(id, video_id, PanelContent::Loading);

        match page.insert_panel(point.clone(), panel) {
            Ok(()) => {}
            Err(e) if point != InsertionPoint::FixedOverlay => {
                warn!(error = %e, "insertion point vanished, using fixed overlay");
                page.insert_panel(
                    InsertionPoint::FixedOverlay,
                    Panel::new(id, video_id, PanelContent::Loading),
                )?;
            }
            Err(e) => return Err(e),
        }

        info!(panel = id, video_id, "summary panel mounted");
        Ok(id)
    }

    pub async fn fetch(backend: &BackendClient, video_id: &str) -> Result<SummaryResult, SummaryError> {
        debug!(video_id, "fetching summary");
        backend.summarize(video_id).await.map_err(SummaryError::from)
    }

    /// Write a fetch result into panel `id` if it is still the mounted one.
    pub fn apply<P: HostPage + ?Sized>(
        page: &mut P,
        id: PanelId,
        result: Result<SummaryResult, SummaryError>,
    ) -> PanelOutcome {
        let panel = match page.panel_mut() {
            Some(panel) if panel.id == id => panel,
            _ => {
                debug!(panel = id, "discarding result for a replaced panel");
                return PanelOutcome::Discarded;
            }
        };

        match result {
            Ok(result) => {
                panel.content = PanelContent::Summary(parse_summary_points(&result.summary));
                PanelOutcome::Shown
            }
            Err(e) => {
                error!(error = %e, video_id = %panel.video_id, "summary failed");
                panel.content = PanelContent::Error {
                    message: e.to_string(),
                };
                PanelOutcome::Failed
            }
        }
    }

    /// Show a failure that happened before a summary could be requested.
    pub fn fail<P: HostPage + ?Sized>(page: &mut P, id: PanelId, err: SummaryError) -> PanelOutcome {
        Self::apply(page, id, Err(err))
    }

    pub async fn render<P: HostPage + ?Sized>(
        &mut self,
        page: &mut P,
        backend: &BackendClient,
        video_id: &str,
    ) -> Result<PanelOutcome, DomError> {
        let id = self.mount(page, video_id)?;
        let result = Self::fetch(backend, video_id).await;
        Ok(Self::apply(page, id, result))
    }
}
