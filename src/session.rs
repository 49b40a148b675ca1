//! Session context.
//!
//! Owns everything one browsing session needs: the identity, the backend
//! client, the host page and the navigation watcher. Each navigation runs
//! identify → summary → notes in sequence, and nothing is sent to the
//! summary or notes endpoints until identification has succeeded.
//!
//! Work is split into page steps (mount, apply, list) and network steps
//! (identify, fetch, save). `SharedSession` only holds its lock for the page
//! steps, so a slow summary never blocks the next navigation; its result is
//! then discarded because its panel is gone.

use crate::backend::BackendClient;
use crate::error::{DomError, NoteError, SummaryError};
use crate::host_page::{HostPage, InsertionStrategy};
use crate::identity::UserIdentity;
use crate::models::{NewNote, Notice, SessionState, SummaryResult, UserRecord};
use crate::navigation::{Navigation, NavigationWatcher};
use crate::notes_widget::{NotesListing, NotesWidget};
use crate::summary::{PanelId, PanelOutcome, SummaryPanel};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// What a navigation led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub navigation: Navigation,
    /// Set when a summary panel was mounted for this navigation.
    pub outcome: Option<PanelOutcome>,
}

// ============================================================================
// Network Steps
// ============================================================================

enum Step {
    Done(PanelOutcome),
    Summary(SummaryJob),
}

struct SummaryJob {
    panel_id: PanelId,
    video_id: String,
    identity: Arc<UserIdentity>,
    backend: BackendClient,
}

struct FetchedSummary {
    panel_id: PanelId,
    result: Result<(UserRecord, SummaryResult), SummaryError>,
}

impl SummaryJob {
    async fn run(self) -> FetchedSummary {
        let result = match self.identity.resolve().await {
            Ok(user) => SummaryPanel::fetch(&self.backend, &self.video_id)
                .await
                .map(|summary| (user, summary)),
            Err(e) => Err(SummaryError::from(e)),
        };
        FetchedSummary {
            panel_id: self.panel_id,
            result,
        }
    }
}

struct NotesJob {
    panel_id: PanelId,
    video_id: String,
    user: UserRecord,
    backend: BackendClient,
}

struct FetchedNotes {
    panel_id: PanelId,
    listing: NotesListing,
}

impl NotesJob {
    async fn run(self) -> FetchedNotes {
        let listing = NotesWidget::load_listing(&self.backend, &self.video_id, Some(&self.user)).await;
        if let Err(e) = self
            .backend
            .log_watched_video(self.user.user_id, &self.video_id, None)
            .await
        {
            warn!(error = %e, "could not log watched video");
        }
        FetchedNotes {
            panel_id: self.panel_id,
            listing,
        }
    }
}

struct SaveJob {
    panel_id: PanelId,
    user: UserRecord,
    note: NewNote,
    backend: BackendClient,
}

struct SavedNote {
    panel_id: PanelId,
    result: Result<NotesListing, NoteError>,
}

impl SaveJob {
    async fn run(self) -> SavedNote {
        SavedNote {
            panel_id: self.panel_id,
            result: NotesWidget::submit(&self.backend, &self.user, &self.note).await,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

pub struct Session<P: HostPage> {
    identity: Arc<UserIdentity>,
    backend: BackendClient,
    page: P,
    watcher: NavigationWatcher,
    summary: SummaryPanel,
    state: SessionState,
}

impl<P: HostPage> Session<P> {
    pub fn new(
        identity: Arc<UserIdentity>,
        backend: BackendClient,
        page: P,
        strategy: InsertionStrategy,
    ) -> Self {
        Self {
            identity,
            backend,
            page,
            watcher: NavigationWatcher::new(),
            summary: SummaryPanel::new(strategy),
            state: SessionState::Unidentified,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.identity.current()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.watcher.last_url()
    }

    /// Feed an observed URL to the watcher and react to the change.
    pub async fn navigate(&mut self, url: &str) -> Visit {
        let (navigation, step) = self.begin_navigation(url);
        let outcome = match step {
            Some(step) => Some(self.drive(step).await),
            None => None,
        };
        Visit { navigation, outcome }
    }

    /// Re-run the summary of `video_id`, which must own the mounted panel.
    pub async fn retry_summary(&mut self, video_id: &str) -> Result<PanelOutcome, DomError> {
        let step = self.begin_retry(video_id)?;
        Ok(self.drive(step).await)
    }

    /// Save `content` through the notes widget of `video_id`'s panel.
    /// Failures are also raised as alerts on the page.
    pub async fn save_note(&mut self, video_id: &str, content: &str) -> Result<(), NoteError> {
        let job = self.begin_save(video_id, content)?;
        let saved = job.run().await;
        self.finish_save(saved)
    }

    async fn drive(&mut self, step: Step) -> PanelOutcome {
        let job = match step {
            Step::Done(outcome) => return outcome,
            Step::Summary(job) => job,
        };
        let fetched = job.run().await;
        let (outcome, notes) = self.finish_summary(fetched);
        if let Some(notes) = notes {
            let fetched = notes.run().await;
            self.finish_notes(fetched);
        }
        outcome
    }

    // ------------------------------------------------------------------------
    // Page steps
    // ------------------------------------------------------------------------

    fn begin_navigation(&mut self, url: &str) -> (Navigation, Option<Step>) {
        let navigation = self.watcher.observe(url);
        let step = match &navigation {
            Navigation::Unchanged => None,
            Navigation::Other => {
                if let Some(old) = self.page.remove_panel() {
                    debug!(panel = old.id, "left watch page, panel removed");
                }
                self.reset_state();
                None
            }
            Navigation::Watch { video_id } => {
                let video_id = video_id.clone();
                Some(self.begin_summary(&video_id))
            }
        };
        (navigation, step)
    }

    fn begin_retry(&mut self, video_id: &str) -> Result<Step, DomError> {
        let mounted = self.page.panel().map(|p| p.video_id.clone());
        match mounted.as_deref() {
            None => Err(DomError::NoPanel),
            Some(mounted) if mounted != video_id => Err(DomError::ElementNotFound(format!(
                "summary panel for video {}",
                video_id
            ))),
            Some(_) => {
                info!(video_id, "retrying summary");
                Ok(self.begin_summary(video_id))
            }
        }
    }

    fn begin_summary(&mut self, video_id: &str) -> Step {
        let panel_id = match self.summary.mount(&mut self.page, video_id) {
            Ok(id) => id,
            Err(e) => {
                self.page.notify(Notice::error(format!("Summary Error: {}", e)));
                self.state = SessionState::SummaryError;
                return Step::Done(PanelOutcome::Failed);
            }
        };

        self.state = if self.identity.current().is_some() {
            SessionState::SummaryLoading
        } else {
            SessionState::Identifying
        };
        Step::Summary(SummaryJob {
            panel_id,
            video_id: video_id.to_string(),
            identity: self.identity.clone(),
            backend: self.backend.clone(),
        })
    }

    fn finish_summary(&mut self, fetched: FetchedSummary) -> (PanelOutcome, Option<NotesJob>) {
        let panel_id = fetched.panel_id;
        let (user, summary) = match fetched.result {
            Ok(found) => found,
            Err(err) => {
                let identity_failure = match &err {
                    SummaryError::Identity(e) => Some(e.to_string()),
                    _ => None,
                };
                let outcome = SummaryPanel::fail(&mut self.page, panel_id, err);
                if outcome == PanelOutcome::Discarded {
                    return (outcome, None);
                }
                match identity_failure {
                    Some(reason) => {
                        self.state = SessionState::IdentityFailed;
                        self.page.notify(Notice::error(format!(
                            "Could not identify user. Notes are unavailable. Error: {}",
                            reason
                        )));
                    }
                    None => self.state = SessionState::SummaryError,
                }
                return (outcome, None);
            }
        };

        let outcome = SummaryPanel::apply(&mut self.page, panel_id, Ok(summary));
        if outcome != PanelOutcome::Shown {
            return (outcome, None);
        }

        self.state = SessionState::SummaryShown;
        let panel = match self.page.panel_mut() {
            Some(panel) => panel,
            None => return (outcome, None),
        };
        let video_id = panel.video_id.clone();
        NotesWidget::attach(panel, &video_id);
        let notes = NotesJob {
            panel_id,
            video_id,
            user,
            backend: self.backend.clone(),
        };
        (outcome, Some(notes))
    }

    fn finish_notes(&mut self, fetched: FetchedNotes) {
        match self.widget_for(fetched.panel_id) {
            Some(widget) => widget.set_listing(fetched.listing),
            None => debug!(panel = fetched.panel_id, "discarding notes for a replaced panel"),
        }
    }

    fn begin_save(&mut self, video_id: &str, content: &str) -> Result<SaveJob, NoteError> {
        let result = self.prepare_save(video_id, content);
        if let Err(e) = &result {
            self.page.notify(Notice::alert(e.to_string()));
        }
        result
    }

    fn prepare_save(&mut self, video_id: &str, content: &str) -> Result<SaveJob, NoteError> {
        let user = self.identity.current().cloned();
        let missing = || DomError::ElementNotFound(format!("notes widget for video {}", video_id));

        let panel = self
            .page
            .panel_mut()
            .filter(|p| p.video_id == video_id)
            .ok_or_else(missing)?;
        let panel_id = panel.id;
        let widget = panel.notes.as_mut().ok_or_else(missing)?;

        widget.input = content.to_string();
        let (user, note) = widget.prepare(user.as_ref())?;
        Ok(SaveJob {
            panel_id,
            user: user.clone(),
            note,
            backend: self.backend.clone(),
        })
    }

    fn finish_save(&mut self, saved: SavedNote) -> Result<(), NoteError> {
        match saved.result {
            Ok(listing) => {
                if let Some(widget) = self.widget_for(saved.panel_id) {
                    widget.complete(listing);
                }
                self.page.notify(Notice::success("Note saved."));
                Ok(())
            }
            Err(e) => {
                self.page.notify(Notice::alert(e.to_string()));
                Err(e)
            }
        }
    }

    fn widget_for(&mut self, panel_id: PanelId) -> Option<&mut NotesWidget> {
        self.page
            .panel_mut()
            .filter(|p| p.id == panel_id)
            .and_then(|p| p.notes.as_mut())
    }

    fn reset_state(&mut self) {
        self.state = if self.identity.current().is_some() {
            SessionState::Identified
        } else {
            SessionState::Unidentified
        };
    }
}

// ============================================================================
// Shared Session
// ============================================================================

/// A session shared between request handlers.
///
/// The lock is released while identification, summaries and notes are in
/// flight, and retaken to write their results.
pub struct SharedSession<P: HostPage> {
    inner: Mutex<Session<P>>,
}

impl<P: HostPage> SharedSession<P> {
    pub fn new(session: Session<P>) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, Session<P>> {
        self.inner.lock().await
    }

    pub async fn navigate(&self, url: &str) -> Visit {
        let (navigation, step) = self.lock().await.begin_navigation(url);
        let outcome = match step {
            Some(step) => Some(self.drive(step).await),
            None => None,
        };
        Visit { navigation, outcome }
    }

    pub async fn retry_summary(&self, video_id: &str) -> Result<PanelOutcome, DomError> {
        let step = self.lock().await.begin_retry(video_id)?;
        Ok(self.drive(step).await)
    }

    pub async fn save_note(&self, video_id: &str, content: &str) -> Result<(), NoteError> {
        let job = self.lock().await.begin_save(video_id, content)?;
        let saved = job.run().await;
        self.lock().await.finish_save(saved)
    }

    async fn drive(&self, step: Step) -> PanelOutcome {
        let job = match step {
            Step::Done(outcome) => return outcome,
            Step::Summary(job) => job,
        };
        let fetched = job.run().await;
        let (outcome, notes) = self.lock().await.finish_summary(fetched);
        if let Some(notes) = notes {
            let fetched = notes.run().await;
            self.lock().await.finish_notes(fetched);
        }
        outcome
    }
}
