//! Per-video note input and list, attached to the summary panel.

use crate::backend::BackendClient;
use crate::error::NoteError;
use crate::models::{NewNote, Note, UserRecord};
use crate::summary::Panel;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum NotesListing {
    NotLoaded,
    Unidentified,
    Loaded(Vec<Note>),
    Failed(String),
}

#[derive(Debug)]
pub struct NotesWidget {
    video_id: String,
    /// Text currently in the note input.
    pub input: String,
    listing: NotesListing,
}

impl NotesWidget {
    pub fn new(video_id: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            input: String::new(),
            listing: NotesListing::NotLoaded,
        }
    }

    /// Attach a fresh widget to `container`, replacing any earlier one.
    pub fn attach<'a>(container: &'a mut Panel, video_id: &str) -> &'a mut NotesWidget {
        container.notes.insert(NotesWidget::new(video_id))
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn listing(&self) -> &NotesListing {
        &self.listing
    }

    pub fn set_listing(&mut self, listing: NotesListing) {
        self.listing = listing;
    }

    pub async fn refresh(&mut self, backend: &BackendClient, user: Option<&UserRecord>) {
        self.listing = Self::load_listing(backend, &self.video_id, user).await;
    }

    /// Notes of `video_id` as the widget should list them.
    pub async fn load_listing(backend: &BackendClient, video_id: &str, user: Option<&UserRecord>) -> NotesListing {
        let Some(user) = user else {
            return NotesListing::Unidentified;
        };

        match backend.notes_for_video(user.user_id, video_id).await {
            Ok(notes) => NotesListing::Loaded(notes),
            Err(e) => {
                error!(error = %e, video_id, "could not load notes");
                NotesListing::Failed(format!("Error loading notes: {}", e.reason()))
            }
        }
    }

    /// Check the current input and build the note to send.
    ///
    /// Empty input is rejected before anything goes over the wire.
    pub fn prepare<'u>(&self, user: Option<&'u UserRecord>) -> Result<(&'u UserRecord, NewNote), NoteError> {
        let content = self.input.trim();
        if content.is_empty() {
            return Err(NoteError::EmptyContent);
        }
        let user = user.ok_or(NoteError::Unidentified)?;

        Ok((
            user,
            NewNote {
                video_id: self.video_id.clone(),
                content: content.to_string(),
            },
        ))
    }

    /// Send a prepared note and return the reloaded listing.
    pub async fn submit(backend: &BackendClient, user: &UserRecord, note: &NewNote) -> Result<NotesListing, NoteError> {
        backend.create_note(user.user_id, note).await?;
        info!(video_id = %note.video_id, user_id = user.user_id, "note saved");

        let listing = Self::load_listing(backend, &note.video_id, Some(user)).await;
        if let Err(e) = backend.log_watched_video(user.user_id, &note.video_id, None).await {
            warn!(error = %e, "could not log watched video");
        }
        Ok(listing)
    }

    /// A note went through: clear the input and show the new listing.
    pub fn complete(&mut self, listing: NotesListing) {
        self.input.clear();
        self.listing = listing;
    }

    /// Save the current input as a note for this video.
    pub async fn save(&mut self, backend: &BackendClient, user: Option<&UserRecord>) -> Result<(), NoteError> {
        let (user, note) = self.prepare(user)?;
        let listing = Self::submit(backend, user, &note).await?;
        self.complete(listing);
        Ok(())
    }
}
