//! Video summary notes - library re-exports for the server binary and tests.
//!
//! The watch-page companion lives in these modules:
//!
//! - `identity`: client id persistence and exchange for a backend user
//! - `summary`: the summary panel and key point parsing
//! - `notes_widget`: per-video note input and list
//! - `navigation`: URL change detection
//! - `session`: one browsing session tying the above together
//! - `host_page`: the page the panel is inserted into
//! - `pages`: all-notes, mind map and status pages
//! - `backend`: HTTP client for the summary backend
//! - `storage`: local key/value persistence

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

pub mod backend;
pub mod error;
pub mod handlers;
pub mod host_page;
pub mod identity;
pub mod models;
pub mod navigation;
pub mod notes_widget;
pub mod pages;
pub mod session;
pub mod storage;
pub mod summary;
pub mod templates;

// ============================================================================
// Configuration
// ============================================================================

pub const BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const BIND_ADDR: &str = "127.0.0.1:3000";
pub const DB_PATH: &str = ".vidnotes_db";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub bind_addr: String,
    pub db_path: PathBuf,
    /// Render the host page and panel with the dark palette.
    pub dark_mode: bool,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: BACKEND_URL.to_string(),
            bind_addr: BIND_ADDR.to_string(),
            db_path: PathBuf::from(DB_PATH),
            dark_mode: false,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    pub identity: Arc<UserIdentity>,
    pub session: SharedSession<StaticPage>,
}

impl AppState {
    /// Open the sled store at `config.db_path` and build the state on it.
    pub fn new(config: Config) -> Result<Self, InitError> {
        let store = SledStore::open(&config.db_path)?;
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: Config, store: Arc<dyn LocalStore>) -> Result<Self, InitError> {
        let backend = BackendClient::new(&config.backend_url, config.request_timeout)?;
        let identity = Arc::new(UserIdentity::new(store, backend.clone()));
        let page = StaticPage::watch_layout().with_dark_mode(config.dark_mode);
        let session = Session::new(
            identity.clone(),
            backend.clone(),
            page,
            InsertionStrategy::default(),
        );
        info!(backend = %backend.base_url(), "application state ready");

        Ok(Self {
            config,
            backend,
            identity,
            session: SharedSession::new(session),
        })
    }
}

// Re-export commonly used types
pub use backend::BackendClient;
pub use error::{
    ClientError, DataError, DomError, IdentityError, InitError, NetworkError, NoteError, PageError,
    StorageError, SummaryError,
};
pub use host_page::{HostPage, InsertionPoint, InsertionStrategy, Placement, StaticPage};
pub use identity::UserIdentity;
pub use models::{
    ClientIdentity, MindMapData, Note, Notice, NoticeKind, SessionState, SummaryLine, SummaryPoint,
    SummaryResult, SummaryView, UserRecord, WatchedVideo,
};
pub use navigation::{watch_url, watch_video_id, Navigation, NavigationWatcher};
pub use notes_widget::{NotesListing, NotesWidget};
pub use pages::mind_map_markdown;
pub use session::{Session, SharedSession, Visit};
pub use storage::{LocalStore, MemoryStore, SledStore};
pub use summary::{parse_summary_points, timestamp_to_seconds, Panel, PanelContent, PanelOutcome, SummaryPanel};
