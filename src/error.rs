//! Error taxonomy.
//!
//! Leaf errors describe where a failure came from (local storage, the
//! network, a malformed backend payload, the host page). Operation errors
//! wrap them and carry the message shown to the user at the boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage unavailable: {0}")]
    Unavailable(String),

    #[error("stored value is not valid UTF-8 under key `{0}`")]
    Corrupt(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("Server error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl NetworkError {
    /// Text for the user: the backend's own message for a rejected request.
    pub fn reason(&self) -> String {
        match self {
            NetworkError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        NetworkError::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("{0} not found in backend response")]
    MissingField(&'static str),

    #[error("could not decode backend response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum DomError {
    #[error("host page element not found: {0}")]
    ElementNotFound(String),

    #[error("no summary panel is mounted")]
    NoPanel,
}

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Data(#[from] DataError),
}

impl ClientError {
    pub fn reason(&self) -> String {
        match self {
            ClientError::Network(e) => e.reason(),
            ClientError::Data(e) => e.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("could not read user identity: {0}")]
    Storage(#[from] StorageError),

    #[error("user identification failed: {0}")]
    Network(NetworkError),

    #[error("user identification failed: {0}")]
    Data(DataError),
}

impl From<ClientError> for IdentityError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) => IdentityError::Network(e),
            ClientError::Data(e) => IdentityError::Data(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Note content cannot be empty.")]
    EmptyContent,

    #[error("Error: User not identified. Cannot save note.")]
    Unidentified,

    #[error("Error saving note: {}", .0.reason())]
    Network(NetworkError),

    #[error("Error saving note: {0}")]
    Data(DataError),

    #[error("Error: {0}")]
    Dom(#[from] DomError),
}

impl From<ClientError> for NoteError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) => NoteError::Network(e),
            ClientError::Data(e) => NoteError::Data(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("{0}")]
    Network(NetworkError),

    #[error("No summary data received from server")]
    Data(DataError),

    #[error("{0}")]
    Dom(#[from] DomError),

    #[error("Could not identify user: {0}")]
    Identity(#[from] IdentityError),
}

impl From<ClientError> for SummaryError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) => SummaryError::Network(e),
            ClientError::Data(e) => SummaryError::Data(e),
        }
    }
}

/// Failure to fill one of the standalone pages.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Could not initialize the page: {0}. Please try refreshing.")]
    Init(#[from] IdentityError),

    #[error("Error loading {what}: {message}")]
    Load { what: &'static str, message: String },
}

impl PageError {
    /// Load failure that shows the backend's own error text when it sent one.
    pub fn load(what: &'static str, err: ClientError) -> Self {
        PageError::Load {
            what,
            message: err.reason(),
        }
    }
}

/// Startup failures of the application state.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}
