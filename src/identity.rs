//! User identification.
//!
//! A device keeps one locally generated `ClientIdentity` in its store and
//! trades it with the backend for the durable `UserRecord`. The record is
//! cached for the life of the `UserIdentity`, so repeated calls never
//! generate or exchange a second time.

use crate::backend::BackendClient;
use crate::error::IdentityError;
use crate::models::{ClientIdentity, UserRecord};
use crate::storage::{LocalStore, CLIENT_ID_KEY};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

pub struct UserIdentity {
    store: Arc<dyn LocalStore>,
    backend: BackendClient,
    resolved: OnceCell<UserRecord>,
}

impl UserIdentity {
    pub fn new(store: Arc<dyn LocalStore>, backend: BackendClient) -> Self {
        Self {
            store,
            backend,
            resolved: OnceCell::new(),
        }
    }

    /// Resolve the current user, generating and persisting a client identity
    /// on first use. A failure leaves nothing cached.
    pub async fn resolve(&self) -> Result<UserRecord, IdentityError> {
        self.resolved
            .get_or_try_init(|| self.exchange())
            .await
            .cloned()
    }

    /// The record, if a previous `resolve` succeeded.
    pub fn current(&self) -> Option<&UserRecord> {
        self.resolved.get()
    }

    async fn exchange(&self) -> Result<UserRecord, IdentityError> {
        let client_id = self.client_identity()?;
        let user_id = self.backend.get_or_create_user(&client_id).await.map_err(|e| {
            error!(error = %e, "get_or_create_user failed");
            IdentityError::from(e)
        })?;
        info!(client_id = %client_id, user_id, "user identified");
        Ok(UserRecord { user_id, client_id })
    }

    fn client_identity(&self) -> Result<ClientIdentity, IdentityError> {
        if let Some(stored) = self.store.get(CLIENT_ID_KEY)? {
            return Ok(ClientIdentity::from(stored));
        }

        let generated = ClientIdentity::generate();
        info!(client_id = %generated, "generated new client identity");
        // The in-memory id still identifies this session if the write fails.
        if let Err(e) = self.store.set(CLIENT_ID_KEY, generated.as_str()) {
            warn!(error = %e, "could not persist client identity");
        }
        Ok(generated)
    }
}
