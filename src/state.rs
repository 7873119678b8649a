//! Shared application state handed to every handler.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::routes::auth::{AdminAuthenticator, AdminCredentials, StaticTokenAuthenticator};
use crate::store::MemStorage;
use crate::uploads::{BlobStore, DiskBlobStore};

pub type SharedStore = Arc<RwLock<MemStorage>>;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub auth: Arc<dyn AdminAuthenticator>,
    pub credentials: Arc<AdminCredentials>,
    pub blobs: Arc<dyn BlobStore>,
    pub export_dir: PathBuf,
}

impl AppState {
    /// Build the state described by `config`. Hashes a plain-text admin
    /// password, which is slow, so call this once at startup.
    pub fn from_config(config: &AppConfig) -> Result<Self, bcrypt::BcryptError> {
        let store = if config.seed_data {
            MemStorage::with_seed_data()
        } else {
            MemStorage::new()
        };
        let credentials = AdminCredentials::from_config(config)?;

        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            auth: Arc::new(StaticTokenAuthenticator::new(config.admin_token.clone())),
            credentials: Arc::new(credentials),
            blobs: Arc::new(DiskBlobStore::new(config.upload_dir.clone())),
            export_dir: config.export_dir.clone(),
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("export_dir", &self.export_dir)
            .finish_non_exhaustive()
    }
}
