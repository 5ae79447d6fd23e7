use std::sync::Arc;

use crate::{
    auth::{AuthConfig, AuthProvider, MemoryAuth},
    store::{DocumentStore, MemoryStore},
};

pub type AuthClient = Arc<dyn AuthProvider>;

pub type StoreClient = Arc<dyn DocumentStore>;

/// Handles to the two backing collaborators.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthClient,
    pub store: StoreClient,
}

impl AppState {
    pub fn new(auth: AuthClient, store: StoreClient) -> Self {
        Self { auth, store }
    }

    /// Fully in-process state: memory auth plus memory store.
    pub fn in_memory(config: AuthConfig) -> Self {
        Self {
            auth: Arc::new(MemoryAuth::new(config)),
            store: Arc::new(MemoryStore::new()),
        }
    }
}
