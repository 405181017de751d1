use std::sync::Arc;

use crate::errors::StoreError;
use crate::store::Store;

use super::api::ApiError;

/// Shared access to the stores from async handlers.
///
/// Every store call does synchronous file I/O, so it is moved to the
/// blocking pool. Writers are already serialized by the per-file lock.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Store>,
}

impl StoreHandle {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Run a closure against the stores on a blocking thread.
    /// All data passed into `f` must be owned (`'static`).
    pub async fn call<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&Store) -> Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let store = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| ApiError::Internal(format!("Store task panicked: {}", e)))?
            .map_err(ApiError::from)
    }

    /// Synchronous access for startup and tests.
    pub fn store(&self) -> &Store {
        &self.inner
    }
}
