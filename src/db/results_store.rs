use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::ResultBundle,
};

/// Write-once, read-many storage for submission results
#[async_trait::async_trait]
pub trait ResultsStore: Send + Sync {
    /// Stores a bundle under its own `results_id`; storing the same id twice is an error
    async fn store(&self, bundle: ResultBundle) -> AppResult<()>;

    /// Returns the bundle, or `None` if the id was never stored
    async fn fetch(&self, results_id: &Uuid) -> AppResult<Option<ResultBundle>>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Process-local results store
///
/// No expiry and no eviction: bundles live until the process exits and are not shared
/// between instances.
#[derive(Clone, Default)]
pub struct InMemoryResultsStore {
    bundles: Arc<RwLock<HashMap<Uuid, Arc<ResultBundle>>>>,
}

impl InMemoryResultsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.bundles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bundles.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ResultsStore for InMemoryResultsStore {
    async fn store(&self, bundle: ResultBundle) -> AppResult<()> {
        let mut bundles = self.bundles.write().await;
        if bundles.contains_key(&bundle.results_id) {
            return Err(AppError::Internal(format!(
                "Results {} already stored",
                bundle.results_id
            )));
        }

        tracing::debug!(results_id = %bundle.results_id, stored = bundles.len() + 1, "Results stored");
        bundles.insert(bundle.results_id, Arc::new(bundle));
        Ok(())
    }

    async fn fetch(&self, results_id: &Uuid) -> AppResult<Option<ResultBundle>> {
        let bundles = self.bundles.read().await;
        Ok(bundles.get(results_id).map(|bundle| bundle.as_ref().clone()))
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}
