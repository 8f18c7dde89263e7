use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::downstream::DownstreamInvoker;
use crate::error::HandleError;
use crate::event::counting_key;
use crate::store::StoreClient;

/// Counts every invocation by path, then forwards it unchanged.
///
/// The count is written before the downstream call, so a hit is recorded even when
/// the downstream function later fails or times out. No step is retried.
pub struct CountingProxy<S, D> {
    store: S,
    downstream: D,
}

impl<S, D> CountingProxy<S, D>
where
    S: StoreClient,
    D: DownstreamInvoker,
{
    pub fn new(store: S, downstream: D) -> Self {
        Self { store, downstream }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn handle(&self, event: Value) -> Result<Value, HandleError> {
        debug!(%event, "request");

        let path = counting_key(&event).map_err(|e| {
            warn!("{}", e);
            e
        })?;

        let hits = self.store.increment(path).await.map_err(|e| {
            error!(path, error = %e, "hit not recorded");
            e
        })?;
        info!(path, hits, "hit recorded");

        let result = self.downstream.invoke(&event).await.map_err(|e| {
            error!(path, error = %e, error_type = ?e.error_type, "downstream failed");
            e
        })?;

        Ok(result)
    }
}
