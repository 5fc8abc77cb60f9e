//! Publish-impact activity log
//!
//! An append-only log of [`PublishImpactRecord`]s keyed by publish
//! identity (user, project, target URL). The verification pipeline
//! appends through [`ActivityRecorder`], which logs and swallows write
//! failures: verification having run matters more than it having been
//! recorded. Reads are a caller-facing query and fail loudly.
//!
//! Two stores are provided: [`MemoryActivityStore`] for embedding and
//! tests, and [`SqliteActivityStore`] for durable persistence.

mod error;
mod memory;
mod store;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::{ActivityKey, PublishImpactRecord};

pub use error::{ActivityError, ActivityResult};
pub use memory::MemoryActivityStore;
pub use store::SqliteActivityStore;

/// Append-only persistence for publish-impact records
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Append one record under the given key
    async fn record(&self, key: &ActivityKey, record: &PublishImpactRecord) -> Result<()>;

    /// Read back up to `limit` records for the key, newest first
    async fn query(&self, key: &ActivityKey, limit: usize) -> Result<Vec<PublishImpactRecord>>;
}

/// Front-end over an [`ActivityStore`] with the pipeline's failure
/// semantics baked in
#[derive(Clone)]
pub struct ActivityRecorder {
    store: Arc<dyn ActivityStore>,
}

impl ActivityRecorder {
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// Append a record, logging and swallowing any store failure
    pub async fn append(&self, key: &ActivityKey, record: &PublishImpactRecord) {
        match self.store.record(key, record).await {
            Ok(()) => debug!(url = %key.target_url, "publish impact recorded"),
            Err(e) => warn!(url = %key.target_url, "failed to record publish impact: {e:#}"),
        }
    }

    /// Read back recent records for the reporting view, newest first
    pub async fn recent(
        &self,
        key: &ActivityKey,
        limit: usize,
    ) -> Result<Vec<PublishImpactRecord>> {
        self.store.query(key, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SchemaSource;
    use chrono::Utc;

    struct FailingStore;

    #[async_trait]
    impl ActivityStore for FailingStore {
        async fn record(&self, _key: &ActivityKey, _record: &PublishImpactRecord) -> Result<()> {
            anyhow::bail!("store unavailable")
        }

        async fn query(
            &self,
            _key: &ActivityKey,
            _limit: usize,
        ) -> Result<Vec<PublishImpactRecord>> {
            anyhow::bail!("store unavailable")
        }
    }

    fn sample_record() -> PublishImpactRecord {
        PublishImpactRecord {
            timestamp: Utc::now(),
            schema_used: SchemaSource::None,
            schema_valid: None,
            issue_count: 0,
            score_before: None,
            score_after: None,
            delta: None,
            permalink: None,
        }
    }

    #[tokio::test]
    async fn test_append_swallows_store_failure() {
        let recorder = ActivityRecorder::new(Arc::new(FailingStore));
        let key = ActivityKey::new("user", "project", "https://example.com");
        // Must not panic or propagate.
        recorder.append(&key, &sample_record()).await;
    }

    #[tokio::test]
    async fn test_recent_propagates_store_failure() {
        let recorder = ActivityRecorder::new(Arc::new(FailingStore));
        let key = ActivityKey::new("user", "project", "https://example.com");
        assert!(recorder.recent(&key, 10).await.is_err());
    }
}
