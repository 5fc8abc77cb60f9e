//! In-memory activity store
//!
//! Keeps records in a map keyed by publish identity. Used when the
//! enclosing application does not need durability, and in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::ActivityStore;
use crate::models::{ActivityKey, PublishImpactRecord};

/// Volatile store backed by a `HashMap`
#[derive(Default)]
pub struct MemoryActivityStore {
    entries: Mutex<HashMap<ActivityKey, Vec<PublishImpactRecord>>>,
}

impl MemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all keys
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn record(&self, key: &ActivityKey, record: &PublishImpactRecord) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("activity store lock poisoned"))?;
        entries.entry(key.clone()).or_default().push(record.clone());
        Ok(())
    }

    async fn query(&self, key: &ActivityKey, limit: usize) -> Result<Vec<PublishImpactRecord>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("activity store lock poisoned"))?;
        let records = entries
            .get(key)
            .map(|records| records.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(records)
    }
}
