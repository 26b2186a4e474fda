//! Forwarded-message registry
//!
//! Correlates a source message with its forwarded copy so that later edits
//! can be propagated. Memory-resident: cleared on start and on shutdown.
//!
//! Only one record is kept per source message. When a route fans out to
//! several destinations, the last successful send overwrites the earlier
//! ones, so edits reach only that destination.

use crate::types::{ChatRef, MessageRef, RelayRecord, SourceMessageId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Concurrency-safe map from source message to its forwarded copy.
///
/// Every operation takes the lock for the duration of a single map access;
/// callers never hold it across a network call.
#[derive(Debug, Default)]
pub struct ForwardRegistry {
    records: RwLock<HashMap<SourceMessageId, RelayRecord>>,
}

impl ForwardRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or overwrite the record for `source`
    pub async fn put(&self, source: SourceMessageId, record: RelayRecord) {
        let previous = {
            let mut records = self.records.write().await;
            records.insert(source, record)
        };
        if let Some(previous) = previous {
            debug!(
                source = %source,
                replaced_chat = %previous.destination_chat,
                "Overwrote relay record"
            );
        }
    }

    /// Get the record for `source`, if any
    pub async fn get(&self, source: &SourceMessageId) -> Option<RelayRecord> {
        let records = self.records.read().await;
        records.get(source).cloned()
    }

    /// Refresh the timestamp of the record for `source`, but only while it
    /// still points at the copy `destination_chat`/`destination_message`.
    ///
    /// Returns `false` when the record is gone or now points elsewhere.
    pub async fn touch(
        &self,
        source: &SourceMessageId,
        destination_chat: ChatRef,
        destination_message: MessageRef,
        at: DateTime<Utc>,
    ) -> bool {
        let mut records = self.records.write().await;
        match records.get_mut(source) {
            Some(record)
                if record.destination_chat == destination_chat
                    && record.destination_message == destination_message =>
            {
                record.updated_at = at;
                true
            }
            _ => false,
        }
    }

    /// Remove all records
    pub async fn clear(&self) {
        let mut records = self.records.write().await;
        records.clear();
    }

    /// Number of tracked source messages
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no source message is tracked
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
