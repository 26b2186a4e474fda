//! Edit propagation
//!
//! Re-applies edits of source messages to their forwarded copies. A single
//! edit call is made per event; failures are logged and the registry entry
//! is left untouched so the next edit targets the same copy.

use crate::formatting::is_blank;
use crate::registry::ForwardRegistry;
use crate::transport::{EditedMessageHandler, RelayTransport};
use crate::types::{EditedMessage, RelayedKind};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Result of handling one edit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// No forwarded copy is known for the source message
    Unknown,
    /// The forwarded copy was updated
    Edited,
    /// The forwarded copy has no editable text or caption
    Skipped,
    /// The edit call failed
    Failed,
}

/// Propagates source edits to the recorded forwarded copy.
pub struct EditPropagator<T: RelayTransport + ?Sized> {
    transport: Arc<T>,
    registry: Arc<ForwardRegistry>,
    placeholder_caption: String,
}

impl<T: RelayTransport + ?Sized> EditPropagator<T> {
    /// Create a propagator sharing `registry` with the relay engine.
    pub fn new(
        transport: Arc<T>,
        registry: Arc<ForwardRegistry>,
        placeholder_caption: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            registry,
            placeholder_caption: placeholder_caption.into(),
        }
    }

    /// Apply `edit` to the forwarded copy of its source message, if any.
    pub async fn propagate(&self, edit: EditedMessage) -> EditOutcome {
        let Some(record) = self.registry.get(&edit.source).await else {
            debug!(source = %edit.source, "No forwarded copy for edited message");
            return EditOutcome::Unknown;
        };

        let result = match record.kind {
            RelayedKind::Uncaptioned => {
                debug!(source = %edit.source, "Forwarded copy has no caption to edit");
                return EditOutcome::Skipped;
            }
            RelayedKind::Text => {
                self.transport
                    .edit_message(record.destination_chat, record.destination_message, &edit.text)
                    .await
            }
            RelayedKind::Media => {
                let caption = if is_blank(&edit.text) {
                    self.placeholder_caption.as_str()
                } else {
                    edit.text.as_str()
                };
                self.transport
                    .edit_caption(record.destination_chat, record.destination_message, caption)
                    .await
            }
        };

        match result {
            Ok(()) => {
                // A concurrent relay may have recorded a newer copy meanwhile
                let refreshed = self
                    .registry
                    .touch(
                        &edit.source,
                        record.destination_chat,
                        record.destination_message,
                        Utc::now(),
                    )
                    .await;
                if !refreshed {
                    debug!(source = %edit.source, "Relay record changed during edit");
                }
                info!(
                    source = %edit.source,
                    destination = %record.destination_chat,
                    "Propagated edit"
                );
                EditOutcome::Edited
            }
            Err(e) => {
                error!(
                    source = %edit.source,
                    destination = %record.destination_chat,
                    error = %e,
                    "Failed to edit message in {}",
                    record.destination_chat
                );
                EditOutcome::Failed
            }
        }
    }
}

#[async_trait]
impl<T: RelayTransport + ?Sized> EditedMessageHandler for EditPropagator<T> {
    async fn on_edited_message(&self, message: EditedMessage) {
        self.propagate(message).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockRelayTransport, TransportError};
    use crate::types::{ChatRef, MessageRef, RelayRecord, SourceMessageId};
    use chrono::Duration;

    fn edit(chat: i64, message: i32, text: &str) -> EditedMessage {
        EditedMessage {
            source: SourceMessageId::new(chat, message),
            text: text.to_string(),
        }
    }

    async fn registry_with(kind: RelayedKind) -> Arc<ForwardRegistry> {
        let registry = Arc::new(ForwardRegistry::new());
        registry
            .put(
                SourceMessageId::new(100, 42),
                RelayRecord {
                    destination_message: MessageRef(99),
                    destination_chat: ChatRef(200),
                    kind,
                    updated_at: Utc::now() - Duration::hours(1),
                },
            )
            .await;
        registry
    }

    #[tokio::test]
    async fn edits_recorded_copy_once_and_refreshes_timestamp() {
        let mut mock = MockRelayTransport::new();
        mock.expect_edit_message()
            .withf(|chat, message, text| {
                *chat == ChatRef(200) && *message == MessageRef(99) && text == "new text"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        mock.expect_edit_caption().never();

        let registry = registry_with(RelayedKind::Text).await;
        let before = registry
            .get(&SourceMessageId::new(100, 42))
            .await
            .expect("record present")
            .updated_at;

        let propagator = EditPropagator::new(Arc::new(mock), registry.clone(), "Media attached.");
        let outcome = propagator.propagate(edit(100, 42, "new text")).await;

        assert_eq!(outcome, EditOutcome::Edited);
        let after = registry
            .get(&SourceMessageId::new(100, 42))
            .await
            .expect("record present");
        assert!(after.updated_at > before);
        assert_eq!(after.destination_message, MessageRef(99));
    }

    #[tokio::test]
    async fn unknown_message_makes_no_calls() {
        let mut mock = MockRelayTransport::new();
        mock.expect_edit_message().never();
        mock.expect_edit_caption().never();

        let registry = registry_with(RelayedKind::Text).await;
        let propagator = EditPropagator::new(Arc::new(mock), registry, "Media attached.");

        assert_eq!(
            propagator.propagate(edit(100, 43, "x")).await,
            EditOutcome::Unknown
        );
        // Same message id in another chat is a different source message
        assert_eq!(
            propagator.propagate(edit(101, 42, "x")).await,
            EditOutcome::Unknown
        );
    }

    #[tokio::test]
    async fn failed_edit_keeps_record() {
        let mut mock = MockRelayTransport::new();
        mock.expect_edit_message()
            .times(1)
            .returning(|_, _, _| Err(TransportError::Request("timeout".to_string())));

        let registry = registry_with(RelayedKind::Text).await;
        let before = registry
            .get(&SourceMessageId::new(100, 42))
            .await
            .expect("record present");

        let propagator = EditPropagator::new(Arc::new(mock), registry.clone(), "Media attached.");
        assert_eq!(
            propagator.propagate(edit(100, 42, "v2")).await,
            EditOutcome::Failed
        );

        let after = registry
            .get(&SourceMessageId::new(100, 42))
            .await
            .expect("record present");
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn uncaptioned_copy_is_not_edited() {
        let mut mock = MockRelayTransport::new();
        mock.expect_edit_message().never();
        mock.expect_edit_caption().never();

        let registry = registry_with(RelayedKind::Uncaptioned).await;
        let propagator = EditPropagator::new(Arc::new(mock), registry, "Media attached.");

        assert_eq!(
            propagator.propagate(edit(100, 42, "text")).await,
            EditOutcome::Skipped
        );
    }

    #[tokio::test]
    async fn media_copy_edits_caption() {
        let mut mock = MockRelayTransport::new();
        mock.expect_edit_message().never();
        mock.expect_edit_caption()
            .withf(|_, _, caption| caption == "Media attached.")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let registry = registry_with(RelayedKind::Media).await;
        let propagator = EditPropagator::new(Arc::new(mock), registry, "Media attached.");

        assert_eq!(
            propagator.propagate(edit(100, 42, "  ")).await,
            EditOutcome::Edited
        );
    }
}
