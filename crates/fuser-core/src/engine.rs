//! Relay engine
//!
//! Resolves destinations for new source messages, builds the outbound text
//! and fans it out through the [`RetrySender`], recording every successful
//! send in the [`ForwardRegistry`].

use crate::formatting::{compose_relay_text, is_blank};
use crate::registry::ForwardRegistry;
use crate::sender::RetrySender;
use crate::transport::{NewMessageHandler, RelayTransport};
use crate::types::{ChatRef, InboundMessage, RelayRecord, RelayedKind, RouteTable, SentMessage};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of relaying one source message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Copies that were delivered, in send order
    pub delivered: Vec<SentMessage>,
    /// Destinations that could not be reached
    pub failed: Vec<ChatRef>,
    /// Destinations passed over because the message had nothing to send
    pub skipped: Vec<ChatRef>,
}

impl RelayOutcome {
    /// Whether the message matched no route at all
    #[must_use]
    pub fn is_unrouted(&self) -> bool {
        self.delivered.is_empty() && self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Relays new messages from source chats to their destinations.
pub struct RelayEngine<T: RelayTransport + ?Sized> {
    routes: Arc<RouteTable>,
    registry: Arc<ForwardRegistry>,
    sender: RetrySender<T>,
}

impl<T: RelayTransport + ?Sized> RelayEngine<T> {
    /// Create an engine over a static route table and a shared registry.
    pub const fn new(
        routes: Arc<RouteTable>,
        registry: Arc<ForwardRegistry>,
        sender: RetrySender<T>,
    ) -> Self {
        Self {
            routes,
            registry,
            sender,
        }
    }

    /// Route table in use
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Relay `message` to every destination of every matching route.
    ///
    /// Destinations are tried in route-list order. A failing destination
    /// never prevents the remaining ones from being tried. Each successful
    /// send overwrites the registry entry for the source message.
    pub async fn relay(&self, message: InboundMessage) -> RelayOutcome {
        let mut outcome = RelayOutcome::default();
        let source = message.source;

        if !self.routes.is_source(source.chat) {
            debug!(source = %source, "No route for chat, ignoring message");
            return outcome;
        }

        let reply = message.reply_to.as_ref().and_then(|target| {
            if target.original.is_none() {
                debug!(
                    source = %source,
                    reply_to = %target.message,
                    "Reply target unavailable, relaying without context"
                );
            }
            target.original.as_ref()
        });
        let text = compose_relay_text(&message.text, reply);
        let media = message.media.as_ref();
        let kind = RelayedKind::for_media(media);

        if media.is_none() && is_blank(&text) {
            outcome.skipped = self.routes.destinations_for(source.chat).collect();
            debug!(source = %source, "Nothing to relay: blank text without media");
            return outcome;
        }

        for destination in self.routes.destinations_for(source.chat) {
            match self.sender.send(destination, &text, media).await {
                Some(sent) => {
                    self.registry
                        .put(
                            source,
                            RelayRecord {
                                destination_message: sent.message,
                                destination_chat: sent.chat,
                                kind,
                                updated_at: Utc::now(),
                            },
                        )
                        .await;
                    debug!(
                        source = %source,
                        destination = %sent.chat,
                        message = %sent.message,
                        "Relayed message"
                    );
                    outcome.delivered.push(sent);
                }
                None => outcome.failed.push(destination),
            }
        }

        if !outcome.failed.is_empty() {
            warn!(
                source = %source,
                failed = ?outcome.failed,
                "Message not delivered to {} destination(s)",
                outcome.failed.len()
            );
        }
        info!(
            source = %source,
            "Relayed to {} destination(s)",
            outcome.delivered.len()
        );

        outcome
    }
}

#[async_trait]
impl<T: RelayTransport + ?Sized> NewMessageHandler for RelayEngine<T> {
    async fn on_new_message(&self, message: InboundMessage) {
        self.relay(message).await;
    }
}
