//! Identifiers and data model shared by the relay components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform chat identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatRef(pub i64);

impl fmt::Display for ChatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform message identifier, unique within a single chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageRef(pub i32);

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a message in a source chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceMessageId {
    /// Chat the message was posted in
    pub chat: ChatRef,
    /// Message id within that chat
    pub message: MessageRef,
}

impl SourceMessageId {
    /// Build a source identity from raw platform ids.
    #[must_use]
    pub const fn new(chat: i64, message: i32) -> Self {
        Self {
            chat: ChatRef(chat),
            message: MessageRef(message),
        }
    }
}

impl fmt::Display for SourceMessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chat, self.message)
    }
}

/// A single source chat and the chats its messages are relayed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Source chat
    pub source: ChatRef,
    /// Destination chats, in send order
    pub destinations: Vec<ChatRef>,
}

/// Static routing table. Several routes may share a source.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create a table from routes in configuration order.
    #[must_use]
    pub const fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// All routes in configuration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Destinations of every route whose source is `chat`, in route-list order.
    pub fn destinations_for(&self, chat: ChatRef) -> impl Iterator<Item = ChatRef> + '_ {
        self.routes
            .iter()
            .filter(move |route| route.source == chat)
            .flat_map(|route| route.destinations.iter().copied())
    }

    /// Whether any route has `chat` as its source.
    #[must_use]
    pub fn is_source(&self, chat: ChatRef) -> bool {
        self.routes.iter().any(|route| route.source == chat)
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Kind of media attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Photo
    Photo,
    /// Video
    Video,
    /// Generic file
    Document,
    /// Audio track
    Audio,
    /// GIF or silent video
    Animation,
    /// Voice note
    Voice,
    /// Sticker, sent without caption
    Sticker,
    /// Round video message, sent without caption
    VideoNote,
}

impl MediaKind {
    /// Whether the platform accepts a caption for this kind.
    #[must_use]
    pub const fn supports_caption(self) -> bool {
        !matches!(self, Self::Sticker | Self::VideoNote)
    }
}

/// Media attached to a source message, re-sent by platform file reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    /// Media kind, selects the outbound send call
    pub kind: MediaKind,
    /// Platform file reference
    pub file_id: String,
}

/// The message a reply refers to, as resolved by the chat client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedMessage {
    /// Sender identifier, if the platform exposes one
    pub sender: Option<String>,
    /// Text (or caption) of the original message
    pub text: String,
}

/// Reply reference of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    /// Id of the replied-to message
    pub message: MessageRef,
    /// Resolved original, `None` when it could not be resolved
    pub original: Option<QuotedMessage>,
}

/// New message posted in a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Identity of the message
    pub source: SourceMessageId,
    /// Raw text or caption
    pub text: String,
    /// Attached media
    pub media: Option<MediaPayload>,
    /// Reply reference
    pub reply_to: Option<ReplyTarget>,
}

/// Edit of a previously posted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedMessage {
    /// Identity of the edited message
    pub source: SourceMessageId,
    /// New text or caption
    pub text: String,
}

/// Handle of a message sent by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    /// Chat the message was sent to
    pub chat: ChatRef,
    /// Destination-scoped message id
    pub message: MessageRef,
}

/// Whether a forwarded copy is a text message or a captioned media message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayedKind {
    /// Plain text message
    Text,
    /// Media message with caption
    Media,
    /// Media message that cannot carry a caption
    Uncaptioned,
}

impl RelayedKind {
    /// Kind of copy produced when relaying `media`.
    #[must_use]
    pub fn for_media(media: Option<&MediaPayload>) -> Self {
        match media {
            None => Self::Text,
            Some(media) if media.kind.supports_caption() => Self::Media,
            Some(_) => Self::Uncaptioned,
        }
    }
}

/// Where a source message was forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRecord {
    /// Message id of the forwarded copy
    pub destination_message: MessageRef,
    /// Chat holding the forwarded copy
    pub destination_chat: ChatRef,
    /// Text or media copy
    pub kind: RelayedKind,
    /// Time of the last successful send or edit
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(source: i64, destinations: &[i64]) -> Route {
        Route {
            source: ChatRef(source),
            destinations: destinations.iter().copied().map(ChatRef).collect(),
        }
    }

    #[test]
    fn destinations_for_merges_routes_with_same_source() {
        let table = RouteTable::new(vec![
            route(100, &[200, 300]),
            route(101, &[400]),
            route(100, &[500]),
        ]);

        let dests: Vec<ChatRef> = table.destinations_for(ChatRef(100)).collect();
        assert_eq!(dests, vec![ChatRef(200), ChatRef(300), ChatRef(500)]);
        assert!(table.is_source(ChatRef(101)));
        assert!(!table.is_source(ChatRef(200)));
        assert_eq!(table.destinations_for(ChatRef(999)).count(), 0);
    }

    #[test]
    fn relayed_kind_follows_caption_support() {
        let media = |kind| MediaPayload {
            kind,
            file_id: "f".to_string(),
        };
        assert_eq!(RelayedKind::for_media(None), RelayedKind::Text);
        assert_eq!(
            RelayedKind::for_media(Some(&media(MediaKind::Photo))),
            RelayedKind::Media
        );
        assert_eq!(
            RelayedKind::for_media(Some(&media(MediaKind::Sticker))),
            RelayedKind::Uncaptioned
        );
        assert_eq!(
            RelayedKind::for_media(Some(&media(MediaKind::VideoNote))),
            RelayedKind::Uncaptioned
        );
    }

    #[test]
    fn source_id_display() {
        assert_eq!(SourceMessageId::new(-100, 7).to_string(), "-100/7");
    }
}
