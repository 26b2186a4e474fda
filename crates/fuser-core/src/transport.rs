//! Interfaces between the relay core and the chat client.
//!
//! The chat client delivers inbound events through [`NewMessageHandler`] and
//! [`EditedMessageHandler`], and performs network calls through
//! [`RelayTransport`].

use crate::types::{ChatRef, EditedMessage, InboundMessage, MediaPayload, MessageRef, SentMessage};
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by outbound transport calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Network or protocol failure
    #[error("Transport request failed: {0}")]
    Request(String),
    /// Platform refused the call
    #[error("Platform rejected request: {0}")]
    Rejected(String),
}

/// Outbound calls against the chat platform.
///
/// Text sends and edits must be issued with link previews disabled.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Send a text message
    async fn send_message(&self, chat: ChatRef, text: &str)
        -> Result<SentMessage, TransportError>;
    /// Send media with a caption
    async fn send_media(
        &self,
        chat: ChatRef,
        media: &MediaPayload,
        caption: &str,
    ) -> Result<SentMessage, TransportError>;
    /// Replace the text of a sent message
    async fn edit_message(
        &self,
        chat: ChatRef,
        message: MessageRef,
        text: &str,
    ) -> Result<(), TransportError>;
    /// Replace the caption of a sent media message
    async fn edit_caption(
        &self,
        chat: ChatRef,
        message: MessageRef,
        caption: &str,
    ) -> Result<(), TransportError>;
}

/// Receives new messages from the chat client.
#[async_trait]
pub trait NewMessageHandler: Send + Sync {
    /// Handle a new message. Never fails: errors are logged by the handler.
    async fn on_new_message(&self, message: InboundMessage);
}

/// Receives message edits from the chat client.
#[async_trait]
pub trait EditedMessageHandler: Send + Sync {
    /// Handle an edit. Never fails: errors are logged by the handler.
    async fn on_edited_message(&self, message: EditedMessage);
}
