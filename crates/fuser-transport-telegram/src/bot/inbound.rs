//! Conversion of Telegram messages into relay events.

use fuser_core::types::{
    EditedMessage, InboundMessage, MediaKind, MediaPayload, MessageRef, QuotedMessage,
    ReplyTarget, SourceMessageId,
};
use teloxide::types::Message;

/// Text of a message, falling back to the media caption.
#[must_use]
pub fn message_text(msg: &Message) -> String {
    msg.text()
        .or_else(|| msg.caption())
        .unwrap_or_default()
        .to_string()
}

/// Media attached to a message, referenced by file id.
///
/// For photos the largest size is used.
#[must_use]
pub fn media_payload(msg: &Message) -> Option<MediaPayload> {
    let (kind, file_id) = if let Some(sizes) = msg.photo() {
        (MediaKind::Photo, sizes.last()?.file.id.to_string())
    } else if let Some(animation) = msg.animation() {
        (MediaKind::Animation, animation.file.id.to_string())
    } else if let Some(video) = msg.video() {
        (MediaKind::Video, video.file.id.to_string())
    } else if let Some(document) = msg.document() {
        (MediaKind::Document, document.file.id.to_string())
    } else if let Some(audio) = msg.audio() {
        (MediaKind::Audio, audio.file.id.to_string())
    } else if let Some(voice) = msg.voice() {
        (MediaKind::Voice, voice.file.id.to_string())
    } else if let Some(sticker) = msg.sticker() {
        (MediaKind::Sticker, sticker.file.id.to_string())
    } else if let Some(note) = msg.video_note() {
        (MediaKind::VideoNote, note.file.id.to_string())
    } else {
        return None;
    };
    Some(MediaPayload { kind, file_id })
}

/// Whether the message carries anything the relay can forward.
///
/// Service messages (joins, pins, title changes) carry neither.
#[must_use]
pub fn is_relayable(msg: &Message) -> bool {
    msg.text().is_some() || msg.caption().is_some() || media_payload(msg).is_some()
}

/// Sender id of a message: the user, or the chat posting on its own behalf.
fn sender_id(msg: &Message) -> Option<String> {
    msg.from
        .as_ref()
        .map(|user| user.id.0.to_string())
        .or_else(|| msg.sender_chat.as_ref().map(|chat| chat.id.0.to_string()))
}

fn source_id(msg: &Message) -> SourceMessageId {
    SourceMessageId::new(msg.chat.id.0, msg.id.0)
}

/// Convert a new message or channel post.
#[must_use]
pub fn inbound_message(msg: &Message) -> InboundMessage {
    let reply_to = msg.reply_to_message().map(|original| ReplyTarget {
        message: MessageRef(original.id.0),
        original: Some(QuotedMessage {
            sender: sender_id(original),
            text: message_text(original),
        }),
    });

    InboundMessage {
        source: source_id(msg),
        text: message_text(msg),
        media: media_payload(msg),
        reply_to,
    }
}

/// Convert an edited message or edited channel post.
#[must_use]
pub fn edited_message(msg: &Message) -> EditedMessage {
    EditedMessage {
        source: source_id(msg),
        text: message_text(msg),
    }
}
