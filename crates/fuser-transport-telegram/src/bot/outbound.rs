//! Bot API implementation of [`RelayTransport`].
//!
//! Text sends and edits always go out with link previews disabled. Media are
//! re-sent by file id, so no bytes are downloaded or uploaded.

use async_trait::async_trait;
use fuser_core::types::{ChatRef, MediaKind, MediaPayload, MessageRef, SentMessage};
use fuser_core::{RelayTransport, TransportError};
use teloxide::prelude::*;
use teloxide::types::{ChatId, FileId, InputFile, LinkPreviewOptions, MessageId};
use teloxide::{ApiError, RequestError};
use tracing::debug;

/// Outbound relay calls against the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramOutbound {
    bot: Bot,
}

impl TelegramOutbound {
    /// Create a transport using `bot` for all calls.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

const fn no_link_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

fn transport_error(e: RequestError) -> TransportError {
    match e {
        RequestError::Api(api) => TransportError::Rejected(api.to_string()),
        other => TransportError::Request(other.to_string()),
    }
}

/// Editing to identical content is rejected by Telegram; the copy is already
/// up to date, so it counts as success.
fn edit_result<T>(result: Result<T, RequestError>) -> Result<(), TransportError> {
    match result {
        Ok(_) => Ok(()),
        Err(RequestError::Api(ApiError::MessageNotModified)) => {
            debug!("Edit skipped: message is not modified");
            Ok(())
        }
        Err(e) => Err(transport_error(e)),
    }
}

fn sent(msg: &Message) -> SentMessage {
    SentMessage {
        chat: ChatRef(msg.chat.id.0),
        message: MessageRef(msg.id.0),
    }
}

#[async_trait]
impl RelayTransport for TelegramOutbound {
    async fn send_message(
        &self,
        chat: ChatRef,
        text: &str,
    ) -> Result<SentMessage, TransportError> {
        self.bot
            .send_message(ChatId(chat.0), text)
            .link_preview_options(no_link_preview())
            .await
            .map(|msg| sent(&msg))
            .map_err(transport_error)
    }

    async fn send_media(
        &self,
        chat: ChatRef,
        media: &MediaPayload,
        caption: &str,
    ) -> Result<SentMessage, TransportError> {
        let chat_id = ChatId(chat.0);
        let file = InputFile::file_id(FileId(media.file_id.clone()));

        let result = match media.kind {
            MediaKind::Photo => self.bot.send_photo(chat_id, file).caption(caption).await,
            MediaKind::Video => self.bot.send_video(chat_id, file).caption(caption).await,
            MediaKind::Document => self.bot.send_document(chat_id, file).caption(caption).await,
            MediaKind::Audio => self.bot.send_audio(chat_id, file).caption(caption).await,
            MediaKind::Animation => {
                self.bot
                    .send_animation(chat_id, file)
                    .caption(caption)
                    .await
            }
            MediaKind::Voice => self.bot.send_voice(chat_id, file).caption(caption).await,
            // Neither accepts a caption.
            MediaKind::Sticker => self.bot.send_sticker(chat_id, file).await,
            MediaKind::VideoNote => self.bot.send_video_note(chat_id, file).await,
        };

        result.map(|msg| sent(&msg)).map_err(transport_error)
    }

    async fn edit_message(
        &self,
        chat: ChatRef,
        message: MessageRef,
        text: &str,
    ) -> Result<(), TransportError> {
        edit_result(
            self.bot
                .edit_message_text(ChatId(chat.0), MessageId(message.0), text)
                .link_preview_options(no_link_preview())
                .await,
        )
    }

    async fn edit_caption(
        &self,
        chat: ChatRef,
        message: MessageRef,
        caption: &str,
    ) -> Result<(), TransportError> {
        edit_result(
            self.bot
                .edit_message_caption(ChatId(chat.0), MessageId(message.0))
                .caption(caption)
                .await,
        )
    }
}
