//! Dispatch tree for relay updates.
//!
//! New messages and channel posts go to the [`NewMessageHandler`], edits of
//! either go to the [`EditedMessageHandler`]. Endpoints never fail: the
//! handlers log their own errors.

use crate::bot::inbound::{edited_message, inbound_message, is_relayable};
use fuser_core::{EditedMessageHandler, NewMessageHandler};
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::debug;

/// Build the update handler.
///
/// Expects `Arc<dyn NewMessageHandler>` and `Arc<dyn EditedMessageHandler>`
/// in the dispatcher dependencies.
#[must_use]
pub fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter(|msg: Message| is_relayable(&msg))
                .endpoint(handle_new_message),
        )
        .branch(
            Update::filter_channel_post()
                .filter(|msg: Message| is_relayable(&msg))
                .endpoint(handle_new_message),
        )
        .branch(Update::filter_edited_message().endpoint(handle_edited_message))
        .branch(Update::filter_edited_channel_post().endpoint(handle_edited_message))
}

async fn handle_new_message(
    msg: Message,
    handler: Arc<dyn NewMessageHandler>,
) -> Result<(), teloxide::RequestError> {
    debug!(chat_id = msg.chat.id.0, message_id = msg.id.0, "New message");
    handler.on_new_message(inbound_message(&msg)).await;
    respond(())
}

async fn handle_edited_message(
    msg: Message,
    handler: Arc<dyn EditedMessageHandler>,
) -> Result<(), teloxide::RequestError> {
    debug!(chat_id = msg.chat.id.0, message_id = msg.id.0, "Edited message");
    handler.on_edited_message(edited_message(&msg)).await;
    respond(())
}
