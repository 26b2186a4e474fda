//! Testing helpers and mock utilities.
//!
//! Provides constructors for route tables, inbound events and mocked
//! transports.

use crate::transport::MockRelayTransport;
use crate::types::{ChatRef, InboundMessage, MessageRef, Route, RouteTable, SentMessage, SourceMessageId};

/// Build a route table from `(source, destinations)` pairs.
#[must_use]
pub fn routes(entries: &[(i64, Vec<i64>)]) -> RouteTable {
    RouteTable::new(
        entries
            .iter()
            .map(|(source, destinations)| Route {
                source: ChatRef(*source),
                destinations: destinations.iter().copied().map(ChatRef).collect(),
            })
            .collect(),
    )
}

/// Text message without media or reply.
#[must_use]
pub fn inbound(chat: i64, message: i32, text: &str) -> InboundMessage {
    InboundMessage {
        source: SourceMessageId::new(chat, message),
        text: text.to_string(),
        media: None,
        reply_to: None,
    }
}

/// Create a mock transport where every call succeeds.
///
/// Sends return a message id of 1 in the destination chat.
#[must_use]
pub fn mock_transport_echo() -> MockRelayTransport {
    let mut mock = MockRelayTransport::new();

    mock.expect_send_message().returning(|chat, _| {
        Ok(SentMessage {
            chat,
            message: MessageRef(1),
        })
    });

    mock.expect_send_media().returning(|chat, _, _| {
        Ok(SentMessage {
            chat,
            message: MessageRef(1),
        })
    });

    mock.expect_edit_message().returning(|_, _, _| Ok(()));

    mock.expect_edit_caption().returning(|_, _, _| Ok(()));

    mock
}
