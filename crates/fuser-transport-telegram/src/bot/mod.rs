/// Dispatch tree and update endpoints
pub mod handlers;
/// Conversion of Telegram updates into relay events
pub mod inbound;
/// Bot API implementation of the relay transport
pub mod outbound;

pub use outbound::TelegramOutbound;
