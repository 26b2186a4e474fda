use crate::bot::handlers::setup_handler;
use crate::bot::TelegramOutbound;
use crate::config::BotSettings;
use anyhow::{Context, Result};
use fuser_core::config::load_routes;
use fuser_core::{EditedMessageHandler, NewMessageHandler, RelayService};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;

/// Run the Telegram relay until interrupted.
///
/// # Errors
///
/// Returns an error if the route file cannot be loaded or the bot token is
/// rejected by Telegram. Both are fatal startup conditions.
pub async fn run_relay(settings: Arc<BotSettings>) -> Result<()> {
    let routes = load_routes(&settings.relay.routes_path)
        .with_context(|| format!("Failed to load routes from {}", settings.relay.routes_path))?;

    let bot = Bot::new(settings.telegram.telegram_token.clone());
    let me = bot
        .get_me()
        .await
        .context("Failed to validate Telegram bot token")?;
    info!("Authorized as bot {}", me.user.id);

    let service = RelayService::new(
        settings.relay.as_ref(),
        routes,
        Arc::new(TelegramOutbound::new(bot.clone())),
    );
    service.start().await;
    spawn_cancel_on_ctrlc(&service);

    let new_messages: Arc<dyn NewMessageHandler> = service.engine();
    let edits: Arc<dyn EditedMessageHandler> = service.propagator();

    info!("Listening for new messages...");

    Dispatcher::builder(bot, setup_handler())
        .dependencies(dptree::deps![new_messages, edits])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    service.shutdown().await;
    Ok(())
}

/// Cancel in-flight retry loops as soon as Ctrl-C arrives, so the
/// dispatcher's graceful shutdown is not held up by backoff sleeps.
fn spawn_cancel_on_ctrlc(service: &RelayService<TelegramOutbound>) {
    let token = service.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
}
