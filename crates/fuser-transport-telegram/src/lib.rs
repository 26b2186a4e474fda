#![deny(missing_docs)]
//! Telegram transport adapter for the Fuser relay.

/// Telegram-specific update conversion, outbound calls and dispatch.
pub mod bot;
/// Telegram transport configuration.
pub mod config;
/// Telegram runtime entrypoint.
pub mod runner;
