#![allow(clippy::non_std_lazy_statics)]

use dotenvy::dotenv;
use fuser_core::config::RelaySettings;
use fuser_transport_telegram::config::{BotSettings, TelegramSettings};
use fuser_transport_telegram::runner::run_relay;
use lazy_regex::lazy_regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

const TOKEN_MASK: &str = "[TELEGRAM_TOKEN]";

// Bot API request URLs embed the token as `/bot<token>/method`
static RE_TOKEN_IN_URL: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"(/bot)[0-9]{5,12}:[A-Za-z0-9_-]{20,}");
static RE_TOKEN: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"\b[0-9]{5,12}:[A-Za-z0-9_-]{30,}");

/// Mask every bot token in `line`.
fn redact(line: &str) -> String {
    let masked = RE_TOKEN_IN_URL.replace_all(line, format!("${{1}}{TOKEN_MASK}"));
    RE_TOKEN.replace_all(&masked, TOKEN_MASK).into_owned()
}

/// Log sink that masks bot tokens before they reach `W`.
struct RedactingWriter<W: Write>(W);

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = redact(&String::from_utf8_lossy(buf));
        self.0.write_all(line.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    info!("Starting Fuser relay bot...");

    let settings = init_settings();

    if let Err(e) = run_relay(settings).await {
        error!("Relay stopped: {e:#}");
        std::process::exit(1);
    }

    info!("Relay stopped.");
}

fn init_logging() {
    let debug_mode = std::env::var("DEBUG_MODE").is_ok_and(|v| v == "true" || v == "1");
    let default_directives = if debug_mode {
        "debug"
    } else {
        "fuser_core=info,fuser_transport_telegram=info,fuser_telegram_bot=info,teloxide=warn,hyper=warn,h2=error,reqwest=warn,tokio=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(|| RedactingWriter(io::stderr())))
        .init();
}

fn init_settings() -> Arc<BotSettings> {
    let relay_settings = match RelaySettings::new() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load relay configuration: {}", e);
            std::process::exit(1);
        }
    };
    let telegram_settings = match TelegramSettings::new() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load telegram configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration loaded successfully.");
    Arc::new(BotSettings::new(relay_settings, telegram_settings))
}

#[cfg(test)]
mod tests {
    use super::redact;

    const TOKEN: &str = "123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsawq";

    #[test]
    fn test_redacts_token_in_request_url() {
        let line = format!("POST https://api.telegram.org/bot{TOKEN}/sendMessage failed");
        assert_eq!(
            redact(&line),
            "POST https://api.telegram.org/bot[TELEGRAM_TOKEN]/sendMessage failed"
        );
    }

    #[test]
    fn test_redacts_bare_token() {
        assert_eq!(redact(&format!("token={TOKEN}")), "token=[TELEGRAM_TOKEN]");
    }

    #[test]
    fn test_leaves_ids_alone() {
        let line = "Relayed message source=-1001/5 destination=-2002";
        assert_eq!(redact(line), line);
    }
}
