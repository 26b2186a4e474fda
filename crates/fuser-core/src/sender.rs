//! Retrying outbound sender.
//!
//! Attempts one logical send (text, or media with caption) against a single
//! destination with a fixed retry budget and a fixed delay between attempts.
//! Exhaustion is reported as `None`, never as an error, so one failing
//! destination does not affect the others in a fan-out.

use crate::config::RelaySettings;
use crate::formatting::is_blank;
use crate::transport::RelayTransport;
use crate::types::{ChatRef, MediaPayload, SentMessage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Fixed-interval retry policy for outbound sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: usize,
    /// Delay after each failed attempt
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RelaySettings::default())
    }
}

impl RetryPolicy {
    /// Build a policy; `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Policy configured by relay settings.
    #[must_use]
    pub fn from_settings(settings: &RelaySettings) -> Self {
        Self::new(
            settings.send_max_attempts,
            Duration::from_millis(settings.send_retry_delay_ms),
        )
    }

    /// Delays between attempts; one fewer than the attempt count.
    fn strategy(&self) -> impl Iterator<Item = Duration> {
        FixedInterval::new(self.delay).take(self.max_attempts.saturating_sub(1))
    }
}

/// Sends to one destination with bounded retries.
pub struct RetrySender<T: RelayTransport + ?Sized> {
    transport: Arc<T>,
    policy: RetryPolicy,
    placeholder_caption: String,
    cancel: CancellationToken,
}

impl<T: RelayTransport + ?Sized> RetrySender<T> {
    /// Create a sender over `transport`.
    ///
    /// Cancelling `cancel` aborts in-flight retry loops, including their
    /// backoff sleeps.
    pub fn new(
        transport: Arc<T>,
        policy: RetryPolicy,
        placeholder_caption: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            transport,
            policy,
            placeholder_caption: placeholder_caption.into(),
            cancel,
        }
    }

    /// Retry policy in use
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Send `text` (or `media` captioned with `text`) to `chat`.
    ///
    /// - With media, a blank `text` is replaced by the placeholder caption;
    ///   kinds that take no caption get an empty one.
    /// - Without media, a blank `text` is skipped and `None` is returned
    ///   without calling the transport.
    ///
    /// Returns the sent message on the first successful attempt, `None` when
    /// the send was skipped, every attempt failed, or the sender was cancelled.
    pub async fn send(
        &self,
        chat: ChatRef,
        text: &str,
        media: Option<&MediaPayload>,
    ) -> Option<SentMessage> {
        if media.is_none() && is_blank(text) {
            debug!(chat = %chat, "Skipping empty message");
            return None;
        }

        let caption: &str = match media {
            Some(media) if !media.kind.supports_caption() => "",
            _ if is_blank(text) => &self.placeholder_caption,
            _ => text,
        };
        let attempt = AtomicUsize::new(0);
        let max_attempts = self.policy.max_attempts;

        let action = || {
            let current = attempt.fetch_add(1, Ordering::Relaxed) + 1;
            async move {
                let result = match media {
                    Some(media) => self.transport.send_media(chat, media, caption).await,
                    None => self.transport.send_message(chat, text).await,
                };
                result.map_err(|e| {
                    warn!(
                        chat = %chat,
                        attempt = current,
                        max_attempts,
                        error = %e,
                        "Failed to send message"
                    );
                    e
                })
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                info!(chat = %chat, "Send cancelled");
                None
            }
            result = Retry::spawn(self.policy.strategy(), action) => match result {
                Ok(sent) => Some(sent),
                Err(e) => {
                    warn!(
                        chat = %chat,
                        error = %e,
                        "Giving up after {} attempts",
                        max_attempts
                    );
                    None
                }
            }
        }
    }
}
