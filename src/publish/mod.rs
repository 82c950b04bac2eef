//! Delivery of composed messages to the channel.
//!
//! [`ChannelApi`] is the transport seam; [`telegram::TelegramApi`] is the
//! production implementation. [`Publisher`] layers the delivery policy on top:
//! a photo message that fails is sent once more as plain text, and nothing
//! beyond that.

pub mod telegram;

use crate::compose::OutboundMessage;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Deadline for a single send, including reading the response.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Sends per message: the primary attempt plus one text-only fallback.
pub const MAX_ATTEMPTS: usize = 2;

/// Longest caption the Bot API accepts on a photo.
///
/// Telegram counts characters after parsing the HTML entities, while
/// [`Publisher`] compares against the raw body, tags and escapes included.
/// A caption near the limit may therefore go out as text although it would
/// have fit.
pub const CAPTION_LIMIT: usize = 1024;

/// Why a single send failed.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Connection, TLS or body-read failure
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// No complete response within [`REQUEST_TIMEOUT`]
    #[error("Request timed out")]
    Timeout,
    /// Well-formed response reporting `ok: false`
    #[error("API error{}: {description}", code.map(|c| format!(" {}", c)).unwrap_or_default())]
    Api {
        code: Option<i64>,
        description: String,
    },
    /// Response body was not the API's JSON envelope
    #[error("Malformed response (HTTP {status})")]
    MalformedResponse { status: u16 },
    /// Request payload could not be serialized
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The two operations the announcer needs from a messaging platform.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<(), PublishError>;
    async fn send_photo(&self, photo_url: &str, caption: &str) -> Result<(), PublishError>;
}

/// Result of publishing one message. Never an error: failures are reported
/// here and logged, and the run carries on.
#[derive(Debug)]
pub enum PublishOutcome {
    /// The first attempt succeeded.
    Delivered,
    /// The photo send failed and the text-only fallback succeeded.
    DeliveredAsText { photo_error: PublishError },
    /// Every attempt failed; `error` is from the last one.
    Failed { error: PublishError },
}

impl PublishOutcome {
    pub fn is_delivered(&self) -> bool {
        !matches!(self, PublishOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum Attempt<'a> {
    Photo(&'a str),
    Text,
}

/// Applies the photo-then-text delivery policy over a [`ChannelApi`].
pub struct Publisher<A> {
    api: A,
}

impl<A: ChannelApi> Publisher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Sends `message`, falling back to text once if a photo send fails.
    pub async fn publish(&self, message: &OutboundMessage) -> PublishOutcome {
        let primary = match message.media_url.as_deref() {
            Some(photo) if message.body.chars().count() <= CAPTION_LIMIT => Attempt::Photo(photo),
            Some(photo) => {
                tracing::info!(
                    photo = %photo,
                    caption_len = message.body.chars().count(),
                    "Caption exceeds photo limit, sending as text"
                );
                Attempt::Text
            }
            None => Attempt::Text,
        };

        let error = match self.send(primary, &message.body, 1).await {
            Ok(()) => return PublishOutcome::Delivered,
            Err(e) => e,
        };

        // Only photo sends have a fallback; text failures are final
        let Attempt::Photo(photo) = primary else {
            tracing::error!(error = %error, "Message not delivered");
            return PublishOutcome::Failed { error };
        };

        tracing::warn!(
            photo = %photo,
            error = %error,
            "Photo send failed, retrying as text"
        );

        match self.send(Attempt::Text, &message.body, MAX_ATTEMPTS).await {
            Ok(()) => PublishOutcome::DeliveredAsText { photo_error: error },
            Err(fallback_error) => {
                tracing::error!(
                    photo_error = %error,
                    error = %fallback_error,
                    "Message not delivered after text fallback"
                );
                PublishOutcome::Failed {
                    error: fallback_error,
                }
            }
        }
    }

    async fn send(&self, attempt: Attempt<'_>, body: &str, number: usize) -> Result<(), PublishError> {
        let result = match attempt {
            Attempt::Photo(photo) => self.api.send_photo(photo, body).await,
            Attempt::Text => self.api.send_text(body).await,
        };
        if result.is_ok() {
            tracing::info!(
                attempt = number,
                max_attempts = MAX_ATTEMPTS,
                kind = ?attempt,
                "Message sent"
            );
        }
        result
    }
}
