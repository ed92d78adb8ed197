//! Notification channel contract.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Markup dialect the channel should apply to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupMode {
    #[default]
    Markdown,
    Html,
    Plain,
}

impl MarkupMode {
    /// Telegram `parse_mode` value; `None` sends plain text.
    pub const fn parse_mode(self) -> Option<&'static str> {
        match self {
            Self::Markdown => Some("Markdown"),
            Self::Html => Some("HTML"),
            Self::Plain => None,
        }
    }
}

/// One message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: String,
    pub text: String,
    pub markup: MarkupMode,
}

impl OutboundMessage {
    pub fn markdown(recipient: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            text: text.into(),
            markup: MarkupMode::Markdown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),

    #[error("notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers formatted messages. Failures are reported to the caller, never retried.
pub trait Notifier: Send + Sync {
    fn send<'a>(
        &'a self,
        message: &'a OutboundMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>>;
}
