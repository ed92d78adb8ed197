use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::notify::{Notifier, NotifyError, OutboundMessage};

const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

/// Telegram Bot API `sendMessage` notifier.
#[derive(Clone)]
pub struct TelegramNotifier {
    http_client: Arc<dyn HttpClient>,
    token: String,
    api_url: String,
    timeout_ms: u64,
}

impl TelegramNotifier {
    pub fn new(http_client: Arc<dyn HttpClient>, token: impl Into<String>) -> Self {
        Self {
            http_client,
            token: token.into(),
            api_url: String::from(TELEGRAM_API),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }
}

impl Notifier for TelegramNotifier {
    fn send<'a>(
        &'a self,
        message: &'a OutboundMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>> {
        Box::pin(async move {
            let payload = SendMessagePayload {
                chat_id: &message.recipient,
                text: &message.text,
                parse_mode: message.markup.parse_mode(),
            };
            let body = serde_json::to_string(&payload)
                .map_err(|error| NotifyError::Transport(error.to_string()))?;

            let request = HttpRequest::post(self.endpoint())
                .with_json_body(body)
                .with_timeout_ms(self.timeout_ms);
            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|error| NotifyError::Transport(error.message().to_owned()))?;

            if !response.is_success() {
                return Err(NotifyError::Rejected {
                    status: response.status,
                    body: response.body,
                });
            }

            info!(chars = message.text.chars().count(), "message sent to telegram");
            Ok(())
        })
    }
}
