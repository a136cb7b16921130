use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::NotifyError;
use crate::models::telegram::{ApiResponse, SendMessageRequest, Update};
use crate::models::types::ChatId;
use crate::traits::notifier::Notifier;
use crate::traits::telegram_api::TelegramApi;

/// Telegram caps message text at 4096 characters.
pub const TELEGRAM_MAX_CHARS: usize = 4096;

/// A real implementation of the `TelegramApi` trait that sends HTTP requests to the Telegram Bot API.
#[derive(Builder)]
pub struct RealTelegramApi {
    pub client: Client,
    #[builder(into)]
    pub base_url: String,
    #[builder(into)]
    pub token: String,
}

impl RealTelegramApi {
    /// Creates a client for `{base_url}/bot{token}/...` with a per-request timeout.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::builder()
            .client(client)
            .base_url(base_url.trim_end_matches('/'))
            .token(token)
            .build())
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }
}

/// Unwraps the `{ok, result}` envelope, turning `ok: false` and non-2xx
/// answers into `NotifyError::Api`.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<Option<T>, NotifyError> {
    let status = response.status();
    let body = response.text().await?;

    let parsed = serde_json::from_str::<ApiResponse<T>>(&body);
    match parsed {
        Ok(envelope) if envelope.ok && status.is_success() => Ok(envelope.result),
        Ok(envelope) => Err(NotifyError::Api {
            status: envelope.error_code.unwrap_or(status.as_u16()),
            description: envelope.description.unwrap_or(body),
        }),
        Err(_) => Err(NotifyError::Api {
            status: status.as_u16(),
            description: body,
        }),
    }
}

#[async_trait]
impl TelegramApi for RealTelegramApi {
    /// Sends a message to a Telegram chat using the Telegram Bot API.
    ///
    /// # Arguments
    ///
    /// * `chat_id` - Telegram chat ID to send the message to.
    /// * `text` - Message text to send.
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), NotifyError> {
        let message = SendMessageRequest {
            chat_id,
            text: text.to_string(),
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&message)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "HTTP error sending Telegram message");
                e
            })?;

        read_envelope::<serde_json::Value>(response).await.map(|_| ())
    }

    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, NotifyError> {
        let mut query: Vec<(&str, String)> = vec![("timeout", "0".to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&query)
            .send()
            .await?;

        Ok(read_envelope::<Vec<Update>>(response).await?.unwrap_or_default())
    }
}

/// Delivers notifications to one chat through any `TelegramApi`.
#[derive(Builder)]
pub struct TelegramNotifier {
    pub api: Arc<dyn TelegramApi>,
    pub chat_id: ChatId,
    pub max_chars: Option<usize>,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let limit = self.max_chars.unwrap_or(TELEGRAM_MAX_CHARS);
        let cut = super::utils::trim_with_ellipsis(text, limit);
        self.api.send_message(self.chat_id, &cut).await
    }
}
