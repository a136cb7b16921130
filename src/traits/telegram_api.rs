use async_trait::async_trait;

use crate::error::NotifyError;
use crate::models::telegram::Update;
use crate::models::types::ChatId;

/// `TelegramApi` defines the two Bot API calls the monitor needs.
///
/// This trait allows different implementations, including mock implementations for testing
/// and real ones that send actual HTTP requests.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    /// Sends a text message to a specified Telegram chat.
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), NotifyError>;

    /// Fetches pending updates. `offset` acknowledges every update below it.
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, NotifyError>;
}
