use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use tracing::{info, warn};

use crate::models::config::KEY_CHAT_ID;
use crate::models::env_file::EnvFile;
use crate::models::telegram::Update;
use crate::models::types::ChatId;
use crate::traits::telegram_api::TelegramApi;

/// Discovers the chat to notify by waiting for someone to message the bot.
#[derive(Builder)]
pub struct ChatIdResolver {
    api: Arc<dyn TelegramApi>,
    poll_interval: Duration,
}

impl ChatIdResolver {
    /// Polls `getUpdates` until a message from a (non-bot) user arrives and
    /// returns its chat id. Blocks for as long as that takes.
    pub async fn resolve(&self) -> ChatId {
        info!("no TELEGRAM_CHAT_ID configured; send any message to the bot to link a chat");
        let mut offset: Option<i64> = None;

        loop {
            match self.api.get_updates(offset).await {
                Ok(updates) => {
                    if let Some(chat_id) = first_user_chat(&updates) {
                        return chat_id;
                    }
                    // уже просмотренные апдейты подтверждаем через offset
                    if let Some(last) = updates.iter().map(|u| u.update_id).max() {
                        offset = Some(last + 1);
                    }
                }
                Err(e) => warn!(error = %e, "getUpdates failed, will retry"),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Resolves the chat id and writes it back to the env file. A failed write
    /// is logged; the id is still returned for this run.
    pub async fn resolve_and_persist(&self, env_file: &mut EnvFile) -> ChatId {
        let chat_id = self.resolve().await;
        match env_file.set(KEY_CHAT_ID, &chat_id.to_string()) {
            Ok(()) => info!(%chat_id, path = %env_file.path().display(), "chat id saved"),
            Err(e) => warn!(%chat_id, error = %e, "could not save chat id; it will be asked again next start"),
        }
        chat_id
    }
}

fn first_user_chat(updates: &[Update]) -> Option<ChatId> {
    updates.iter().find_map(|update| {
        let message = update.message.as_ref()?;
        let user = message.from.as_ref().filter(|u| !u.is_bot)?;
        info!(
            chat_id = %message.chat.id,
            chat_type = %message.chat.kind,
            user = %user.username.as_deref().unwrap_or(&user.first_name),
            "found chat"
        );
        Some(message.chat.id)
    })
}
