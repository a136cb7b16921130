use std::sync::Arc;

use anyhow::Result;
use bon::Builder;
use tokio_graceful_shutdown::errors::CancelledByShutdown;
use tokio_graceful_shutdown::{FutureExt, SubsystemHandle};
use tracing::{info, warn};

use crate::models::config::AppConfig;
use crate::models::env_file::EnvFile;
use crate::publishers::telegram::TelegramNotifier;
use crate::services::formatter::MessageFormatter;
use crate::services::monitor::Monitor;
use crate::services::resolver::ChatIdResolver;
use crate::services::schedule::Schedule;
use crate::traits::page_fetcher::PageFetcher;
use crate::traits::telegram_api::TelegramApi;

#[derive(Builder)]
pub struct MonitorSubsystem {
    pub(crate) config: AppConfig,
    pub(crate) env_file: EnvFile,
    pub(crate) telegram_api: Arc<dyn TelegramApi>,
    pub(crate) fetcher: Arc<dyn PageFetcher>,
    pub(crate) formatter: Arc<MessageFormatter>,
}

impl MonitorSubsystem {
    pub async fn run(self, subsys: SubsystemHandle) -> Result<()> {
        info!("Starting Monitor subsystem");

        let Self { mut config, mut env_file, telegram_api, fetcher, formatter } = self;

        let fut = async move {
            let chat_id = match config.chat_id {
                Some(chat_id) => chat_id,
                None => {
                    let resolver = ChatIdResolver::builder()
                        .api(Arc::clone(&telegram_api))
                        .poll_interval(config.chat_id_poll_interval)
                        .build();
                    let chat_id = resolver.resolve_and_persist(&mut env_file).await;
                    config.chat_id = Some(chat_id);

                    let hello = formatter.started_message(&config.target_url);
                    if let Err(e) = telegram_api.send_message(chat_id, &hello).await {
                        warn!(error = %e, "failed to confirm linked chat");
                    }
                    chat_id
                }
            };
            info!(%chat_id, "notifications go to chat");

            let notifier = TelegramNotifier::builder()
                .api(Arc::clone(&telegram_api))
                .chat_id(chat_id)
                .build();

            let mut monitor = Monitor::builder()
                .target_url(config.target_url.clone())
                .fetcher(fetcher)
                .notifier(Arc::new(notifier))
                .formatter(formatter)
                .build();

            monitor.run(&Schedule::from_config(&config)).await;
        };

        match fut.cancel_on_shutdown(&subsys).await {
            Ok(()) => info!("Monitor subsystem finished"),
            Err(CancelledByShutdown) => info!("Monitor subsystem cancelled by shutdown"),
        }

        Ok(())
    }
}
