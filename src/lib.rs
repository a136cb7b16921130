pub mod error;
pub mod models;
pub mod publishers;
pub mod services;
pub mod subsystems;
pub mod traits;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_graceful_shutdown::{SubsystemBuilder, SubsystemHandle, Toplevel};
use tracing::info;

use crate::error::ConfigError;
use crate::models::config::AppConfig;
use crate::models::env_file::EnvFile;
use crate::publishers::telegram::RealTelegramApi;
use crate::services::fetcher::HttpPageFetcher;
use crate::services::formatter::MessageFormatter;
use crate::subsystems::monitor::MonitorSubsystem;
use crate::traits::page_fetcher::PageFetcher;
use crate::traits::telegram_api::TelegramApi;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize structured logging (default to info if RUST_LOG not set)
pub fn init_logging() {
    let log_spec = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_spec))
        .with_target(false)
        .compact()
        .try_init();
}

/// High-level entrypoint: load the env file, init logging, run the monitor
/// until SIGINT/SIGTERM.
pub async fn run_with_env_path<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    init_logging();

    let env_file = EnvFile::load(path.as_ref())?;
    let config = AppConfig::from_env_file(&env_file)
        .with_context(|| format!("invalid configuration in {}", path.as_ref().display()))?;
    info!(
        url = %config.target_url,
        interval_secs = config.poll_interval.as_secs(),
        chat_id = ?config.chat_id.map(|c| c.get()),
        "configuration loaded"
    );

    let subsystem = build_subsystem(config, env_file)?;

    Toplevel::new(async move |s: SubsystemHandle| {
        s.start(SubsystemBuilder::new(
            "Monitor",
            async move |h: SubsystemHandle| subsystem.run(h).await,
        ));
    })
    .catch_signals()
    .handle_shutdown_requests(SHUTDOWN_TIMEOUT)
    .await
    .map_err(Into::into)
}

/// Wires the real HTTP clients. Everything here fails before any request is made.
pub fn build_subsystem(config: AppConfig, env_file: EnvFile) -> anyhow::Result<MonitorSubsystem> {
    let formatter = MessageFormatter::new(config.message_template.as_deref())?;

    let telegram_api: Arc<dyn TelegramApi> = Arc::new(
        RealTelegramApi::new(&config.api_base_url, &config.bot_token, config.request_timeout)
            .map_err(ConfigError::Client)?,
    );
    let fetcher: Arc<dyn PageFetcher> = Arc::new(
        HttpPageFetcher::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(ConfigError::Client)?,
    );

    Ok(MonitorSubsystem::builder()
        .config(config)
        .env_file(env_file)
        .telegram_api(telegram_api)
        .fetcher(fetcher)
        .formatter(Arc::new(formatter))
        .build())
}
