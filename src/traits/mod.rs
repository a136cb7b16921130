pub mod notifier;
pub mod page_fetcher;
pub mod telegram_api;
