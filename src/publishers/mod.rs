pub mod telegram;
pub mod utils;

pub use telegram::{RealTelegramApi, TelegramNotifier};
