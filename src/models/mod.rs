pub mod config;
pub mod env_file;
pub mod telegram;
pub mod types;
