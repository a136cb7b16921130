use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems. Startup stops before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is not set (add it to the .env file or the environment)")]
    Missing { key: &'static str },

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read env file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },

    #[error("failed to write env file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid message template: {0}")]
    Template(#[from] tera::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Page retrieval failures. The cycle is skipped and retried on the next tick.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Messaging API failures. Logged only; never stop the loop.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error talking to Telegram: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error {status}: {description}")]
    Api { status: u16, description: String },

    #[error("failed to render message: {0}")]
    Render(#[from] tera::Error),
}
