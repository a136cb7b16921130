use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use url::Url;

use crate::error::ConfigError;
use crate::models::env_file::EnvFile;
use crate::models::types::ChatId;

pub const KEY_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const KEY_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const KEY_TARGET_URL: &str = "TARGET_URL";
pub const KEY_POLL_INTERVAL: &str = "POLL_INTERVAL_SECS";
pub const KEY_API_BASE_URL: &str = "TELEGRAM_API_BASE_URL";
pub const KEY_REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT_SECS";
pub const KEY_USER_AGENT: &str = "USER_AGENT";
pub const KEY_CHAT_ID_POLL: &str = "CHAT_ID_POLL_SECS";
pub const KEY_REPORT_INTERVAL: &str = "REPORT_INTERVAL_SECS";
pub const KEY_MESSAGE_TEMPLATE: &str = "MESSAGE_TEMPLATE";

const TOKEN_PLACEHOLDER: &str = "your_bot_token_here";

pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CHAT_ID_POLL_SECS: u64 = 3;
pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 86_400;
/// Upper bound for any `*_SECS` setting (one year).
pub const MAX_INTERVAL_SECS: u64 = 366 * 86_400;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Runtime configuration. Built once at startup and passed explicitly;
/// only `chat_id` is filled in later, by discovery.
#[derive(Debug, Clone, Builder)]
pub struct AppConfig {
    #[builder(into)]
    pub bot_token: String,
    pub chat_id: Option<ChatId>,
    pub target_url: Url,
    #[builder(default = Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS))]
    pub poll_interval: Duration,
    #[builder(into, default = DEFAULT_API_BASE_URL.to_string())]
    pub api_base_url: String,
    #[builder(default = Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))]
    pub request_timeout: Duration,
    #[builder(into, default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
    #[builder(default = Duration::from_secs(DEFAULT_CHAT_ID_POLL_SECS))]
    pub chat_id_poll_interval: Duration,
    /// `None` disables the status report.
    pub report_interval: Option<Duration>,
    #[builder(into)]
    pub message_template: Option<String>,
}

impl AppConfig {
    /// Reads the configuration the way the process sees it: environment first,
    /// then the `.env` file.
    pub fn from_env_file(env_file: &EnvFile) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env_file.lookup(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // пустые значения считаем отсутствующими
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get(KEY_BOT_TOKEN).ok_or(ConfigError::Missing { key: KEY_BOT_TOKEN })?;
        if bot_token == TOKEN_PLACEHOLDER {
            return Err(ConfigError::Invalid {
                key: KEY_BOT_TOKEN,
                value: bot_token,
                reason: "still the placeholder value".to_string(),
            });
        }

        let raw_url = get(KEY_TARGET_URL).ok_or(ConfigError::Missing { key: KEY_TARGET_URL })?;
        let target_url = parse_target_url(&raw_url)?;

        let chat_id = get(KEY_CHAT_ID)
            .map(|v| parse_value::<ChatId>(KEY_CHAT_ID, v))
            .transpose()?;

        let poll_interval = positive_secs(&get, KEY_POLL_INTERVAL, DEFAULT_POLL_INTERVAL_SECS)?;
        let request_timeout = positive_secs(&get, KEY_REQUEST_TIMEOUT, DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let chat_id_poll_interval = positive_secs(&get, KEY_CHAT_ID_POLL, DEFAULT_CHAT_ID_POLL_SECS)?;
        let report_interval = Some(secs(&get, KEY_REPORT_INTERVAL, DEFAULT_REPORT_INTERVAL_SECS)?)
            .filter(|d| !d.is_zero());

        let api_base_url = get(KEY_API_BASE_URL)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(AppConfig::builder()
            .bot_token(bot_token)
            .maybe_chat_id(chat_id)
            .target_url(target_url)
            .poll_interval(poll_interval)
            .api_base_url(api_base_url)
            .request_timeout(request_timeout)
            .user_agent(get(KEY_USER_AGENT).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
            .chat_id_poll_interval(chat_id_poll_interval)
            .maybe_report_interval(report_interval)
            .maybe_message_template(get(KEY_MESSAGE_TEMPLATE))
            .build())
    }
}

fn parse_target_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: KEY_TARGET_URL,
        value: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other:?}, expected http or https"))),
    }
}

fn parse_value<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn secs<G>(get: &G, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let secs = match get(key) {
        Some(v) => parse_value::<u64>(key, v)?,
        None => default,
    };
    if secs > MAX_INTERVAL_SECS {
        return Err(ConfigError::Invalid {
            key,
            value: secs.to_string(),
            reason: format!("must not exceed {MAX_INTERVAL_SECS} seconds"),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn positive_secs<G>(get: &G, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let duration = secs(get, key, default)?;
    if duration.is_zero() {
        return Err(ConfigError::Invalid {
            key,
            value: "0".to_string(),
            reason: "must be at least one second".to_string(),
        });
    }
    Ok(duration)
}
