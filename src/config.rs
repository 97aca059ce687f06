//! # Configuration Module
//!
//! This module defines configuration structures for the bot and its
//! collaborators: the exchange-rate service, the analytics webhook and the
//! deal assistant. Values come from the process environment (after `.env`
//! has been loaded by `main`).

use crate::errors::ConfigError;

// Constants for default configuration
pub const DEFAULT_RATE_API_BASE: &str =
    "https://bank.gov.ua/NBUStatService/v1/statdirectory/exchange";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
/// Currency every NBU rate is quoted in
pub const QUOTE_CURRENCY: &str = "UAH";
pub const DEFAULT_ASSISTANT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ASSISTANT_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_LOCALES_DIR: &str = "./locales";

/// Exchange-rate service configuration
#[derive(Debug, Clone)]
pub struct RateConfig {
    /// Base URL of the NBU exchange endpoint
    pub api_base: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_RATE_API_BASE.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Visit analytics configuration
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Webhook receiving visit records; analytics is off when unset
    pub webhook_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Deal assistant configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// API key for the generative language service
    pub api_key: Option<String>,
    /// Model name used in the `generateContent` path
    pub model: String,
    /// Base URL up to and including `/models`
    pub api_base: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_ASSISTANT_MODEL.to_string(),
            api_base: DEFAULT_ASSISTANT_API_BASE.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot token
    pub bot_token: String,
    /// Directory holding `{lang}/main.ftl` files
    pub locales_dir: String,
    pub rate: RateConfig,
    pub analytics: AnalyticsConfig,
    pub assistant: AssistantConfig,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    ///
    /// Empty values are treated as unset. The bot token is the only
    /// required value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("TELEGRAM_BOT_TOKEN")
            .or_else(|| get("BOT_TOKEN"))
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "HTTP_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let defaults = AssistantConfig::default();

        Ok(Self {
            bot_token,
            locales_dir: get("LOCALES_DIR").unwrap_or_else(|| DEFAULT_LOCALES_DIR.to_string()),
            rate: RateConfig {
                api_base: get("NBU_API_BASE").unwrap_or_else(|| DEFAULT_RATE_API_BASE.to_string()),
                timeout_secs,
            },
            analytics: AnalyticsConfig {
                webhook_url: get("ANALYTICS_WEBHOOK_URL"),
                timeout_secs,
            },
            assistant: AssistantConfig {
                api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
                model: get("GEMINI_MODEL").unwrap_or(defaults.model),
                api_base: get("GEMINI_API_BASE").unwrap_or(defaults.api_base),
                timeout_secs: defaults.timeout_secs,
            },
        })
    }
}
