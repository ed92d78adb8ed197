//! Process configuration read once from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `METALPRICE_API_KEY` | required for ingestion and live prices |
//! | `METALPRICE_BASE_URL` | `https://api.metalpriceapi.com/v1` |
//! | `AURUM_BASE` / `AURUM_QUOTE` | `XAU` / `MYR` |
//! | `AURUM_METAL_NAME` | `Gold` |
//! | `AURUM_SERIES_PATH` | `gold_ohlc_per_gram.csv` |
//! | `AURUM_SETTLEMENT_LAG_DAYS` | `3` |
//! | `AURUM_WINDOW` | `trailing:7` |
//! | `AURUM_INCLUDE_MEAN_CLOSE` | `true` |
//! | `AURUM_TIMEOUT_MS` | `10000` |
//! | `TELEGRAM_TOKEN` / `TELEGRAM_CHAT_ID` | required for sending |

use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::adapters::DEFAULT_BASE_URL;
use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::source::validate_asset_code;
use crate::window::WindowPolicy;

pub const DEFAULT_SERIES_PATH: &str = "gold_ohlc_per_gram.csv";
pub const DEFAULT_SETTLEMENT_LAG_DAYS: u32 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Telegram delivery settings.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
}

impl Debug for TelegramConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub provider_base_url: String,
    pub base: String,
    pub quote: String,
    pub metal_name: String,
    pub series_path: PathBuf,
    pub settlement_lag_days: u32,
    pub window: WindowPolicy,
    pub include_mean_close: bool,
    pub timeout_ms: u64,
    pub telegram: Option<TelegramConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider_base_url: String::from(DEFAULT_BASE_URL),
            base: String::from("XAU"),
            quote: String::from("MYR"),
            metal_name: String::from("Gold"),
            series_path: PathBuf::from(DEFAULT_SERIES_PATH),
            settlement_lag_days: DEFAULT_SETTLEMENT_LAG_DAYS,
            window: WindowPolicy::default(),
            include_mean_close: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            telegram: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any name-to-value lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let base = match get("AURUM_BASE") {
            Some(value) => asset_code("AURUM_BASE", &value)?,
            None => defaults.base,
        };
        let quote = match get("AURUM_QUOTE") {
            Some(value) => asset_code("AURUM_QUOTE", &value)?,
            None => defaults.quote,
        };

        let telegram = match (get("TELEGRAM_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(token), Some(chat_id)) => Some(TelegramConfig { token, chat_id }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingEnvVar("TELEGRAM_CHAT_ID")),
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar("TELEGRAM_TOKEN")),
        };

        Ok(Self {
            api_key: get("METALPRICE_API_KEY"),
            provider_base_url: get("METALPRICE_BASE_URL").unwrap_or(defaults.provider_base_url),
            base,
            quote,
            metal_name: get("AURUM_METAL_NAME").unwrap_or(defaults.metal_name),
            series_path: get("AURUM_SERIES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.series_path),
            settlement_lag_days: parse_or(
                "AURUM_SETTLEMENT_LAG_DAYS",
                get("AURUM_SETTLEMENT_LAG_DAYS"),
                defaults.settlement_lag_days,
            )?,
            window: parse_or("AURUM_WINDOW", get("AURUM_WINDOW"), defaults.window)?,
            include_mean_close: match get("AURUM_INCLUDE_MEAN_CLOSE") {
                Some(value) => parse_flag("AURUM_INCLUDE_MEAN_CLOSE", &value)?,
                None => defaults.include_mean_close,
            },
            timeout_ms: parse_or("AURUM_TIMEOUT_MS", get("AURUM_TIMEOUT_MS"), defaults.timeout_ms)?,
            telegram,
        })
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar("METALPRICE_API_KEY"))
    }

    pub fn require_telegram(&self) -> Result<&TelegramConfig, ConfigError> {
        self.telegram
            .as_ref()
            .ok_or(ConfigError::MissingEnvVar("TELEGRAM_TOKEN"))
    }
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("provider_base_url", &self.provider_base_url)
            .field("base", &self.base)
            .field("quote", &self.quote)
            .field("metal_name", &self.metal_name)
            .field("series_path", &self.series_path)
            .field("settlement_lag_days", &self.settlement_lag_days)
            .field("window", &self.window)
            .field("include_mean_close", &self.include_mean_close)
            .field("timeout_ms", &self.timeout_ms)
            .field("telegram", &self.telegram)
            .finish()
    }
}

fn asset_code(name: &'static str, value: &str) -> Result<String, ConfigError> {
    validate_asset_code(value).map_err(|error| ConfigError::InvalidValue {
        name,
        reason: error.to_string(),
    })
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.parse().map_err(|error: T::Err| ConfigError::InvalidValue {
            name,
            reason: error.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            name,
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.series_path, PathBuf::from("gold_ohlc_per_gram.csv"));
        assert_eq!(config.settlement_lag_days, 3);
        assert_eq!(
            config.require_api_key(),
            Err(ConfigError::MissingEnvVar("METALPRICE_API_KEY"))
        );
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("METALPRICE_API_KEY", "k"),
            ("AURUM_BASE", "xag"),
            ("AURUM_QUOTE", "usd"),
            ("AURUM_WINDOW", "week"),
            ("AURUM_INCLUDE_MEAN_CLOSE", "no"),
            ("AURUM_SETTLEMENT_LAG_DAYS", "1"),
            ("AURUM_TIMEOUT_MS", "2500"),
            ("TELEGRAM_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "42"),
        ]))
        .expect("config");

        assert_eq!(config.require_api_key(), Ok("k"));
        assert_eq!(config.base, "XAG");
        assert_eq!(config.quote, "USD");
        assert_eq!(config.window, WindowPolicy::SinceMostRecentMonday);
        assert!(!config.include_mean_close);
        assert_eq!(config.settlement_lag_days, 1);
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.require_telegram().expect("telegram").chat_id, "42");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("AURUM_TIMEOUT_MS", "soon")])),
            Err(ConfigError::InvalidValue {
                name: "AURUM_TIMEOUT_MS",
                ..
            })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("AURUM_WINDOW", "monthly")])),
            Err(ConfigError::InvalidValue { name: "AURUM_WINDOW", .. })
        ));
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("TELEGRAM_TOKEN", "t")])),
            Err(ConfigError::MissingEnvVar("TELEGRAM_CHAT_ID"))
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig::from_lookup(lookup(&[
            ("METALPRICE_API_KEY", "api-secret"),
            ("TELEGRAM_TOKEN", "bot-secret"),
            ("TELEGRAM_CHAT_ID", "42"),
        ]))
        .expect("config");

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("api-secret"));
        assert!(!rendered.contains("bot-secret"));
        assert!(rendered.contains("42"));
    }
}
