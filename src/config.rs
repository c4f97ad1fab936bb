//! Process configuration loaded from the environment (and `.env` when present).

use crate::{Error, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_FOURO_IMAGE_BASE_URL: &str = "https://4oimageapiio.erweima.ai";
pub const DEFAULT_UNSPLASH_BASE_URL: &str = "https://api.unsplash.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub deepseek_api_key: Option<String>,
    pub fouro_image_api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
    pub public_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub chat_model: String,
    pub deepseek_base_url: String,
    pub fouro_image_base_url: String,
    pub unsplash_base_url: String,
    pub poll: PollSettings,
}

/// Bounds for the blocking wait loop and the secondary query paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub attempts: usize,
    pub interval: Duration,
    pub query_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval: Duration::from_millis(2000),
            query_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let or_default = |key: &str, default: &str| {
            get(key).unwrap_or_else(|| {
                info!("{} not set, using default: {}", key, default);
                default.to_string()
            })
        };

        let defaults = PollSettings::default();
        let poll = PollSettings {
            attempts: parse(&get, "POLL_ATTEMPTS", defaults.attempts)?,
            interval: Duration::from_millis(parse(
                &get,
                "POLL_INTERVAL_MS",
                defaults.interval.as_millis() as u64,
            )?),
            query_timeout: Duration::from_secs(parse(
                &get,
                "QUERY_TIMEOUT_SECS",
                defaults.query_timeout.as_secs(),
            )?),
        };

        Ok(Self {
            deepseek_api_key: get("DEEPSEEK_API_KEY"),
            fouro_image_api_key: get("FOURO_IMAGE_API_KEY"),
            unsplash_access_key: get("UNSPLASH_ACCESS_KEY"),
            public_url: get("PUBLIC_URL").map(|url| url.trim_end_matches('/').to_string()),
            host: or_default("HOST", "0.0.0.0"),
            port: parse(&get, "PORT", 3000)?,
            static_dir: or_default("STATIC_DIR", "public"),
            chat_model: or_default("CHAT_MODEL", "deepseek-chat"),
            deepseek_base_url: or_default("DEEPSEEK_BASE_URL", DEFAULT_DEEPSEEK_BASE_URL),
            fouro_image_base_url: or_default("FOURO_IMAGE_BASE_URL", DEFAULT_FOURO_IMAGE_BASE_URL),
            unsplash_base_url: or_default("UNSPLASH_BASE_URL", DEFAULT_UNSPLASH_BASE_URL),
            poll,
        })
    }

    /// `{PUBLIC_URL}/api/4oimage-callback`, or `None` to run in poll mode.
    pub fn callback_url(&self) -> Option<String> {
        self.public_url
            .as_ref()
            .map(|base| format!("{}/api/4oimage-callback", base))
    }
}

fn parse<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {} value '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}
