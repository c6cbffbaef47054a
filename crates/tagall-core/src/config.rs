use std::num::NonZeroUsize;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::strings::Locale;

pub const DEFAULT_MESSAGE: &str = "@all";
pub const DEFAULT_TIMEOUT_SECS: f64 = 0.1;
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Top-level config (tagall.toml + TAGALL_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagallConfig {
    #[serde(default)]
    pub locale: Locale,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub tagall: TagAllOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Token of the secondary bot used when `tagall.use_bot` is set.
    #[serde(default)]
    pub helper_bot_token: Option<String>,
    /// Who may run `/tagall`: numeric ids or usernames, `"*"` for everyone.
    /// Empty means nobody (deny-by-default).
    #[serde(default)]
    pub allow_users: Vec<String>,
    /// When true, chat administrators may run `/tagall` in their chat.
    #[serde(default)]
    pub allow_admins: bool,
}

/// Raw tagging options as written in the config file.
///
/// Call [`TagAllOptions::resolve`] to obtain a validated [`DeliveryConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagAllOptions {
    #[serde(default = "default_message")]
    pub default_message: String,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub use_bot: bool,
    /// Pause between tag messages, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    #[serde(default)]
    pub silent: bool,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for TagAllOptions {
    fn default() -> Self {
        Self {
            default_message: default_message(),
            delete: false,
            use_bot: false,
            timeout: DEFAULT_TIMEOUT_SECS,
            silent: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl TagAllOptions {
    /// Validate the raw options into an immutable delivery snapshot.
    pub fn resolve(&self) -> Result<DeliveryConfig> {
        if !self.timeout.is_finite() || self.timeout < 0.0 {
            return Err(CoreError::InvalidOption {
                option: "timeout",
                reason: format!("expected a non-negative number of seconds, got {}", self.timeout),
            });
        }
        let pause = Duration::try_from_secs_f64(self.timeout).map_err(|e| {
            CoreError::InvalidOption {
                option: "timeout",
                reason: e.to_string(),
            }
        })?;
        let batch_size =
            NonZeroUsize::new(self.batch_size).ok_or_else(|| CoreError::InvalidOption {
                option: "batch_size",
                reason: "must be at least 1".to_string(),
            })?;

        Ok(DeliveryConfig {
            default_message: self.default_message.clone(),
            delete: self.delete,
            use_bot: self.use_bot,
            pause,
            silent: self.silent,
            batch_size,
        })
    }
}

/// Validated configuration for one tagging invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub default_message: String,
    pub delete: bool,
    pub use_bot: bool,
    pub pause: Duration,
    pub silent: bool,
    pub batch_size: NonZeroUsize,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            default_message: default_message(),
            delete: false,
            use_bot: false,
            pause: Duration::from_millis(100),
            silent: false,
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}
fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl TagallConfig {
    /// Load config from a TOML file with TAGALL_* env var overrides.
    ///
    /// Nested keys are separated by a double underscore in env vars,
    /// e.g. `TAGALL_TELEGRAM__BOT_TOKEN` or `TAGALL_TAGALL__USE_BOT`.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(&path))
                .merge(Env::prefixed("TAGALL_").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Resolve the delivery snapshot and check it against the Telegram setup.
    pub fn delivery(&self) -> Result<DeliveryConfig> {
        let delivery = self.tagall.resolve()?;
        if delivery.use_bot && self.telegram.helper_bot_token.is_none() {
            return Err(CoreError::InvalidOption {
                option: "use_bot",
                reason: "requires telegram.helper_bot_token".to_string(),
            });
        }
        tracing::debug!(
            delete = delivery.delete,
            use_bot = delivery.use_bot,
            pause = ?delivery.pause,
            silent = delivery.silent,
            batch_size = delivery.batch_size.get(),
            "delivery config resolved"
        );
        Ok(delivery)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.tagall/tagall.toml", home)
}
