//! # rv-config
//!
//! Layered settings: built-in defaults, then an optional `rusty-verse.toml`,
//! then `RUSTY_VERSE__SECTION__KEY` environment variables (a `.env` file is
//! loaded first when present).

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub log: LogSettings,
    pub gateway: GatewaySettings,
    pub identity: IdentitySettings,
    pub chat: ChatSettings,
    pub limits: LimitSettings,
    /// `.env` file read by [`Settings::load`], if one was found.
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayBackend {
    Memory,
    Sqlite,
    Rest,
}

#[derive(Debug, Deserialize)]
pub struct GatewaySettings {
    pub backend: GatewayBackend,
    pub sqlite_url: String,
    pub rest_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySettings {
    /// Actor used when a request does not name one.
    pub default_user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    pub reply_delay_ms: u64,
}

impl ChatSettings {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    pub gallery: usize,
    pub profile: usize,
    pub training_sample: usize,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl Settings {
    /// Loads settings from every source. Runs before logging is set up,
    /// so the `.env` path is returned in [`Settings::env_file`] for the
    /// caller to report.
    pub fn load() -> Result<Self, SettingsError> {
        let env_file = dotenvy::dotenv().ok();
        let mut settings = Self::from_builder(
            Self::defaults()?
                .add_source(File::with_name("rusty-verse").required(false))
                .add_source(
                    Environment::with_prefix("RUSTY_VERSE")
                        .prefix_separator("__")
                        .separator("__")
                        .try_parsing(true),
                ),
        )?;
        settings.env_file = env_file;
        Ok(settings)
    }

    /// Defaults only; useful for tests and local demos.
    pub fn default_settings() -> Result<Self, SettingsError> {
        Self::from_builder(Self::defaults()?)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, SettingsError> {
        Ok(Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("log.filter", "info")?
            .set_default("log.json", false)?
            .set_default("gateway.backend", "memory")?
            .set_default("gateway.sqlite_url", "sqlite:rusty_verse.db")?
            .set_default("identity.default_user_id", "demo-user")?
            .set_default("chat.reply_delay_ms", 800_i64)?
            .set_default("limits.gallery", 20_i64)?
            .set_default("limits.profile", 10_i64)?
            .set_default("limits.training_sample", 5_i64)?)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.gateway.backend == GatewayBackend::Rest && self.gateway.rest_url.is_none() {
            return Err(SettingsError::Invalid(
                "gateway.rest_url is required for the rest backend".into(),
            ));
        }
        if self.identity.default_user_id.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "identity.default_user_id must not be blank".into(),
            ));
        }
        Ok(())
    }
}
