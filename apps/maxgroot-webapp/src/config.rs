use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use maxgroot_auth::BotSecret;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://grangy.ru/api";

const CONFIG_PATHS: [&str; 2] = ["/etc/maxgroot/webapp.toml", "./webapp.toml"];

#[derive(Clone, Deserialize)]
pub struct WebappConfig {
    /// Telegram bot token. Absent means reduced-trust mode.
    #[serde(default)]
    pub bot_token: Option<String>,
    pub api_url: String,
    pub api_secret: String,
    pub listen_port: u16,
    pub mini_app_dir: PathBuf,
    pub plans_cache_ttl_secs: u64,
    pub init_data_max_age_secs: u64,
    pub upstream_timeout_secs: u64,
}

impl WebappConfig {
    /// Defaults, then `/etc/maxgroot/webapp.toml`, then `./webapp.toml`,
    /// then environment variables (`BOT_TOKEN`, `API_URL`, `API_SECRET`, ...).
    pub fn load() -> Result<Self> {
        let mut builder = Self::defaults()?;
        for path in CONFIG_PATHS {
            if Path::new(path).is_file() {
                tracing::info!("Loading config from {}", path);
            }
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(false));
        }

        let settings = builder
            .add_source(Self::environment())
            .build()
            .context("Failed to read webapp configuration")?;

        Self::from_settings(settings)
    }

    /// Values stay strings until deserialized, so secrets are taken verbatim.
    fn environment() -> Environment {
        Environment::default()
    }

    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("listen_port", 3000)?
            .set_default("mini_app_dir", "dist")?
            .set_default("plans_cache_ttl_secs", 300)?
            .set_default("init_data_max_age_secs", 86_400)?
            .set_default("upstream_timeout_secs", 10)?)
    }

    pub fn from_settings(settings: Config) -> Result<Self> {
        let mut config: Self = settings
            .try_deserialize()
            .context("Invalid webapp configuration")?;

        if config.api_secret.trim().is_empty() {
            anyhow::bail!("api_secret (API_SECRET) is required");
        }
        config.api_url = config.api_url.trim_end_matches('/').to_string();

        Ok(config)
    }

    pub fn bot_secret(&self) -> Option<BotSecret> {
        self.bot_token.as_deref().and_then(BotSecret::new)
    }

    pub fn plans_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.plans_cache_ttl_secs)
    }

    pub fn init_data_max_age(&self) -> Duration {
        Duration::from_secs(self.init_data_max_age_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

impl fmt::Debug for WebappConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebappConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "***"))
            .field("api_url", &self.api_url)
            .field("api_secret", &"***")
            .field("listen_port", &self.listen_port)
            .field("mini_app_dir", &self.mini_app_dir)
            .field("plans_cache_ttl_secs", &self.plans_cache_ttl_secs)
            .field("init_data_max_age_secs", &self.init_data_max_age_secs)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .finish()
    }
}
