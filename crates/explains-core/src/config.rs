use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_ENGINE_CONFIG_ENV: &str = "CONFIG";
pub const TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";

/// Top-level config (explains.toml + EXPLAINS_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub engine: EngineSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Usually left empty in the file and supplied through `DISCORD_BOT_TOKEN`.
    #[serde(default)]
    pub bot_token: String,
    /// Leading text that marks a message as a command.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Online status set on ready: "online", "idle", "dnd", "invisible".
    #[serde(default = "default_status")]
    pub status: String,
    /// Activity kind: "playing", "listening", "watching", "competing", "custom".
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default = "default_activity_name")]
    pub activity_name: Option<String>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            prefix: default_prefix(),
            status: default_status(),
            activity_type: None,
            activity_name: default_activity_name(),
        }
    }
}

/// Where the explanation engine finds its own configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Name of the environment variable holding the engine's JSON config.
    #[serde(default = "default_engine_config_env")]
    pub config_env: String,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            config_env: default_engine_config_env(),
        }
    }
}

/// Configuration handed to the explanation engine for one invocation.
///
/// Built fresh from the environment every time `explains` runs. Keys the bot
/// does not know about are carried through untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_engine_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_engine_model")]
    pub model: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EngineConfig {
    /// Read and parse the JSON payload stored in environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self> {
        let raw = std::env::var(var).map_err(|_| CoreError::MissingEnv {
            name: var.to_string(),
        })?;
        Self::from_json(var, &raw)
    }

    /// Parse a JSON payload; `source` names where it came from for error messages.
    pub fn from_json(source: &str, raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| CoreError::MalformedEnv {
            name: source.to_string(),
            source: e,
        })
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}
fn default_status() -> String {
    "idle".to_string()
}
fn default_activity_name() -> Option<String> {
    Some("Listening to !explains".to_string())
}
fn default_engine_config_env() -> String {
    DEFAULT_ENGINE_CONFIG_ENV.to_string()
}
fn default_engine_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_engine_model() -> String {
    "gpt-4o-mini".to_string()
}

impl BotConfig {
    /// Load config from a TOML file with EXPLAINS_* env var overrides.
    ///
    /// Nested keys use a double underscore: `EXPLAINS_DISCORD__PREFIX=?`.
    /// `DISCORD_BOT_TOKEN` wins over any token found in the file.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let mut config: BotConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("EXPLAINS_").split("__"))
            .extract()
            .map_err(|e| CoreError::Config(e.to_string()))?;

        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                config.discord.bot_token = token;
            }
        }

        if config.discord.bot_token.trim().is_empty() {
            return Err(CoreError::Config(format!(
                "no bot token configured (set {TOKEN_ENV} or discord.bot_token)"
            )));
        }
        if config.discord.prefix.is_empty() {
            return Err(CoreError::Config(
                "discord.prefix must not be empty".to_string(),
            ));
        }

        tracing::debug!(path = %path, prefix = %config.discord.prefix, "config loaded");
        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.explains/explains.toml", home)
}
