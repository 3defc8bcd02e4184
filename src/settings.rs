use std::fmt;
use std::path::PathBuf;

use config::{Config, Environment, Map};
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_DB_PATH: &str = "vc_data.db";

/// Completion-service credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        ApiKey(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub model: String,
    pub max_tokens: u32,
    pub api_base: String,
    pub db_path: PathBuf,
    pub api_key: ApiKey,
}

#[derive(Deserialize)]
struct Layered {
    model: String,
    max_tokens: u32,
    api_base: String,
    db_path: PathBuf,
}

impl Settings {
    /// Defaults, then `VC_*` variables. The credential comes only from
    /// `OPENAI_API_KEY`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(None)
    }

    /// Same layering as [`Settings::load`] but reading from `vars` instead of
    /// the process environment when given.
    pub fn from_vars(vars: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let layered: Layered = Config::builder()
            .set_default("model", DEFAULT_MODEL)?
            .set_default("max_tokens", i64::from(DEFAULT_MAX_TOKENS))?
            .set_default("api_base", DEFAULT_API_BASE)?
            .set_default("db_path", DEFAULT_DB_PATH)?
            .add_source(
                Environment::with_prefix("VC")
                    .try_parsing(true)
                    .source(vars.clone()),
            )
            .build()?
            .try_deserialize()?;

        let api_key = match api_key_from(vars)? {
            Some(key) if !key.trim().is_empty() => ApiKey::new(key.trim()),
            _ => return Err(ConfigError::MissingApiKey),
        };

        Ok(Settings {
            model: layered.model,
            max_tokens: layered.max_tokens,
            api_base: layered.api_base,
            db_path: layered.db_path,
            api_key,
        })
    }

    /// Command-line flags win over every other layer.
    pub fn apply_cli(&mut self, db: Option<PathBuf>, model: Option<String>) {
        if let Some(db) = db {
            self.db_path = db;
        }
        if let Some(model) = model {
            self.model = model;
        }
    }
}

fn api_key_from(vars: Option<Map<String, String>>) -> Result<Option<String>, ConfigError> {
    let env = Config::builder()
        .add_source(Environment::with_prefix("OPENAI").source(vars))
        .build()?;
    match env.get_string("api_key") {
        Ok(key) => Ok(Some(key)),
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
