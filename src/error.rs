use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error fetching {url}: {status}")]
    Status { url: String, status: u16 },

    #[error("Error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Why a completion reply could not be turned into records. Both kinds keep
/// the reply text exactly as received.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to parse model reply as JSON ({source}). Raw reply:\n{raw}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Model reply is not a JSON array of objects (found {found}). Raw reply:\n{raw}")]
    UnexpectedShape { raw: String, found: String },
}

impl DecodeError {
    pub fn raw_reply(&self) -> &str {
        match self {
            DecodeError::InvalidJson { raw, .. } | DecodeError::UnexpectedShape { raw, .. } => raw,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY environment variable not set.")]
    MissingApiKey,

    #[error("Invalid settings: {0}")]
    Settings(#[from] config::ConfigError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open database {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion response has no message content")]
    EmptyResponse,
}

/// Everything that can abort one pipeline run. A `ConfigError` happens at
/// startup, before any pipeline exists, so it is not part of this enum.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
