pub mod decode;
pub mod openai;
pub mod prompt;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{CompletionError, PipelineError};

pub use decode::decode_reply;
pub use openai::OpenAiClient;

/// One firm as the model described it. All four fields are always present;
/// anything the reply left out is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Focus")]
    pub focus: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A text-completion endpoint: one request in, the reply text out.
pub trait CompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

impl<C: CompletionService> CompletionService for &C {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        (**self).complete(request).await
    }
}

pub struct Extractor<C> {
    service: C,
    max_tokens: u32,
}

impl<C: CompletionService> Extractor<C> {
    pub fn new(service: C, max_tokens: u32) -> Self {
        Extractor {
            service,
            max_tokens,
        }
    }

    /// Ask the completion service for the firms in `text` and decode its reply.
    pub async fn extract(&self, text: &str) -> Result<Vec<ExtractedRecord>, PipelineError> {
        let request = prompt::build_request(text, self.max_tokens);
        info!(
            text_chars = text.chars().count(),
            max_tokens = self.max_tokens,
            "Requesting extraction"
        );

        let reply = self.service.complete(&request).await?;
        info!("Completion reply: {} chars", reply.len());

        match decode_reply(&reply) {
            Ok(records) => {
                info!("Decoded {} records", records.len());
                Ok(records)
            }
            Err(e) => {
                warn!(raw_reply = %e.raw_reply(), "Failed to parse model reply");
                Err(e.into())
            }
        }
    }
}
