use super::{ChatMessage, CompletionRequest, Role};

pub const SYSTEM_INSTRUCTION: &str = "You are an expert data extractor.";

const TASK: &str = "\
You are an expert data extractor. Your task is to analyze the following text and extract a list of venture capital (VC) firms.
For each VC firm, provide:
- \"Name\": The name of the VC firm.
- \"Location\": The headquarters or main location.
- \"Website\": The website URL.
- \"Focus\": The sectors or industries the firm invests in (if available).
Output the result as a JSON array where each element is an object with exactly these keys.
Output only the JSON array, with no other text.";

/// The user-facing instruction with `text` embedded verbatim at the end.
pub fn user_prompt(text: &str) -> String {
    format!("{}\n\nText to analyze:\n{}\n", TASK, text)
}

/// Greedy decoding, capped at `max_tokens`.
pub fn build_request(text: &str, max_tokens: u32) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ChatMessage {
                role: Role::System,
                content: SYSTEM_INSTRUCTION.to_string(),
            },
            ChatMessage {
                role: Role::User,
                content: user_prompt(text),
            },
        ],
        temperature: 0.0,
        max_tokens,
    }
}
