//! Search-term expansion through a chat-completions language model.
//!
//! The model is asked for the alternative spellings of a dish name across
//! English, Marathi and Hindi (Latin and Devanagari) and answers with a JSON
//! array of strings.

use std::time::Duration;

use async_trait::async_trait;
use kitchen_core::search::{QueryExpander, SearchError};
use serde::Deserialize;
use serde_json::json;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const SYSTEM_PROMPT: &str = "You expand food search terms for an Indian home kitchen. \
Given a dish or ingredient name, reply with a JSON array of at most 6 strings: \
the common English, Marathi and Hindi spellings in both Latin and Devanagari script. \
Reply with the JSON array only.";

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Chat-completions endpoint, e.g. `https://api.openai.com/v1/chat/completions`.
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

impl LlmConfig {
    /// `LLM_API_URL`, `LLM_API_KEY`, `LLM_MODEL`. `None` unless URL and key
    /// are both set.
    pub fn from_env() -> Option<Self> {
        let var = |key: &str| std::env::var(key).ok().filter(|v: &String| !v.is_empty());
        Some(Self {
            api_url: var("LLM_API_URL")?,
            api_key: var("LLM_API_KEY")?,
            model: var("LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransliterationError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Language model returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Language model reply could not be used: {0}")]
    Malformed(String),
}

impl From<TransliterationError> for SearchError {
    fn from(e: TransliterationError) -> Self {
        SearchError::Expansion(e.to_string())
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub struct LlmTransliterator {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmTransliterator {
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    pub async fn spellings(&self, term: &str) -> Result<Vec<String>, TransliterationError> {
        let body = json!({
            "model": self.config.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": term },
            ],
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransliterationError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| TransliterationError::Malformed("no choices".into()))?;
        parse_spellings(&content)
    }
}

/// Accepts a bare JSON array, one wrapped in a code fence, or as a last
/// resort a comma/newline separated list.
fn parse_spellings(content: &str) -> Result<Vec<String>, TransliterationError> {
    let trimmed = content.trim();
    let body = match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    };
    if let Ok(list) = serde_json::from_str::<Vec<String>>(body) {
        return Ok(list);
    }

    let list: Vec<String> = trimmed
        .split([',', '\n'])
        .map(|s| s.trim().trim_matches(|c: char| c == '"' || c == '`' || c == '-').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if list.is_empty() {
        return Err(TransliterationError::Malformed(trimmed.chars().take(80).collect()));
    }
    Ok(list)
}

#[async_trait]
impl QueryExpander for LlmTransliterator {
    async fn expand(&self, term: &str) -> Result<Vec<String>, SearchError> {
        Ok(self.spellings(term).await?)
    }
}
