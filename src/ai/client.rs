//! 生成 AI クライアント
//!
//! `TextGenerator` が唯一の外部依存点。本番では Gemini の
//! `generateContent` REST API を呼び出す。

use crate::config::AiConfig;
use crate::error::ai::Result;
use crate::error::AiError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// プロンプトからテキストを生成する外部サービス
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Gemini REST クライアント
pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        let model = config
            .model
            .strip_prefix("models/")
            .unwrap_or(&config.model);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            config.endpoint.trim_end_matches('/'),
            model
        );

        Self {
            agent,
            api_key: config.api_key.clone(),
            url,
            timeout: config.timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        log::debug!("POST {} ({} prompt bytes)", self.url, prompt.len());
        let response = self
            .agent
            .post(&self.url)
            .query("key", &self.api_key)
            .send_json(&request);

        match response {
            Ok(response) => {
                let body: GenerateContentResponse =
                    response.into_json().map_err(|err| AiError::InvalidResponse {
                        message: err.to_string(),
                    })?;
                extract_text(body)
            }
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(AiError::Status {
                    code,
                    message: api_error_message(&body),
                })
            }
            Err(ureq::Error::Transport(transport)) => Err(AiError::Transport {
                message: transport.to_string(),
            }),
        }
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(default, rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

fn extract_text(body: GenerateContentResponse) -> Result<String> {
    let block_reason = body.prompt_feedback.and_then(|feedback| feedback.block_reason);
    let Some(candidate) = body.candidates.into_iter().next() else {
        return Err(AiError::EmptyResponse {
            reason: block_reason,
        });
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AiError::EmptyResponse {
            reason: candidate.finish_reason.or(block_reason),
        });
    }
    Ok(text)
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => match parsed.error.status {
            Some(status) if !status.is_empty() => format!("{} ({})", parsed.error.message, status),
            _ => parsed.error.message,
        },
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().chars().take(200).collect(),
    }
}
