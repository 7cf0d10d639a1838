/// LLM Client: the single point of entry for all OpenAI API calls.
///
/// ARCHITECTURAL RULE: No other module may call the provider directly.
/// All LLM interactions MUST go through this module.
///
/// Calls are made once: a failure is reported straight back to the caller,
/// who decides what to tell the user.
use bytes::Bytes;
use reqwest::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// Model used to read uploaded papers and write the review.
pub const REVIEW_MODEL: &str = "gpt-4o";
/// Model behind the plain prompt-forwarding endpoint.
pub const COMPLETION_MODEL: &str = "gpt-4";
const FILE_PURPOSE: &str = "user_data";
const INVALID_KEY_MARKER: &str = "Incorrect API key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API key. Please check your API key and try again.")]
    InvalidApiKey,

    #[error("File upload failed: {0}")]
    Upload(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

/// File object returned by `POST /files`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: Vec<InputMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'a str,
    content: Vec<InputContent<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputContent<'a> {
    InputFile { file_id: &'a str },
}

#[derive(Debug, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub output: Vec<OutputItem>,
    pub usage: Option<ResponsesUsage>,
}

#[derive(Debug, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsesUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl ResponsesResponse {
    /// Concatenates every `output_text` part of every message item.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.content_type == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by every handler.
/// API keys are passed per call: callers may bring their own.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LlmError> {
        let base_url: String = base_url.into();
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(180))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    /// Uploads a paper so the model can read it as an `input_file`.
    pub async fn upload_file(
        &self,
        api_key: &str,
        file_name: &str,
        mime: &str,
        data: Bytes,
    ) -> Result<UploadedFile, LlmError> {
        let part = multipart::Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("purpose", FILE_PURPOSE);

        let response = self
            .client
            .post(self.url("files"))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(match error_from_response(response).await {
                LlmError::Api { message, .. } => LlmError::Upload(message),
                other => other,
            });
        }

        let file: UploadedFile = response.json().await?;
        debug!(
            file_id = %file.id,
            filename = ?file.filename,
            bytes = ?file.bytes,
            "Uploaded paper to provider"
        );
        Ok(file)
    }

    /// Asks the review model to answer `instructions` about an uploaded file.
    pub async fn create_response(
        &self,
        api_key: &str,
        instructions: &str,
        file_id: &str,
    ) -> Result<String, LlmError> {
        let request_body = ResponsesRequest {
            model: REVIEW_MODEL,
            instructions,
            input: vec![InputMessage {
                role: "user",
                content: vec![InputContent::InputFile { file_id }],
            }],
        };

        let response = self
            .client
            .post(self.url("responses"))
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: ResponsesResponse = response.json().await?;
        if let Some(usage) = &parsed.usage {
            debug!(
                "Review call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        let text = parsed.output_text();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text)
    }

    /// Sends a single user prompt to the chat model and returns its reply.
    pub async fn chat(&self, api_key: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: COMPLETION_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Turns a non-success response into an `LlmError`, recognising rejected keys.
async fn error_from_response(response: Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<OpenAiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    if message.contains(INVALID_KEY_MARKER) {
        return LlmError::InvalidApiKey;
    }
    LlmError::Api { status, message }
}
