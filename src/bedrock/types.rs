use serde::{Deserialize, Serialize};

use crate::FlavorError;

pub const SCHEMA_VERSION: &str = "messages-v1";

/// Body of an `InvokeModel` call against a Nova model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system: Vec<SystemBlock>,
    pub messages: Vec<Message>,
    pub inference_config: InferenceConfig,
}

impl InvokeRequest {
    /// A single user turn with the given content blocks.
    pub fn user(content: Vec<ContentBlock>, inference_config: InferenceConfig) -> Self {
        InvokeRequest {
            schema_version: Some(SCHEMA_VERSION.to_string()),
            system: Vec::new(),
            messages: vec![Message {
                role: Role::User,
                content,
            }],
            inference_config,
        }
    }

    pub fn with_system(mut self, text: impl Into<String>) -> Self {
        self.system.push(SystemBlock { text: text.into() });
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemBlock {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One block of a message; serializes as `{"text": ..}`, `{"image": ..}` or `{"video": ..}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentBlock {
    Text(String),
    Image(MediaBlock),
    Video(MediaBlock),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaBlock {
    pub format: String,
    pub source: MediaSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSource {
    /// Base64-encoded payload
    pub bytes: String,
}

/// Sampling parameters; field names are the ones Nova expects on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub max_new_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
    pub temperature: f32,
}

impl InferenceConfig {
    pub const fn new(max_new_tokens: u32, top_p: f32, top_k: u32, temperature: f32) -> Self {
        InferenceConfig {
            max_new_tokens,
            top_p,
            top_k,
            temperature,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeResponse {
    pub output: Output,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Output {
    pub message: OutputMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputMessage {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputContent {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl InvokeResponse {
    /// Text of the first content block, i.e. `output.message.content[0].text`.
    pub fn into_text(self) -> Result<String, FlavorError> {
        self.output
            .message
            .content
            .into_iter()
            .next()
            .ok_or_else(|| FlavorError::MalformedResponse("no content in model output".to_string()))?
            .text
            .ok_or_else(|| {
                FlavorError::MalformedResponse("first content block has no text".to_string())
            })
    }
}

/// Parse a raw reply body and pull out the generated text.
pub fn parse_response_text(body: &str) -> Result<String, FlavorError> {
    let response: InvokeResponse = serde_json::from_str(body)?;
    response.into_text()
}
