//! Typed access to the Bedrock runtime `InvokeModel` API for Nova models.

mod client;
mod types;

pub use client::BedrockClient;
pub use types::{
    parse_response_text, ContentBlock, InferenceConfig, InvokeRequest, InvokeResponse, MediaBlock,
    MediaSource, Message, Output, OutputContent, OutputMessage, Role, SystemBlock, Usage,
    SCHEMA_VERSION,
};
