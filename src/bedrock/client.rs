use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;

use super::types::{InvokeRequest, InvokeResponse};
use crate::config::BedrockConfig;
use crate::FlavorError;

/// Bedrock runtime client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct BedrockClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BedrockClient {
    /// Create a new client from configuration
    pub fn new(config: &BedrockConfig, timeout: Duration) -> Result<Self, FlavorError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("AWS_BEARER_TOKEN_BEDROCK").ok())
            .ok_or_else(|| {
                FlavorError::MissingCredentials(
                    "AWS_BEARER_TOKEN_BEDROCK not found in config or environment".to_string(),
                )
            })?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(BedrockClient {
            client,
            base_url: config.endpoint(),
            api_key,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        BedrockClient {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke a model and deserialize its reply.
    pub async fn invoke(
        &self,
        model_id: &str,
        request: &InvokeRequest,
    ) -> Result<InvokeResponse, FlavorError> {
        let url = format!("{}/model/{}/invoke", self.base_url, model_id);
        debug!("Invoking {} ({} message(s))", model_id, request.messages.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("{} returned {}", model_id, status);
            return Err(FlavorError::Service {
                status: status.as_u16(),
                body,
            });
        }

        debug!("{} response: {}", model_id, body);
        let parsed: InvokeResponse = serde_json::from_str(&body)?;

        if let Some(usage) = parsed.usage {
            debug!(
                "{} used {} input / {} output tokens",
                model_id, usage.input_tokens, usage.output_tokens
            );
        }

        Ok(parsed)
    }

    /// Invoke a model and return `output.message.content[0].text`.
    pub async fn invoke_text(
        &self,
        model_id: &str,
        request: &InvokeRequest,
    ) -> Result<String, FlavorError> {
        self.invoke(model_id, request).await?.into_text()
    }
}
