use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::LabelConfig;
use crate::extractors::IngredientExtractor;
use crate::media::{EncodedMedia, MediaKind};
use crate::FlavorError;

const VISION_BASE_URL: &str = "https://vision.googleapis.com";

/// Ingredient extraction from Google Cloud Vision label detection.
///
/// Labels are generic object names ("Vegetable", "Tomato", "Produce"), so the
/// output is coarser than the vision-language backend. Images only.
pub struct LabelExtractor {
    client: Client,
    api_key: String,
    base_url: String,
    max_labels: u32,
    min_confidence: f32,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResult {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    error: Option<AnnotateError>,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    description: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct AnnotateError {
    #[serde(default)]
    message: String,
}

impl LabelExtractor {
    /// Create a new label extractor from configuration
    pub fn new(config: &LabelConfig, timeout: Duration) -> Result<Self, FlavorError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                FlavorError::MissingCredentials(
                    "GOOGLE_API_KEY not found in config or environment".to_string(),
                )
            })?;

        Ok(LabelExtractor {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| VISION_BASE_URL.to_string()),
            max_labels: config.max_labels,
            min_confidence: config.min_confidence,
        })
    }

    fn format_labels(&self, labels: Vec<LabelAnnotation>) -> Result<String, FlavorError> {
        let kept: Vec<String> = labels
            .into_iter()
            .filter(|label| label.score >= self.min_confidence)
            .take(self.max_labels as usize)
            .map(|label| format!("- {} ({:.0}%)", label.description, label.score * 100.0))
            .collect();

        if kept.is_empty() {
            return Err(FlavorError::MalformedResponse(
                "No labels detected in image".to_string(),
            ));
        }

        Ok(format!("## Identified Ingredients\n{}", kept.join("\n")))
    }
}

#[async_trait]
impl IngredientExtractor for LabelExtractor {
    fn provider_name(&self) -> &str {
        "google_vision"
    }

    async fn extract(&self, media: &EncodedMedia) -> Result<String, FlavorError> {
        if media.kind == MediaKind::Video {
            return Err(FlavorError::UnsupportedMedia(
                "label detection only supports images".to_string(),
            ));
        }

        let url = format!("{}/v1/images:annotate", self.base_url);
        let request_body = json!({
            "requests": [{
                "image": {
                    "content": media.data
                },
                "features": [{
                    "type": "LABEL_DETECTION",
                    "maxResults": self.max_labels
                }]
            }]
        });

        info!("Sending label detection request to Google Vision API");

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await?;

        // Check for HTTP errors
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FlavorError::Service {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Google Vision API response: {}", body);
        let parsed: AnnotateResponse = serde_json::from_str(&body)?;
        let result = parsed.responses.into_iter().next().ok_or_else(|| {
            FlavorError::MalformedResponse("empty responses array".to_string())
        })?;

        if let Some(error) = result.error {
            return Err(FlavorError::MalformedResponse(error.message));
        }

        self.format_labels(result.label_annotations)
    }
}
