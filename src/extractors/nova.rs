use async_trait::async_trait;
use log::info;

use crate::bedrock::{BedrockClient, ContentBlock, InvokeRequest, MediaBlock, MediaSource};
use crate::config::ExtractionConfig;
use crate::extractors::IngredientExtractor;
use crate::media::{EncodedMedia, MediaKind};
use crate::prompt::{build_extraction_instructions, EXTRACTION_SYSTEM_PROMPT};
use crate::FlavorError;

/// Ingredient extraction through a Nova vision-language model
pub struct NovaExtractor {
    client: BedrockClient,
    config: ExtractionConfig,
}

impl NovaExtractor {
    pub fn new(client: BedrockClient, config: ExtractionConfig) -> Self {
        NovaExtractor { client, config }
    }

    pub fn model_id(&self) -> &str {
        &self.config.model_id
    }

    /// Build the request body for one piece of media
    pub fn build_request(&self, media: &EncodedMedia) -> InvokeRequest {
        let block = MediaBlock {
            format: media.format.clone(),
            source: MediaSource {
                bytes: media.data.clone(),
            },
        };

        let (media_block, params) = match media.kind {
            MediaKind::Image => (ContentBlock::Image(block), self.config.image),
            MediaKind::Video => (ContentBlock::Video(block), self.config.video),
        };

        InvokeRequest::user(
            vec![
                media_block,
                ContentBlock::Text(build_extraction_instructions(media.kind)),
            ],
            params,
        )
        .with_system(EXTRACTION_SYSTEM_PROMPT.trim_end())
    }
}

#[async_trait]
impl IngredientExtractor for NovaExtractor {
    fn provider_name(&self) -> &str {
        "bedrock"
    }

    async fn extract(&self, media: &EncodedMedia) -> Result<String, FlavorError> {
        let request = self.build_request(media);
        info!(
            "Extracting ingredients from {} with {}",
            media.kind, self.config.model_id
        );
        self.client
            .invoke_text(&self.config.model_id, &request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn encoded(kind: MediaKind, format: &str) -> EncodedMedia {
        EncodedMedia {
            kind,
            format: format.to_string(),
            data: "AAAA".to_string(),
        }
    }

    #[test]
    fn test_image_request_uses_image_params() {
        let extractor = NovaExtractor::new(
            BedrockClient::with_base_url("key", "http://localhost"),
            ExtractionConfig::default(),
        );
        let request = extractor.build_request(&encoded(MediaKind::Image, "jpeg"));

        assert_eq!(request.inference_config.max_new_tokens, 2048);
        assert_eq!(request.system.len(), 1);
        let content = &request.messages[0].content;
        assert!(matches!(&content[0], ContentBlock::Image(b) if b.format == "jpeg" && b.source.bytes == "AAAA"));
        assert!(matches!(&content[1], ContentBlock::Text(t) if t.contains("visible in the image")));
    }

    #[test]
    fn test_video_request_uses_video_params() {
        let extractor = NovaExtractor::new(
            BedrockClient::with_base_url("key", "http://localhost"),
            ExtractionConfig::default(),
        );
        let request = extractor.build_request(&encoded(MediaKind::Video, "mp4"));

        assert_eq!(request.inference_config.max_new_tokens, 300);
        assert_eq!(request.inference_config.top_k, 20);
        assert!(matches!(&request.messages[0].content[0], ContentBlock::Video(b) if b.format == "mp4"));
    }

    #[tokio::test]
    async fn test_extract() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/model/amazon.nova-pro-v1:0/invoke")
            .match_body(Matcher::PartialJson(json!({
                "messages": [{
                    "role": "user",
                    "content": [{"video": {"format": "mp4", "source": {"bytes": "AAAA"}}}]
                }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r###"{"output": {"message": {"content": [{"text": "## Identified Ingredients\n- Carrot: 3"}]}}}"###)
            .create_async()
            .await;

        let extractor = NovaExtractor::new(
            BedrockClient::with_base_url("key", server.url()),
            ExtractionConfig::default(),
        );
        let text = extractor
            .extract(&encoded(MediaKind::Video, "mp4"))
            .await
            .unwrap();

        assert_eq!(text, "## Identified Ingredients\n- Carrot: 3");
        assert_eq!(extractor.provider_name(), "bedrock");
        mock.assert_async().await;
    }
}
