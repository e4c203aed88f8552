use std::time::Duration;

use crate::bedrock::BedrockClient;
use crate::config::AppConfig;
use crate::extractors::{IngredientExtractor, LabelExtractor, NovaExtractor};
use crate::FlavorError;

pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create an extractor by backend name.
    ///
    /// The Bedrock client is shared with the recipe stage, so it is passed in
    /// rather than built here.
    pub fn create(
        backend: &str,
        config: &AppConfig,
        bedrock: &BedrockClient,
    ) -> Result<Box<dyn IngredientExtractor>, FlavorError> {
        match backend {
            "bedrock" => Ok(Box::new(NovaExtractor::new(
                bedrock.clone(),
                config.extraction.clone(),
            ))),
            "google_vision" => Ok(Box::new(LabelExtractor::new(
                &config.labels,
                Duration::from_secs(config.timeout),
            )?)),
            _ => Err(FlavorError::BuilderError(format!(
                "Unknown extraction backend: {}",
                backend
            ))),
        }
    }

    /// Create the extractor selected by `extraction.backend`
    pub fn from_config(
        config: &AppConfig,
        bedrock: &BedrockClient,
    ) -> Result<Box<dyn IngredientExtractor>, FlavorError> {
        Self::create(&config.extraction.backend, config, bedrock)
    }

    /// List all available backend names
    pub fn available_extractors() -> Vec<&'static str> {
        vec!["bedrock", "google_vision"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BedrockClient {
        BedrockClient::with_base_url("test-key", "http://localhost")
    }

    #[test]
    fn test_create_bedrock_extractor() {
        let config = AppConfig::default();
        let extractor = ExtractorFactory::create("bedrock", &config, &client()).unwrap();
        assert_eq!(extractor.provider_name(), "bedrock");
    }

    #[test]
    fn test_create_label_extractor() {
        let mut config = AppConfig::default();
        config.labels.api_key = Some("vision-key".to_string());
        config.extraction.backend = "google_vision".to_string();

        let extractor = ExtractorFactory::from_config(&config, &client()).unwrap();
        assert_eq!(extractor.provider_name(), "google_vision");
    }

    #[test]
    fn test_create_unknown_backend() {
        let config = AppConfig::default();
        let result = ExtractorFactory::create("yolo", &config, &client());
        match result {
            Err(e) => assert!(e.to_string().contains("Unknown extraction backend")),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_available_extractors() {
        let extractors = ExtractorFactory::available_extractors();
        assert_eq!(extractors.len(), 2);
        assert!(extractors.contains(&"bedrock"));
        assert!(extractors.contains(&"google_vision"));
    }
}
