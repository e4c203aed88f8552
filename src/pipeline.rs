use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::bedrock::BedrockClient;
use crate::config::AppConfig;
use crate::error::{error_markdown, is_error_markdown};
use crate::extractors::{ExtractorFactory, IngredientExtractor};
use crate::media::{Media, MediaKind};
use crate::recipe::RecipeGenerator;
use crate::FlavorError;

const RECIPE_SKIPPED: &str = "Could not generate recipe due to ingredient detection failure";

/// The two panes shown to the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Markdown ingredient list (or error pane)
    pub ingredients: String,
    /// Markdown recipe (or error pane, or empty)
    pub recipe: String,
}

/// Input of one UI interaction
#[derive(Debug, Default)]
pub struct AnalysisRequest {
    pub media: Option<Media>,
    pub preferences: Option<String>,
    /// Ingredients from an earlier analysis; when present, extraction is skipped
    pub cached_ingredients: Option<String>,
}

/// Heading prepended to extracted ingredient text
pub fn ingredients_heading(kind: MediaKind) -> String {
    format!("### Ingredients (detected from {})", kind)
}

/// Extractor + generator pair; one per process, shared across requests
pub struct FlavorPipeline {
    extractor: Box<dyn IngredientExtractor>,
    generator: RecipeGenerator,
}

impl FlavorPipeline {
    pub fn new(extractor: Box<dyn IngredientExtractor>, generator: RecipeGenerator) -> Self {
        FlavorPipeline {
            extractor,
            generator,
        }
    }

    /// Wire both stages from configuration, sharing one Bedrock client
    pub fn from_config(config: &AppConfig) -> Result<Self, FlavorError> {
        let client = BedrockClient::new(&config.bedrock, Duration::from_secs(config.timeout))?;
        Self::with_client(config, client)
    }

    pub fn with_client(config: &AppConfig, client: BedrockClient) -> Result<Self, FlavorError> {
        let extractor = ExtractorFactory::from_config(config, &client)?;
        let generator = RecipeGenerator::new(client, config.recipe.clone());
        Ok(Self::new(extractor, generator))
    }

    pub fn extractor_name(&self) -> &str {
        self.extractor.provider_name()
    }

    /// First stage. Absent media fails before any remote call is made.
    pub async fn extract_ingredients(&self, media: Option<&Media>) -> Result<String, FlavorError> {
        let media = media.ok_or(FlavorError::NoMedia)?;
        let encoded = media.encode()?;
        let text = self.extractor.extract(&encoded).await?;
        Ok(format!("{}\n{}", ingredients_heading(encoded.kind), text))
    }

    /// Second stage
    pub async fn generate_recipe(
        &self,
        ingredients: &str,
        preferences: Option<&str>,
    ) -> Result<String, FlavorError> {
        if ingredients.trim().is_empty() {
            return Err(FlavorError::BuilderError(
                "Ingredient list cannot be empty".to_string(),
            ));
        }
        self.generator.generate(ingredients, preferences).await
    }

    /// Both stages, stopping at the first failure
    pub async fn analyze(
        &self,
        media: Option<&Media>,
        preferences: Option<&str>,
    ) -> Result<Analysis, FlavorError> {
        let ingredients = self.extract_ingredients(media).await?;
        let recipe = self.generate_recipe(&ingredients, preferences).await?;
        Ok(Analysis {
            ingredients,
            recipe,
        })
    }

    /// Run one UI interaction. Never fails: every error becomes a markdown error pane.
    pub async fn process(&self, request: AnalysisRequest) -> Analysis {
        let preferences = request.preferences.as_deref();
        let cached = request
            .cached_ingredients
            .filter(|c| !c.trim().is_empty() && !is_error_markdown(c));

        let ingredients = match (request.media.as_ref(), cached) {
            (Some(media), _) => {
                let kind = media.kind();
                info!("Processing {}...", kind);
                match self.extract_ingredients(Some(media)).await {
                    Ok(ingredients) => ingredients,
                    Err(e) => {
                        warn!("Ingredient extraction failed: {}", e);
                        return Analysis {
                            ingredients: error_markdown(format!("Error processing {}: {}", kind, e)),
                            recipe: error_markdown(RECIPE_SKIPPED),
                        };
                    }
                }
            }
            (None, Some(cached)) => {
                info!("Reusing previously detected ingredients");
                cached
            }
            (None, None) => {
                return Analysis {
                    ingredients: error_markdown(FlavorError::NoMedia),
                    recipe: String::new(),
                }
            }
        };

        let recipe = match self.generate_recipe(&ingredients, preferences).await {
            Ok(recipe) => recipe,
            Err(e) => {
                warn!("Recipe generation failed: {}", e);
                error_markdown(format!("Error generating recipe: {}", e))
            }
        };

        Analysis {
            ingredients,
            recipe,
        }
    }
}
