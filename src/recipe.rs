use log::info;

use crate::bedrock::{BedrockClient, ContentBlock, InvokeRequest};
use crate::config::RecipeConfig;
use crate::prompt::build_recipe_prompt;
use crate::FlavorError;

/// Join detected ingredients with the user's free-text preferences.
///
/// Blank preferences leave the ingredient text untouched.
pub fn combine_input(ingredients: &str, preferences: Option<&str>) -> String {
    match preferences.map(str::trim).filter(|p| !p.is_empty()) {
        Some(preferences) => format!("{}\nAdditional preferences: {}", ingredients, preferences),
        None => ingredients.to_string(),
    }
}

/// Second stage: ingredient list in, recipe text out
#[derive(Clone)]
pub struct RecipeGenerator {
    client: BedrockClient,
    config: RecipeConfig,
}

impl RecipeGenerator {
    pub fn new(client: BedrockClient, config: RecipeConfig) -> Self {
        RecipeGenerator { client, config }
    }

    pub fn model_id(&self) -> &str {
        &self.config.model_id
    }

    pub fn build_request(&self, combined_input: &str) -> InvokeRequest {
        InvokeRequest::user(
            vec![ContentBlock::Text(build_recipe_prompt(combined_input))],
            self.config.params,
        )
    }

    pub async fn generate(
        &self,
        ingredients: &str,
        preferences: Option<&str>,
    ) -> Result<String, FlavorError> {
        let combined = combine_input(ingredients, preferences);
        info!("Generating recipe with {}", self.config.model_id);
        self.client
            .invoke_text(&self.config.model_id, &self.build_request(&combined))
            .await
    }
}
