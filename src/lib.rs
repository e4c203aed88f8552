//! FlavorAI: food photo or video in, ingredient list and recipe out.
//!
//! Ingredient detection and recipe writing are delegated to hosted foundation
//! models; this crate encodes the media, builds typed requests, parses the
//! replies and serves a small browser UI.

pub mod bedrock;
pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod media;
pub mod pipeline;
pub mod prompt;
pub mod recipe;
pub mod server;

pub use builder::{AnalysisBuilder, AnalysisResult, FlavorAi, InputSource, OutputMode};
pub use config::AppConfig;
pub use error::{error_markdown, FlavorError, ERROR_MARKER};
pub use media::{EncodedMedia, Media, MediaKind, VideoFormat};
pub use pipeline::{Analysis, AnalysisRequest, FlavorPipeline};
pub use recipe::combine_input;

/// Extract the visible ingredients from an image or video.
///
/// Uses configuration from `config.toml` and `FLAVORAI__*` environment variables.
///
/// # Example
/// ```no_run
/// use flavorai::{extract_ingredients, Media};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let media = Media::image_file("fridge.jpg").await?;
/// let ingredients = extract_ingredients(Some(&media)).await?;
/// println!("{}", ingredients);
/// # Ok(())
/// # }
/// ```
pub async fn extract_ingredients(media: Option<&Media>) -> Result<String, FlavorError> {
    let config = AppConfig::load()?;
    FlavorPipeline::from_config(&config)?
        .extract_ingredients(media)
        .await
}

/// Generate a recipe from an ingredient list and optional preferences.
///
/// # Example
/// ```no_run
/// use flavorai::generate_recipe;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = generate_recipe("- 3 eggs\n- 1 onion", Some("no dairy")).await?;
/// println!("{}", recipe);
/// # Ok(())
/// # }
/// ```
pub async fn generate_recipe(
    ingredients: &str,
    preferences: Option<&str>,
) -> Result<String, FlavorError> {
    let config = AppConfig::load()?;
    FlavorPipeline::from_config(&config)?
        .generate_recipe(ingredients, preferences)
        .await
}

/// Run both stages on one piece of media.
pub async fn analyze(media: &Media, preferences: Option<&str>) -> Result<Analysis, FlavorError> {
    let config = AppConfig::load()?;
    FlavorPipeline::from_config(&config)?
        .analyze(Some(media), preferences)
        .await
}
