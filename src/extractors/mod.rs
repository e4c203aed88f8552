mod factory;
mod labels;
mod nova;

pub use factory::ExtractorFactory;
pub use labels::LabelExtractor;
pub use nova::NovaExtractor;

use async_trait::async_trait;

use crate::media::EncodedMedia;
use crate::FlavorError;

/// Turns encoded media into a free-text ingredient list
#[async_trait]
pub trait IngredientExtractor: Send + Sync {
    /// Backend name (e.g., "bedrock", "google_vision")
    fn provider_name(&self) -> &str;

    /// Ask the hosted model which ingredients are visible in the media
    async fn extract(&self, media: &EncodedMedia) -> Result<String, FlavorError>;
}
