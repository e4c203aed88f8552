use std::path::PathBuf;
use std::time::Duration;

use crate::{AppConfig, Analysis, FlavorError, FlavorPipeline, Media};

/// Represents the input source for an analysis
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Image file on disk
    Image(PathBuf),
    /// Encoded image already in memory
    ImageBytes(Vec<u8>),
    /// Video file on disk
    Video(PathBuf),
    /// Ingredient text from an earlier analysis
    Ingredients(String),
}

/// Represents the desired output
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputMode {
    /// Ingredients and recipe (default)
    #[default]
    Recipe,
    /// Stop after ingredient extraction
    IngredientsOnly,
}

/// Result of an analysis
#[derive(Debug, Clone)]
pub enum AnalysisResult {
    /// Ingredients and the generated recipe
    Full(Analysis),
    /// Ingredient list only
    Ingredients(String),
}

/// Builder for configuring and executing an analysis
#[derive(Debug, Default)]
pub struct AnalysisBuilder {
    source: Option<InputSource>,
    mode: OutputMode,
    preferences: Option<String>,
    config: Option<AppConfig>,
    timeout: Option<Duration>,
    api_key: Option<String>,
}

impl AnalysisBuilder {
    /// Analyze an image file
    ///
    /// # Example
    /// ```
    /// use flavorai::FlavorAi;
    ///
    /// let builder = FlavorAi::builder()
    ///     .image("/path/to/fridge.jpg");
    /// ```
    pub fn image(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(InputSource::Image(path.into()));
        self
    }

    /// Analyze an encoded image held in memory (JPEG, PNG, GIF or WebP)
    pub fn image_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.source = Some(InputSource::ImageBytes(bytes.into()));
        self
    }

    /// Analyze a short video clip
    ///
    /// # Example
    /// ```
    /// use flavorai::FlavorAi;
    ///
    /// let builder = FlavorAi::builder()
    ///     .video("/path/to/pantry.mp4");
    /// ```
    pub fn video(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(InputSource::Video(path.into()));
        self
    }

    /// Skip extraction and generate a recipe from known ingredients
    pub fn ingredients(mut self, text: impl Into<String>) -> Self {
        self.source = Some(InputSource::Ingredients(text.into()));
        self
    }

    /// Free-text preferences appended to the recipe prompt
    ///
    /// # Example
    /// ```
    /// use flavorai::FlavorAi;
    ///
    /// let builder = FlavorAi::builder()
    ///     .image("/path/to/fridge.jpg")
    ///     .preferences("vegetarian, ready in 30 minutes");
    /// ```
    pub fn preferences(mut self, text: impl Into<String>) -> Self {
        self.preferences = Some(text.into());
        self
    }

    /// Return the ingredient list without generating a recipe
    pub fn extract_only(mut self) -> Self {
        self.mode = OutputMode::IngredientsOnly;
        self
    }

    /// Use this configuration instead of loading config.toml and the environment
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a timeout for model requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the Bedrock API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Build and execute the analysis
    ///
    /// # Errors
    /// Returns `FlavorError` if:
    /// - No input source was specified
    /// - The media cannot be read or decoded
    /// - A model call fails or returns an unexpected shape
    /// - Invalid combination of options (ingredients + extract_only)
    ///
    /// # Example
    /// ```no_run
    /// # use flavorai::FlavorAi;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = FlavorAi::builder()
    ///     .image("/path/to/fridge.jpg")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<AnalysisResult, FlavorError> {
        // Validate that source is set
        let source = self.source.ok_or_else(|| {
            FlavorError::BuilderError(
                "No input source specified. Use .image(), .video() or .ingredients()".to_string(),
            )
        })?;

        if let (InputSource::Ingredients(_), OutputMode::IngredientsOnly) = (&source, self.mode) {
            return Err(FlavorError::BuilderError(
                "Cannot use extract_only() with ingredient text; there is nothing to extract."
                    .to_string(),
            ));
        }

        let mut config = match self.config {
            Some(config) => config,
            None => AppConfig::load()?,
        };
        if let Some(key) = self.api_key {
            config.bedrock.api_key = Some(key);
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout.as_secs().max(1);
        }

        let pipeline = FlavorPipeline::from_config(&config)?;
        let preferences = self.preferences.as_deref();

        let media = match source {
            InputSource::Image(path) => Media::image_file(path).await?,
            InputSource::ImageBytes(bytes) => Media::image_from_bytes(&bytes)?,
            InputSource::Video(path) => Media::video_file(path).await?,
            InputSource::Ingredients(ingredients) => {
                let recipe = pipeline.generate_recipe(&ingredients, preferences).await?;
                return Ok(AnalysisResult::Full(Analysis {
                    ingredients,
                    recipe,
                }));
            }
        };

        match self.mode {
            OutputMode::IngredientsOnly => Ok(AnalysisResult::Ingredients(
                pipeline.extract_ingredients(Some(&media)).await?,
            )),
            OutputMode::Recipe => Ok(AnalysisResult::Full(
                pipeline.analyze(Some(&media), preferences).await?,
            )),
        }
    }
}

/// Main entry point for the builder API
pub struct FlavorAi;

impl FlavorAi {
    /// Creates a new builder for analyzing food media
    ///
    /// # Example
    /// ```
    /// use flavorai::FlavorAi;
    ///
    /// let builder = FlavorAi::builder();
    /// ```
    pub fn builder() -> AnalysisBuilder {
        AnalysisBuilder::default()
    }
}
