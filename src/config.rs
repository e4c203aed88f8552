use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::bedrock::InferenceConfig;

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Bedrock runtime connection settings
    #[serde(default)]
    pub bedrock: BedrockConfig,
    /// Ingredient extraction stage
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Recipe generation stage
    #[serde(default)]
    pub recipe: RecipeConfig,
    /// Label-detection backend
    #[serde(default)]
    pub labels: LabelConfig,
    /// Web UI
    #[serde(default)]
    pub server: ServerConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bedrock: BedrockConfig::default(),
            extraction: ExtractionConfig::default(),
            recipe: RecipeConfig::default(),
            labels: LabelConfig::default(),
            server: ServerConfig::default(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BedrockConfig {
    /// AWS region hosting the runtime endpoint
    #[serde(default = "default_region")]
    pub region: String,
    /// Override for the runtime endpoint (proxies, tests)
    pub base_url: Option<String>,
    /// Bedrock API key (can also be set via AWS_BEARER_TOKEN_BEDROCK)
    pub api_key: Option<String>,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            base_url: None,
            api_key: None,
        }
    }
}

impl BedrockConfig {
    pub fn endpoint(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Which extractor to use ("bedrock" or "google_vision")
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Vision-language model identifier
    #[serde(default = "default_extraction_model")]
    pub model_id: String,
    /// Sampling parameters for still images
    #[serde(default = "default_image_params")]
    pub image: InferenceConfig,
    /// Sampling parameters for video clips
    #[serde(default = "default_video_params")]
    pub video: InferenceConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model_id: default_extraction_model(),
            image: default_image_params(),
            video: default_video_params(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecipeConfig {
    /// Text model identifier
    #[serde(default = "default_recipe_model")]
    pub model_id: String,
    #[serde(default = "default_recipe_params")]
    pub params: InferenceConfig,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            model_id: default_recipe_model(),
            params: default_recipe_params(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LabelConfig {
    /// Google Cloud API key (can also be set via GOOGLE_API_KEY)
    pub api_key: Option<String>,
    /// Override for the Vision endpoint
    pub base_url: Option<String>,
    /// Maximum number of labels to keep
    #[serde(default = "default_max_labels")]
    pub max_labels: u32,
    /// Minimum score (0.0-1.0) for a label to be kept
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            max_labels: default_max_labels(),
            min_confidence: default_min_confidence(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Largest accepted upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

// Default value functions
fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_backend() -> String {
    "bedrock".to_string()
}

fn default_extraction_model() -> String {
    "amazon.nova-pro-v1:0".to_string()
}

fn default_recipe_model() -> String {
    "amazon.nova-lite-v1:0".to_string()
}

fn default_image_params() -> InferenceConfig {
    InferenceConfig::new(2048, 0.9, 20, 0.7)
}

fn default_video_params() -> InferenceConfig {
    InferenceConfig::new(300, 0.1, 20, 0.3)
}

fn default_recipe_params() -> InferenceConfig {
    InferenceConfig::new(4096, 0.9, 20, 0.7)
}

fn default_max_labels() -> u32 {
    10
}

fn default_min_confidence() -> f32 {
    0.5
}

fn default_bind() -> String {
    "127.0.0.1:7860".to_string()
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_timeout() -> u64 {
    60
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FLAVORAI__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FLAVORAI__BEDROCK__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the precedence rules.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: FLAVORAI__EXTRACTION__MODEL_ID
        .add_source(
            Environment::with_prefix("FLAVORAI")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
