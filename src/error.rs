use thiserror::Error;

/// Prefix of every user-visible error pane.
pub const ERROR_MARKER: &str = "### Error";

/// Errors that can occur while turning media into ingredients and recipes
#[derive(Error, Debug)]
pub enum FlavorError {
    /// No media (or an empty payload) was supplied
    #[error("No media provided")]
    NoMedia,

    /// Failed to read a media file from disk
    #[error("Failed to read media: {0}")]
    MediaRead(#[from] std::io::Error),

    /// Failed to decode or re-encode an image
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Media kind or container the selected backend cannot handle
    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    /// Network, TLS or timeout failure talking to a model service
    #[error("Request to model service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The model service answered with a non-success status
    #[error("Model service returned {status}: {body}")]
    Service { status: u16, body: String },

    /// The reply did not have the expected shape
    #[error("Unexpected model response format: {0}")]
    MalformedResponse(String),

    /// No API key in configuration or environment
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),
}

impl FlavorError {
    /// True when the failure happened on the way to or from the service,
    /// as opposed to a reply we could not make sense of.
    pub fn is_transport(&self) -> bool {
        matches!(self, FlavorError::Transport(_) | FlavorError::Service { .. })
    }
}

impl From<serde_json::Error> for FlavorError {
    fn from(e: serde_json::Error) -> Self {
        FlavorError::MalformedResponse(e.to_string())
    }
}

/// Render a message as a markdown error pane.
pub fn error_markdown(message: impl std::fmt::Display) -> String {
    format!("{}\n{}", ERROR_MARKER, message)
}

/// Whether a pane holds an error rather than model output.
pub fn is_error_markdown(text: &str) -> bool {
    text.starts_with(ERROR_MARKER)
}
