use std::time::Duration;

use thiserror::Error;

pub mod completion;
pub mod config_file;
pub mod mock;
pub mod openai;
pub mod prompt;
pub mod slide;

// Re-export for convenience
pub use completion::{CompletionBackend, CompletionRequest, CompletionResponse};
pub use openai::OpenAiBackend;
pub use slide::SlideSpec;

/// Model used when `MODEL` is unset or empty.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Base URL of the chat-completions API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Prefix an image payload must start with.
pub const DATA_URL_PREFIX: &str = "data:image";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("imageDataUrl must be a data:image/*;base64,... string")]
    InvalidImage,
    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,
    #[error("OpenAI error: {body}")]
    Upstream { status: u16, body: String },
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode completion envelope: {0}")]
    Decode(String),
    #[error("completion backend failed: {0}")]
    Backend(String),
}

impl ExtractError {
    /// HTTP status the caller should see for this error.
    ///
    /// Upstream failures keep the upstream's own status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ExtractError::InvalidImage => 400,
            ExtractError::MissingApiKey => 500,
            ExtractError::Upstream { status, .. } => *status,
            ExtractError::Http(_) | ExtractError::Decode(_) | ExtractError::Backend(_) => 500,
        }
    }

    /// Whether the details of this error must stay server-side.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ExtractError::Http(_) | ExtractError::Decode(_) | ExtractError::Backend(_)
        )
    }
}

/// Configuration for slide extraction.
#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    /// Per-request timeout for the completion call. `None` leaves it to the
    /// HTTP client and network defaults.
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Resolve configuration: env vars > `.slidesketch.toml` > platform config > defaults.
    pub fn load() -> Self {
        config_file::load_config()
            .to_config()
            .with_env(|name| std::env::var(name).ok())
    }

    /// Overlay values from an environment lookup. Empty values count as unset.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(key) = var("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(model) = var("MODEL") {
            self.model = model;
        }
        if let Some(base) = var("OPENAI_API_BASE") {
            self.api_base = base;
        }
        if let Some(secs) = var("OPENAI_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.timeout_secs = Some(secs),
                Err(_) => tracing::warn!(value = %secs, "ignoring invalid OPENAI_TIMEOUT_SECS"),
            }
        }
        self
    }

    /// The API key, if one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Check that `candidate` looks like an image data URL.
///
/// Only the `data:image` prefix is checked; the MIME subtype and the payload
/// itself are passed through unexamined.
pub fn check_image_data_url(candidate: Option<&str>) -> Result<&str, ExtractError> {
    match candidate {
        Some(url) if url.starts_with(DATA_URL_PREFIX) => Ok(url),
        _ => Err(ExtractError::InvalidImage),
    }
}

/// Turn a sketch image into a normalized slide outline.
///
/// Validates the image payload, then the API key, and only then issues a
/// single completion call. The model's content string is decoded leniently:
/// anything unparsable yields the default slide rather than an error.
pub async fn extract_slide(
    image_data_url: Option<&str>,
    config: &Config,
    backend: &dyn CompletionBackend,
) -> Result<SlideSpec, ExtractError> {
    let image = check_image_data_url(image_data_url)?;
    let api_key = config.api_key().ok_or(ExtractError::MissingApiKey)?;

    let request = CompletionRequest::for_image(&config.model, image);
    tracing::info!(
        backend = backend.name(),
        model = %config.model,
        image_len = image.len(),
        "requesting slide extraction"
    );

    let response = backend.complete(&request, api_key).await?;
    let slide = SlideSpec::from_content(response.content());
    tracing::debug!(title = %slide.title, bullets = slide.bullets.len(), "slide normalized");
    Ok(slide)
}
