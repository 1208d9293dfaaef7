/// Generative model abstraction
///
/// The recommender and the image tagger only need "prompt in, text out".
/// Concrete clients are constructed once at start-up and injected, so tests
/// can substitute a deterministic stub.
pub mod gemini;

pub use gemini::GeminiClient;

/// Image bytes sent alongside a prompt
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Failure talking to the model endpoint
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model response contained no text")]
    EmptyResponse,
}

/// Trait for text generation backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Sends a text prompt and returns the raw response text unmodified
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Sends a prompt together with an image (multimodal)
    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &ImageInput,
    ) -> Result<String, GenerationError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
