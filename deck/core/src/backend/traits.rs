//! Narrative Backend Traits
//!
//! Trait definition for narrative-generation backends. Implementations
//! turn a module's title and flattened description into a short briefing
//! text. The briefing controller never sees a backend error: the driver
//! substitutes the fallback briefing on any failure.

use async_trait::async_trait;

/// Default sampling temperature for briefing generation
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A single briefing-generation request
#[derive(Clone, Debug, PartialEq)]
pub struct BriefingRequest {
    /// Module title, verbatim
    pub title: String,
    /// Flattened module description (list items joined with ". ")
    pub description: String,
    /// Model identifier (backend-specific; empty = backend default)
    pub model: String,
    /// Sampling temperature in `[0, 1]`
    pub temperature: f32,
}

impl BriefingRequest {
    /// Create a request for the given title and flattened description
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            model: String::new(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the model identifier
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }
}

/// Narrative-generation backend.
///
/// Implement this trait to plug in a different text-generation provider.
/// `generate` may fail; callers are expected to recover locally rather
/// than propagate the error to the user.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Backend name (e.g. "Ollama")
    fn name(&self) -> &str;

    /// Check if the backend is healthy and reachable
    async fn health_check(&self) -> bool;

    /// Generate a briefing for the request
    async fn generate(&self, request: &BriefingRequest) -> anyhow::Result<String>;
}
