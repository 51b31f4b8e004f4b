//! Ollama Backend Implementation
//!
//! Narrative backend for Ollama (local LLM server), using the
//! `/api/generate` endpoint in batch mode: the briefing controller owns
//! the reveal pacing, so there is nothing to gain from token streaming
//! here - one request, one complete briefing back.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{BriefingRequest, NarrativeBackend};

/// Ollama narrative backend
#[derive(Clone)]
pub struct OllamaBackend {
    host: String,
    port: u16,
    http_client: reqwest::Client,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create from environment variables
    ///
    /// Reads `OLLAMA_HOST`/`OLLAMA_PORT` with `VIBEDECK_`-prefixed
    /// overrides taking precedence.
    #[must_use]
    pub fn from_env() -> Self {
        let host = std::env::var("VIBEDECK_OLLAMA_HOST")
            .or_else(|_| std::env::var("OLLAMA_HOST"))
            .unwrap_or_else(|_| "localhost".to_string());
        let port: u16 = std::env::var("VIBEDECK_OLLAMA_PORT")
            .or_else(|_| std::env::var("OLLAMA_PORT"))
            .unwrap_or_else(|_| "11434".to_string())
            .parse()
            .unwrap_or(11434);

        Self::new(host, port)
    }

    fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url())
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url())
    }

    /// Build the briefing prompt for a request
    fn build_prompt(request: &BriefingRequest) -> String {
        format!(
            "You are the onboard narrator of a retro-futuristic command deck. \
             Write a terse two-sentence mission briefing for the module \"{}\". \
             Module directives: {}. \
             Respond with the briefing text only, no preamble.",
            request.title, request.description
        )
    }
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new("localhost", 11434)
    }
}

#[async_trait]
impl NarrativeBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(self.tags_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }

    async fn generate(&self, request: &BriefingRequest) -> anyhow::Result<String> {
        let url = self.generate_url();
        let prompt = Self::build_prompt(request);

        let json_request = serde_json::json!({
            "model": request.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": request.temperature,
            },
        });

        tracing::debug!(title = %request.title, model = %request.model, "Requesting briefing");

        let response = self
            .http_client
            .post(&url)
            .json(&json_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama returned {status}: {body}");
        }

        let data: serde_json::Value = response.json().await?;

        let content = data
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_creation() {
        let backend = OllamaBackend::new("localhost", 11434);
        assert_eq!(backend.host, "localhost");
        assert_eq!(backend.port, 11434);
        assert_eq!(backend.base_url(), "http://localhost:11434");
        assert_eq!(
            backend.generate_url(),
            "http://localhost:11434/api/generate"
        );
    }

    #[test]
    fn test_build_prompt_embeds_title_and_description() {
        let request = BriefingRequest::new("ALPHA", "Scan sector 9. Report anomalies");
        let prompt = OllamaBackend::build_prompt(&request);

        assert!(prompt.contains("\"ALPHA\""));
        assert!(prompt.contains("Scan sector 9. Report anomalies"));
    }
}
