//! Narrative Backend
//!
//! Abstraction over the text-generation service that writes module
//! briefings. The deck core only ever sees the [`NarrativeBackend`] trait;
//! provider-specific details (API formats, endpoints) live in the
//! implementations.

mod ollama;
mod scripted;
mod traits;

pub use ollama::OllamaBackend;
pub use scripted::ScriptedBackend;
pub use traits::{BriefingRequest, NarrativeBackend};
