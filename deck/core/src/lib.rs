//! Deck Core - Headless Command-Deck Logic for vibedeck
//!
//! This crate provides the interactive core of the vibedeck dashboard,
//! completely independent of any UI framework. It can drive a TUI, a web
//! surface, or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                  Presentation Surfaces                  │
//! │        (module grid of cards + detail overlay)          │
//! │   forward pointer/selection events, render core state   │
//! └──────────────────────────┬─────────────────────────────┘
//!                            │
//! ┌──────────────────────────┼─────────────────────────────┐
//! │                      DECK CORE                          │
//! │  ┌──────────────┐  ┌───────────┐  ┌─────────────────┐  │
//! │  │   Briefing   │  │   Tilt    │  │    Narrative    │  │
//! │  │  Controller  │  │  Engine   │  │     Backend     │  │
//! │  │ (fetch→reveal│  │ (pointer→ │  │  (Ollama/...)   │  │
//! │  │   →ready)    │  │  rotation)│  │                 │  │
//! │  └──────────────┘  └───────────┘  └─────────────────┘  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`BriefingController`]: fetch-then-stream state machine for one
//!   module's narrative briefing, superseded atomically on re-selection
//! - [`BriefingDriver`]: tokio adapter that spawns fetches and paces the
//!   reveal clock
//! - [`TiltEngine`]: pointer position to bounded rotation + spotlight
//! - [`NarrativeBackend`]: trait seam to the text-generation service
//! - [`Catalog`]: the roster of selectable modules
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use deck_core::{BriefingDriver, Catalog, ScriptedBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let catalog = Catalog::builtin();
//!     let backend = Arc::new(ScriptedBackend::demo());
//!     let mut driver = BriefingDriver::new(backend, "llama3.2");
//!
//!     driver.select(catalog.modules().next());
//!
//!     // Per frame:
//!     driver.pump();                 // apply fetch completions
//!     driver.update(frame_delta);    // advance the reveal clock
//!     let visible = driver.visible_text();
//!     let unlocked = driver.is_ready();
//! }
//! ```
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any
//! other UI framework. It's pure interaction logic that can be rendered
//! anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod briefing;
pub mod catalog;
pub mod config;
pub mod cursor;
pub mod identity;
pub mod module;
pub mod tilt;

// Re-exports for convenience
pub use backend::{BriefingRequest, NarrativeBackend, OllamaBackend, ScriptedBackend};
pub use briefing::{
    BriefingController, BriefingDriver, BriefingPhase, FetchTicket, Generation,
    DEFAULT_REVEAL_INTERVAL, FALLBACK_BRIEFING,
};
pub use catalog::{load_catalog_from_path, Catalog, CatalogError, CatalogSection};
pub use config::{load_config_from_path, ConfigError, DeckConfig, DeckToml};
pub use cursor::CursorTracker;
pub use identity::{FixedTagSource, RandomTagSource, TagSource};
pub use module::{ColorTheme, Module, ModuleDescription, ModuleId, ModuleStat, SecurityLevel};
pub use tilt::{compute_tilt, Rotation, Spotlight, SurfaceRect, TiltEngine, TiltState, MAX_TILT_DEG};
