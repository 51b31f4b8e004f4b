//! Module Catalog
//!
//! The roster of modules a deck presents, grouped into titled sections.
//! A built-in roster ships with the crate; deployments can replace it with
//! a TOML file:
//!
//! ```toml
//! [[section]]
//! title = "CORE_MODULES"
//!
//! [[section.module]]
//! id = "uplink"
//! title = "UPLINK ARRAY"
//! description = ["Align dish cluster", "Hold carrier lock"]
//! level = "elevated"
//! theme = "cyan"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::module::{ColorTheme, Module, ModuleId, SecurityLevel};

/// Errors that can occur when loading a catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read the catalog file
    #[error("Failed to read catalog file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse catalog TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Structurally valid TOML that describes an unusable roster
    #[error("Invalid catalog: {0}")]
    ValidationError(String),
}

/// A titled group of modules rendered as one grid section
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Section heading (e.g. "CORE_MODULES")
    pub title: String,
    /// Modules in this section, in display order
    #[serde(default, rename = "module")]
    pub modules: Vec<Module>,
}

impl CatalogSection {
    /// Create an empty section
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            modules: Vec::new(),
        }
    }

    /// Append a module
    #[must_use]
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }
}

/// The full module roster
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Sections in display order
    #[serde(default, rename = "section")]
    pub sections: Vec<CatalogSection>,
}

impl Catalog {
    /// Parse a catalog from TOML text
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` for malformed TOML and
    /// `CatalogError::ValidationError` for rosters with duplicate ids or
    /// no modules at all.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.modules().next().is_none() {
            return Err(CatalogError::ValidationError(
                "catalog contains no modules".to_string(),
            ));
        }

        let mut seen: Vec<&ModuleId> = Vec::new();
        for module in self.modules() {
            if seen.contains(&&module.id) {
                return Err(CatalogError::ValidationError(format!(
                    "duplicate module id: {}",
                    module.id
                )));
            }
            seen.push(&module.id);
        }

        Ok(())
    }

    /// Iterate over every module across all sections, in display order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.sections.iter().flat_map(|s| s.modules.iter())
    }

    /// Look up a module by id
    #[must_use]
    pub fn get(&self, id: &ModuleId) -> Option<&Module> {
        self.modules().find(|m| &m.id == id)
    }

    /// Total number of modules
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.modules.len()).sum()
    }

    /// Whether the roster is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.modules.is_empty())
    }

    /// The roster the deck ships with
    #[must_use]
    pub fn builtin() -> Self {
        let core = CatalogSection::new("CORE_MODULES")
            .with_module(
                Module::new("neural-net", "NEURAL NET")
                    .with_items(["Monitor inference lattice", "Flag divergent weights"])
                    .with_level(SecurityLevel::Critical)
                    .with_theme(ColorTheme::Cyan)
                    .with_stat("LOAD", "87%")
                    .with_stat("NODES", "4096")
                    .with_action_url("deck://neural-net/console"),
            )
            .with_module(
                Module::new("aegis", "AEGIS WALL")
                    .with_items(["Rotate cipher keys", "Trace intrusion vectors"])
                    .with_level(SecurityLevel::Omega)
                    .with_theme(ColorTheme::Rose)
                    .with_stat("THREATS", "0")
                    .with_stat("UPTIME", "99.97%")
                    .with_action_url("deck://aegis/perimeter"),
            )
            .with_module(
                Module::new("uplink", "UPLINK ARRAY")
                    .with_items(["Align dish cluster", "Hold carrier lock"])
                    .with_level(SecurityLevel::Elevated)
                    .with_theme(ColorTheme::Violet)
                    .with_stat("SIGNAL", "-42dBm")
                    .with_stat("BAND", "KA")
                    .with_action_url("deck://uplink/telemetry"),
            )
            .with_module(
                Module::new("vault", "CRYPT VAULT")
                    .with_items(["Seal cold archives", "Audit access ledger"])
                    .with_level(SecurityLevel::Omega)
                    .with_theme(ColorTheme::Amber)
                    .with_stat("SHARDS", "12/12")
                    .with_stat("SEALED", "YES"),
            );

        let utility = CatalogSection::new("UTILITIES")
            .with_module(
                Module::new("diagnostics", "DIAGNOSTICS")
                    .with_text("Full-stack integrity sweep across every subsystem.")
                    .with_theme(ColorTheme::Cyan)
                    .with_stat("LAST RUN", "04:12")
                    .with_action_url("deck://diagnostics/run"),
            )
            .with_module(
                Module::new("archive", "DEEP ARCHIVE")
                    .with_items(["Index mission logs", "Compact stale records"])
                    .with_theme(ColorTheme::Violet)
                    .with_stat("RECORDS", "1.2M"),
            )
            .with_module(
                Module::new("relay", "COMMS RELAY")
                    .with_items(["Bridge fleet channels", "Buffer burst traffic"])
                    .with_level(SecurityLevel::Elevated)
                    .with_theme(ColorTheme::Rose)
                    .with_stat("CHANNELS", "64")
                    .with_action_url("deck://relay/patch"),
            )
            .with_module(
                Module::new("reactor", "POWER GRID")
                    .with_items(["Balance cell draw", "Vent thermal spikes"])
                    .with_level(SecurityLevel::Critical)
                    .with_theme(ColorTheme::Amber)
                    .with_stat("OUTPUT", "1.21GW")
                    .with_stat("TEMP", "312K"),
            );

        Self {
            sections: vec![core, utility],
        }
    }
}

/// Load a catalog from a TOML file path, or the built-in roster when `None`
///
/// # Errors
///
/// Returns a `CatalogError` if the file cannot be read, parsed, or
/// validated.
pub fn load_catalog_from_path(path: Option<PathBuf>) -> Result<Catalog, CatalogError> {
    match path {
        None => Ok(Catalog::builtin()),
        Some(path) => {
            let text =
                std::fs::read_to_string(&path).map_err(|source| CatalogError::ReadError {
                    path: path.clone(),
                    source,
                })?;
            let catalog = Catalog::from_toml_str(&text)?;
            tracing::info!(
                path = %path.display(),
                modules = catalog.len(),
                "Loaded module catalog"
            );
            Ok(catalog)
        }
    }
}
