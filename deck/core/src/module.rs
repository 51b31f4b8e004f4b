//! Module Data Model
//!
//! The selectable entities shown on the deck grid. A `Module` is immutable
//! once built: the caller constructs it (or loads it from a catalog file)
//! and hands references to the briefing and tilt machinery. Nothing in the
//! core mutates a module after construction.

use serde::{Deserialize, Serialize};

/// Stable identifier for a module
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Create a new module ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Module description - either free text or an itemized list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleDescription {
    /// A single free-text paragraph
    Text(String),
    /// A list of short directives, rendered one per line
    Items(Vec<String>),
}

impl ModuleDescription {
    /// Flatten to a single line for the narrative backend.
    ///
    /// List items are joined with a period-and-space separator, so
    /// `["Scan sector 9", "Report anomalies"]` becomes
    /// `"Scan sector 9. Report anomalies"`.
    #[must_use]
    pub fn flattened(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Items(items) => items.join(". "),
        }
    }

    /// Lines for grid rendering (a text description is a single line)
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::Items(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for ModuleDescription {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Security classification of a module
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    /// Baseline clearance
    #[default]
    Standard,
    /// Requires elevated clearance
    Elevated,
    /// Operator-critical systems
    Critical,
    /// Highest classification
    Omega,
}

impl SecurityLevel {
    /// Full display name, uppercase
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Elevated => "ELEVATED",
            Self::Critical => "CRITICAL",
            Self::Omega => "OMEGA",
        }
    }

    /// Three-letter badge form for tight layouts
    #[must_use]
    pub fn abbrev(self) -> &'static str {
        match self {
            Self::Standard => "STA",
            Self::Elevated => "ELE",
            Self::Critical => "CRI",
            Self::Omega => "OME",
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Accent color family a surface should render a module with
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// Cyan accent (default)
    #[default]
    Cyan,
    /// Violet accent
    Violet,
    /// Rose accent
    Rose,
    /// Amber accent
    Amber,
}

/// A small label/value pair shown in a module's footer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleStat {
    /// Uppercase label (e.g. "LOAD")
    pub label: String,
    /// Rendered value (e.g. "87%")
    pub value: String,
}

impl ModuleStat {
    /// Create a new stat pair
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A selectable deck module
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Stable identifier
    pub id: ModuleId,
    /// Display title
    pub title: String,
    /// Free-text or itemized description
    #[serde(default)]
    pub description: ModuleDescription,
    /// Security classification
    #[serde(default)]
    pub level: SecurityLevel,
    /// Accent color family
    #[serde(default)]
    pub theme: ColorTheme,
    /// Follow-up action reference, unlocked once a briefing is fully revealed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    /// Footer stats
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<ModuleStat>,
}

impl Module {
    /// Create a module with the given id and title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: ModuleId::new(id),
            title: title.into(),
            description: ModuleDescription::default(),
            level: SecurityLevel::default(),
            theme: ColorTheme::default(),
            action_url: None,
            stats: Vec::new(),
        }
    }

    /// Set a free-text description
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.description = ModuleDescription::Text(text.into());
        self
    }

    /// Set an itemized description
    #[must_use]
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description = ModuleDescription::Items(items.into_iter().map(Into::into).collect());
        self
    }

    /// Set the security level
    #[must_use]
    pub fn with_level(mut self, level: SecurityLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the accent theme
    #[must_use]
    pub fn with_theme(mut self, theme: ColorTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Append a footer stat
    #[must_use]
    pub fn with_stat(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.stats.push(ModuleStat::new(label, value));
        self
    }

    /// Set the follow-up action reference
    #[must_use]
    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    /// Description flattened to one line for the narrative backend
    #[must_use]
    pub fn flattened_description(&self) -> String {
        self.description.flattened()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_builder() {
        let module = Module::new("neural-net", "NEURAL NET")
            .with_items(["Scan sector 9", "Report anomalies"])
            .with_level(SecurityLevel::Critical)
            .with_theme(ColorTheme::Violet)
            .with_stat("LOAD", "87%")
            .with_action_url("deck://neural-net/console");

        assert_eq!(module.id.as_str(), "neural-net");
        assert_eq!(module.title, "NEURAL NET");
        assert_eq!(module.level, SecurityLevel::Critical);
        assert_eq!(module.theme, ColorTheme::Violet);
        assert_eq!(module.stats.len(), 1);
        assert_eq!(module.action_url.as_deref(), Some("deck://neural-net/console"));
    }

    #[test]
    fn test_flattened_description_joins_items() {
        let module =
            Module::new("alpha", "ALPHA").with_items(["Scan sector 9", "Report anomalies"]);
        assert_eq!(
            module.flattened_description(),
            "Scan sector 9. Report anomalies"
        );
    }

    #[test]
    fn test_flattened_description_passes_text_through() {
        let module = Module::new("beta", "BETA").with_text("Single paragraph.");
        assert_eq!(module.flattened_description(), "Single paragraph.");
    }

    #[test]
    fn test_level_badges() {
        assert_eq!(SecurityLevel::Omega.name(), "OMEGA");
        assert_eq!(SecurityLevel::Omega.abbrev(), "OME");
        assert_eq!(SecurityLevel::Standard.to_string(), "STANDARD");
    }

    #[test]
    fn test_description_lines() {
        let items = ModuleDescription::Items(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(items.lines(), vec!["a", "b"]);

        let text = ModuleDescription::Text("c".to_string());
        assert_eq!(text.lines(), vec!["c"]);
    }
}
