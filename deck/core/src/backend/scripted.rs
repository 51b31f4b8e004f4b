//! Scripted Backend
//!
//! Deterministic narrative backend for tests and offline demo runs:
//! canned briefings keyed by module title, optional artificial latency,
//! and a failure switch for exercising the fallback path.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{BriefingRequest, NarrativeBackend};

/// Canned-response narrative backend
#[derive(Clone, Debug, Default)]
pub struct ScriptedBackend {
    scripts: HashMap<String, String>,
    default_text: String,
    latency: Duration,
    fail: bool,
}

impl ScriptedBackend {
    /// Create a scripted backend with no scripts and a generic default
    #[must_use]
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            default_text: "Module briefing unavailable in this build.".to_string(),
            latency: Duration::ZERO,
            fail: false,
        }
    }

    /// Create a backend whose every request fails
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Add a canned briefing for a module title
    #[must_use]
    pub fn with_script(mut self, title: impl Into<String>, text: impl Into<String>) -> Self {
        self.scripts.insert(title.into(), text.into());
        self
    }

    /// Set the text returned for titles without a script
    #[must_use]
    pub fn with_default(mut self, text: impl Into<String>) -> Self {
        self.default_text = text.into();
        self
    }

    /// Add artificial latency before each response
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Canned roster for offline demo runs of the built-in catalog
    #[must_use]
    pub fn demo() -> Self {
        Self::new()
            .with_latency(Duration::from_millis(600))
            .with_script(
                "NEURAL NET",
                "Inference lattice nominal at eighty-seven percent load. \
                 Watch node cluster 14 for weight drift and quarantine on first divergence.",
            )
            .with_script(
                "AEGIS WALL",
                "Perimeter holds; zero live threats on the board. \
                 Cipher rotation completes at the top of the hour - keep the old keys warm until then.",
            )
            .with_script(
                "UPLINK ARRAY",
                "Dish cluster aligned, carrier lock steady at minus forty-two. \
                 Expect KA-band scatter during the next solar pass.",
            )
            .with_script(
                "CRYPT VAULT",
                "All twelve shards sealed and the ledger is clean. \
                 Next audit window opens in six hours.",
            )
            .with_script(
                "DIAGNOSTICS",
                "Last sweep cleared every subsystem in four minutes twelve. \
                 Run the deep pass before the next sortie.",
            )
            .with_script(
                "DEEP ARCHIVE",
                "One point two million records indexed; compaction backlog is shrinking. \
                 Stale mission logs older than ninety days are queued for cold storage.",
            )
            .with_script(
                "COMMS RELAY",
                "All sixty-four fleet channels bridged and buffering. \
                 Burst traffic from the outer picket is heavier than usual - keep an ear on it.",
            )
            .with_script(
                "POWER GRID",
                "Output steady at one point two one gigawatts, cells balanced. \
                 Thermal spike on ring three vented clean; watch for a repeat.",
            )
    }
}

#[async_trait]
impl NarrativeBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    async fn health_check(&self) -> bool {
        !self.fail
    }

    async fn generate(&self, request: &BriefingRequest) -> anyhow::Result<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.fail {
            anyhow::bail!("scripted backend configured to fail");
        }

        Ok(self
            .scripts
            .get(&request.title)
            .cloned()
            .unwrap_or_else(|| self.default_text.clone()))
    }
}
