//! Briefing Driver
//!
//! Tokio adapter around [`BriefingController`]. The driver owns the async
//! plumbing the pure state machine refuses to know about: it spawns the
//! narrative fetch, carries the completion back over an mpsc channel, and
//! converts frame deltas into reveal-clock ticks.
//!
//! The host loop calls [`BriefingDriver::pump`] and
//! [`BriefingDriver::update`] once per frame; both are non-blocking.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::{BriefingController, BriefingPhase, Generation, DEFAULT_REVEAL_INTERVAL};
use crate::backend::{BriefingRequest, NarrativeBackend};
use crate::module::Module;

/// Completion of a spawned narrative fetch, stamped with its generation
#[derive(Debug)]
enum FetchOutcome {
    Resolved {
        generation: Generation,
        text: String,
    },
    Failed {
        generation: Generation,
        error: String,
    },
}

/// Drives a [`BriefingController`] from a tokio runtime.
///
/// Fetches run as detached tasks; a superseded fetch still completes, but
/// its outcome carries a stale generation and is discarded by the
/// controller at the next [`pump`](Self::pump).
pub struct BriefingDriver {
    controller: BriefingController,
    backend: Arc<dyn NarrativeBackend>,
    model: String,
    outcome_tx: mpsc::Sender<FetchOutcome>,
    outcome_rx: mpsc::Receiver<FetchOutcome>,
    reveal_interval: Duration,
    /// Wall time accumulated toward the next reveal tick
    tick_budget: Duration,
}

impl BriefingDriver {
    /// Create a driver with the default reveal cadence
    #[must_use]
    pub fn new(backend: Arc<dyn NarrativeBackend>, model: impl Into<String>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(8);
        Self {
            controller: BriefingController::new(),
            backend,
            model: model.into(),
            outcome_tx,
            outcome_rx,
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            tick_budget: Duration::ZERO,
        }
    }

    /// Override the reveal cadence (wall time per revealed character)
    #[must_use]
    pub fn with_reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }

    /// Override the fallback text substituted on fetch failure
    #[must_use]
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.controller = self.controller.clone().with_fallback(text);
        self
    }

    /// Select a module (or deselect with `None`) and issue its fetch.
    ///
    /// Must be called from within a tokio runtime. Exactly one fetch is
    /// spawned per selection; any prior in-flight fetch is superseded and
    /// will be discarded on arrival.
    pub fn select(&mut self, module: Option<&Module>) {
        self.tick_budget = Duration::ZERO;
        let Some(ticket) = self.controller.select(module) else {
            return;
        };

        let request = BriefingRequest::new(ticket.title, ticket.description)
            .with_model(self.model.clone());
        let backend = Arc::clone(&self.backend);
        let tx = self.outcome_tx.clone();
        let generation = ticket.generation;

        tokio::spawn(async move {
            let outcome = match backend.generate(&request).await {
                Ok(text) => FetchOutcome::Resolved { generation, text },
                Err(error) => FetchOutcome::Failed {
                    generation,
                    error: error.to_string(),
                },
            };
            // Receiver gone means the driver was dropped; nothing to do.
            let _ = tx.send(outcome).await;
        });
    }

    /// Cancel the active session and return to `Idle`
    pub fn clear(&mut self) {
        self.tick_budget = Duration::ZERO;
        self.controller.clear();
    }

    /// Drain fetch completions (non-blocking) and apply the fresh ones
    pub fn pump(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            match outcome {
                FetchOutcome::Resolved { generation, text } => {
                    self.controller.fetch_resolved(generation, text);
                }
                FetchOutcome::Failed { generation, error } => {
                    tracing::warn!(%generation, error, "Narrative fetch failed");
                    self.controller.fetch_failed(generation);
                }
            }
        }
    }

    /// Advance the reveal clock by one frame's wall time.
    ///
    /// Emits one controller tick per elapsed reveal interval, so the
    /// cadence is independent of the host's frame rate.
    pub fn update(&mut self, delta: Duration) {
        if self.controller.phase() != BriefingPhase::Streaming {
            self.tick_budget = Duration::ZERO;
            return;
        }

        self.tick_budget += delta;
        let generation = self.controller.generation();
        while self.tick_budget >= self.reveal_interval {
            self.tick_budget -= self.reveal_interval;
            if !self.controller.tick(generation) {
                break;
            }
        }
    }

    /// The underlying state machine (read-only)
    #[must_use]
    pub fn controller(&self) -> &BriefingController {
        &self.controller
    }

    /// Currently visible briefing text
    #[must_use]
    pub fn visible_text(&self) -> &str {
        self.controller.visible_text()
    }

    /// Whether the active briefing is fully revealed
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.controller.is_ready()
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> BriefingPhase {
        self.controller.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScriptedBackend;

    fn module(id: &str, title: &str) -> Module {
        Module::new(id, title).with_text("test module")
    }

    /// Pump until the fetch lands or the deadline passes.
    async fn pump_until_fetched(driver: &mut BriefingDriver) {
        for _ in 0..100 {
            driver.pump();
            if driver.phase() != BriefingPhase::Fetching {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("fetch never resolved");
    }

    #[tokio::test]
    async fn test_select_fetch_stream_ready() {
        let backend = Arc::new(ScriptedBackend::new().with_script("ALPHA", "Sector clear."));
        let mut driver = BriefingDriver::new(backend, "test-model");

        driver.select(Some(&module("alpha", "ALPHA")));
        assert_eq!(driver.phase(), BriefingPhase::Fetching);

        pump_until_fetched(&mut driver).await;
        assert_eq!(driver.phase(), BriefingPhase::Streaming);

        // 13 characters at 25ms each; hand the clock the whole span at once.
        driver.update(Duration::from_millis(25 * 13));
        assert!(driver.is_ready());
        assert_eq!(driver.visible_text(), "Sector clear.");
    }

    #[tokio::test]
    async fn test_clock_paces_reveal_across_frames() {
        let backend = Arc::new(ScriptedBackend::new().with_script("ALPHA", "abcd"));
        let mut driver =
            BriefingDriver::new(backend, "m").with_reveal_interval(Duration::from_millis(10));

        driver.select(Some(&module("alpha", "ALPHA")));
        pump_until_fetched(&mut driver).await;

        driver.update(Duration::from_millis(15));
        assert_eq!(driver.visible_text(), "a");
        driver.update(Duration::from_millis(5));
        assert_eq!(driver.visible_text(), "ab");
        driver.update(Duration::from_millis(100));
        assert!(driver.is_ready());
        assert_eq!(driver.visible_text(), "abcd");
    }

    #[tokio::test]
    async fn test_reselect_supersedes_inflight_fetch() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_script("FIRST", "first text")
                .with_script("SECOND", "second text")
                .with_latency(Duration::from_millis(20)),
        );
        let mut driver = BriefingDriver::new(backend, "m");

        driver.select(Some(&module("one", "FIRST")));
        driver.select(Some(&module("two", "SECOND")));

        // Let both fetches land, then drain them together: the stale one
        // must leave no trace.
        tokio::time::sleep(Duration::from_millis(80)).await;
        driver.pump();

        assert_eq!(driver.phase(), BriefingPhase::Streaming);
        driver.update(Duration::from_secs(1));
        assert_eq!(driver.visible_text(), "second text");
        assert_eq!(
            driver.controller().module_id().map(crate::module::ModuleId::as_str),
            Some("two")
        );
    }

    #[tokio::test]
    async fn test_backend_failure_recovers_with_fallback() {
        let backend = Arc::new(ScriptedBackend::failing());
        let mut driver = BriefingDriver::new(backend, "m").with_fallback("cached intel");

        driver.select(Some(&module("alpha", "ALPHA")));
        pump_until_fetched(&mut driver).await;
        assert_eq!(driver.phase(), BriefingPhase::Streaming);

        driver.update(Duration::from_secs(2));
        assert!(driver.is_ready());
        assert_eq!(driver.visible_text(), "cached intel");
    }

    #[tokio::test]
    async fn test_clear_cancels_clock_and_fetch() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_script("ALPHA", "text")
                .with_latency(Duration::from_millis(20)),
        );
        let mut driver = BriefingDriver::new(backend, "m");

        driver.select(Some(&module("alpha", "ALPHA")));
        driver.clear();

        tokio::time::sleep(Duration::from_millis(80)).await;
        driver.pump();
        driver.update(Duration::from_secs(1));

        assert_eq!(driver.phase(), BriefingPhase::Idle);
        assert_eq!(driver.visible_text(), "");
    }
}
