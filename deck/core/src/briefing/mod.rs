//! Briefing Reveal State Machine
//!
//! Drives the fetch-then-stream lifecycle for a module's narrative
//! briefing: request the text from the narrative backend, reveal it one
//! character at a time on a fixed cadence, then flip to `Ready` and unlock
//! the follow-up action.
//!
//! # Design Philosophy
//!
//! The controller is a pure state machine. It never spawns tasks, never
//! sleeps, and never touches the clock: the two external events that move
//! a session forward - fetch resolution and the reveal tick - are fed in
//! by the caller (see [`BriefingDriver`] for the tokio adapter).
//! Each event carries the [`Generation`] token it was issued under, and
//! events from a superseded session are discarded without any observable
//! mutation. That makes supersession races impossible by construction and
//! keeps every transition synchronously testable.
//!
//! # Session Lifecycle
//!
//! ```text
//! Idle --select--> Fetching --fetch_resolved--> Streaming --tick*--> Ready
//!                      │                                               │
//!                      └--fetch_failed--> Streaming (fallback text) ---┘
//! ```
//!
//! At most one session is ever active: `select` and `clear` bump the
//! generation, which atomically invalidates every outstanding completion
//! of the previous session.

mod driver;

pub use driver::BriefingDriver;

use std::time::Duration;

use crate::module::{Module, ModuleId};

/// Default reveal cadence: one character per 25ms of wall time
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(25);

/// Briefing shown when the narrative backend cannot be reached.
///
/// A failed fetch is recovered locally: the session streams this text and
/// reaches `Ready` exactly as if the backend had produced it.
pub const FALLBACK_BRIEFING: &str = "Uplink severed. Operating on cached intel: \
proceed with standard protocol and report all anomalies on return.";

/// Monotonically increasing token identifying one briefing session.
///
/// Every asynchronous resumption (fetch resolution, reveal tick) carries
/// the generation it was issued under; the controller discards anything
/// stamped with a stale token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn bump(&mut self) -> Self {
        self.0 += 1;
        *self
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Phase of the active briefing session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BriefingPhase {
    /// No module selected
    #[default]
    Idle,
    /// Narrative fetch in flight; nothing visible yet
    Fetching,
    /// Text arrived and is being revealed character by character
    Streaming,
    /// The full text is visible; the follow-up action is unlocked
    Ready,
}

/// Everything the driver needs to issue one narrative fetch.
///
/// Returned by [`BriefingController::select`]; the generation stamped here
/// must be echoed back on [`BriefingController::fetch_resolved`] /
/// [`BriefingController::fetch_failed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    /// Session token the fetch was issued under
    pub generation: Generation,
    /// Module the fetch targets
    pub module_id: ModuleId,
    /// Module title, passed verbatim to the backend
    pub title: String,
    /// Flattened description (list items joined with ". ")
    pub description: String,
}

/// State machine driving one briefing reveal at a time.
///
/// See the module docs for the lifecycle. All operations are synchronous;
/// feed externally-timed events via `fetch_resolved`/`fetch_failed`/`tick`.
#[derive(Clone, Debug)]
pub struct BriefingController {
    generation: Generation,
    phase: BriefingPhase,
    module_id: Option<ModuleId>,
    full_text: Option<String>,
    /// Characters (Unicode scalars) currently revealed
    revealed_chars: usize,
    /// Byte length of the revealed prefix, kept in lockstep with
    /// `revealed_chars` so `visible_text` is a cheap slice
    visible_bytes: usize,
    fallback_text: String,
}

impl BriefingController {
    /// Create an idle controller with the default fallback text
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: Generation::default(),
            phase: BriefingPhase::Idle,
            module_id: None,
            full_text: None,
            revealed_chars: 0,
            visible_bytes: 0,
            fallback_text: FALLBACK_BRIEFING.to_string(),
        }
    }

    /// Replace the fallback text substituted on fetch failure
    #[must_use]
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback_text = text.into();
        self
    }

    /// Select a module (or deselect with `None`).
    ///
    /// Selecting supersedes any active session atomically: the generation
    /// is bumped before the new session starts, so completions belonging
    /// to the old session can never mutate the new one. Returns the fetch
    /// ticket for the new session, or `None` when deselecting.
    pub fn select(&mut self, module: Option<&Module>) -> Option<FetchTicket> {
        let Some(module) = module else {
            self.clear();
            return None;
        };

        let generation = self.generation.bump();
        self.phase = BriefingPhase::Fetching;
        self.module_id = Some(module.id.clone());
        self.full_text = None;
        self.revealed_chars = 0;
        self.visible_bytes = 0;

        tracing::debug!(%generation, module = %module.id, "Briefing session started");

        Some(FetchTicket {
            generation,
            module_id: module.id.clone(),
            title: module.title.clone(),
            description: module.flattened_description(),
        })
    }

    /// Cancel any in-flight session and return to `Idle`.
    ///
    /// Bumps the generation, so a fetch or tick that resolves later is
    /// discarded on arrival.
    pub fn clear(&mut self) {
        self.generation.bump();
        self.phase = BriefingPhase::Idle;
        self.module_id = None;
        self.full_text = None;
        self.revealed_chars = 0;
        self.visible_bytes = 0;
    }

    /// Feed a successful fetch completion.
    ///
    /// Transitions `Fetching -> Streaming` (or straight to `Ready` for
    /// empty text). Returns `false` - with no state change - when the
    /// completion is stale or the session is not fetching.
    pub fn fetch_resolved(&mut self, generation: Generation, text: String) -> bool {
        if !self.accepts(generation, BriefingPhase::Fetching) {
            tracing::debug!(%generation, current = %self.generation, "Discarded stale fetch");
            return false;
        }

        self.phase = if text.is_empty() {
            BriefingPhase::Ready
        } else {
            BriefingPhase::Streaming
        };
        self.full_text = Some(text);
        true
    }

    /// Feed a failed fetch completion.
    ///
    /// Substitutes the fallback text and proceeds through the normal
    /// `Streaming -> Ready` path; the failure is never surfaced to the
    /// caller. Returns `false` when stale.
    pub fn fetch_failed(&mut self, generation: Generation) -> bool {
        if !self.accepts(generation, BriefingPhase::Fetching) {
            tracing::debug!(%generation, current = %self.generation, "Discarded stale failure");
            return false;
        }

        tracing::warn!(%generation, "Narrative fetch failed, substituting fallback briefing");
        let fallback = self.fallback_text.clone();
        self.fetch_resolved(generation, fallback)
    }

    /// Feed one reveal-clock tick, disclosing the next character.
    ///
    /// Flips to `Ready` once the last character is revealed. Returns
    /// `false` - with no state change - when the tick is stale or the
    /// session is not streaming.
    pub fn tick(&mut self, generation: Generation) -> bool {
        if !self.accepts(generation, BriefingPhase::Streaming) {
            return false;
        }

        // Streaming implies full_text is present and not fully revealed.
        let Some(text) = self.full_text.as_ref() else {
            return false;
        };

        if let Some(ch) = text[self.visible_bytes..].chars().next() {
            self.visible_bytes += ch.len_utf8();
            self.revealed_chars += 1;
        }

        if self.visible_bytes == text.len() {
            self.phase = BriefingPhase::Ready;
            tracing::debug!(%generation, chars = self.revealed_chars, "Briefing fully revealed");
        }
        true
    }

    fn accepts(&self, generation: Generation, expected: BriefingPhase) -> bool {
        generation == self.generation && self.phase == expected
    }

    /// The currently visible portion of the briefing text.
    ///
    /// Empty while `Idle`/`Fetching`; the full text once `Ready`.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        match self.full_text.as_deref() {
            Some(text) => &text[..self.visible_bytes],
            None => "",
        }
    }

    /// Whether the briefing is fully revealed and the action unlocked
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == BriefingPhase::Ready
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> BriefingPhase {
        self.phase
    }

    /// Token of the active session
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Module the active session targets, if any
    #[must_use]
    pub fn module_id(&self) -> Option<&ModuleId> {
        self.module_id.as_ref()
    }

    /// Number of characters currently revealed
    #[must_use]
    pub fn revealed_len(&self) -> usize {
        self.revealed_chars
    }
}

impl Default for BriefingController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Module;

    fn alpha() -> Module {
        Module::new("alpha", "ALPHA").with_items(["Scan sector 9", "Report anomalies"])
    }

    fn run_to_ready(controller: &mut BriefingController, generation: Generation) {
        // Generous bound so a broken transition fails the assert below
        // instead of looping forever.
        for _ in 0..10_000 {
            if controller.is_ready() {
                break;
            }
            assert!(controller.tick(generation));
        }
        assert!(controller.is_ready());
    }

    #[test]
    fn test_select_issues_flattened_ticket() {
        let mut controller = BriefingController::new();
        let ticket = controller.select(Some(&alpha())).unwrap();

        assert_eq!(ticket.title, "ALPHA");
        assert_eq!(ticket.description, "Scan sector 9. Report anomalies");
        assert_eq!(controller.phase(), BriefingPhase::Fetching);
        assert_eq!(controller.visible_text(), "");
    }

    #[test]
    fn test_full_reveal_flow() {
        let mut controller = BriefingController::new();
        let ticket = controller.select(Some(&alpha())).unwrap();

        assert!(controller.fetch_resolved(ticket.generation, "Sector clear.".to_string()));
        assert_eq!(controller.phase(), BriefingPhase::Streaming);

        assert!(controller.tick(ticket.generation));
        assert_eq!(controller.visible_text(), "S");
        assert_eq!(controller.revealed_len(), 1);

        run_to_ready(&mut controller, ticket.generation);
        assert_eq!(controller.visible_text(), "Sector clear.");
        assert!(controller.is_ready());
    }

    #[test]
    fn test_reveal_is_monotone() {
        let mut controller = BriefingController::new();
        let ticket = controller.select(Some(&alpha())).unwrap();
        controller.fetch_resolved(ticket.generation, "abcdef".to_string());

        let mut last = 0;
        while !controller.is_ready() {
            controller.tick(ticket.generation);
            assert!(controller.revealed_len() >= last);
            assert!(controller.revealed_len() <= 6);
            last = controller.revealed_len();
        }
        assert_eq!(last, 6);
    }

    #[test]
    fn test_ready_is_stable_under_extra_ticks() {
        let mut controller = BriefingController::new();
        let ticket = controller.select(Some(&alpha())).unwrap();
        controller.fetch_resolved(ticket.generation, "ok".to_string());
        run_to_ready(&mut controller, ticket.generation);

        // Late ticks are stale with respect to phase and change nothing.
        assert!(!controller.tick(ticket.generation));
        assert!(controller.is_ready());
        assert_eq!(controller.visible_text(), "ok");
    }

    #[test]
    fn test_stale_fetch_discarded_after_reselect() {
        let mut controller = BriefingController::new();
        let first = controller.select(Some(&alpha())).unwrap();

        let beta = Module::new("beta", "BETA").with_text("standby");
        let second = controller.select(Some(&beta)).unwrap();
        assert_ne!(first.generation, second.generation);

        // The superseded fetch resolves late: no observable mutation.
        assert!(!controller.fetch_resolved(first.generation, "stale text".to_string()));
        assert_eq!(controller.phase(), BriefingPhase::Fetching);
        assert_eq!(controller.visible_text(), "");

        assert!(controller.fetch_resolved(second.generation, "fresh".to_string()));
        run_to_ready(&mut controller, second.generation);
        assert_eq!(controller.visible_text(), "fresh");
    }

    #[test]
    fn test_stale_tick_discarded_after_reselect() {
        let mut controller = BriefingController::new();
        let first = controller.select(Some(&alpha())).unwrap();
        controller.fetch_resolved(first.generation, "one".to_string());
        controller.tick(first.generation);

        let second = controller.select(Some(&alpha())).unwrap();
        assert!(!controller.tick(first.generation));
        assert_eq!(controller.phase(), BriefingPhase::Fetching);
        assert_eq!(second.generation, controller.generation());
    }

    #[test]
    fn test_fetch_failed_substitutes_fallback() {
        let mut controller = BriefingController::new().with_fallback("cached intel");
        let ticket = controller.select(Some(&alpha())).unwrap();

        assert!(controller.fetch_failed(ticket.generation));
        assert_eq!(controller.phase(), BriefingPhase::Streaming);

        run_to_ready(&mut controller, ticket.generation);
        assert_eq!(controller.visible_text(), "cached intel");
    }

    #[test]
    fn test_stale_failure_discarded() {
        let mut controller = BriefingController::new();
        let first = controller.select(Some(&alpha())).unwrap();
        controller.clear();

        assert!(!controller.fetch_failed(first.generation));
        assert_eq!(controller.phase(), BriefingPhase::Idle);
    }

    #[test]
    fn test_clear_resets_to_idle() {
        let mut controller = BriefingController::new();
        let ticket = controller.select(Some(&alpha())).unwrap();
        controller.fetch_resolved(ticket.generation, "text".to_string());
        controller.tick(ticket.generation);

        controller.clear();
        assert_eq!(controller.phase(), BriefingPhase::Idle);
        assert_eq!(controller.visible_text(), "");
        assert_eq!(controller.revealed_len(), 0);
        assert!(controller.module_id().is_none());

        // The old session's clock is dead.
        assert!(!controller.tick(ticket.generation));
    }

    #[test]
    fn test_select_none_clears() {
        let mut controller = BriefingController::new();
        controller.select(Some(&alpha())).unwrap();
        assert!(controller.select(None).is_none());
        assert_eq!(controller.phase(), BriefingPhase::Idle);
    }

    #[test]
    fn test_empty_text_completes_immediately() {
        let mut controller = BriefingController::new();
        let ticket = controller.select(Some(&alpha())).unwrap();
        assert!(controller.fetch_resolved(ticket.generation, String::new()));
        assert!(controller.is_ready());
        assert_eq!(controller.visible_text(), "");
    }

    #[test]
    fn test_multibyte_text_streams_by_scalar() {
        let mut controller = BriefingController::new();
        let ticket = controller.select(Some(&alpha())).unwrap();
        controller.fetch_resolved(ticket.generation, "résumé ✓".to_string());

        controller.tick(ticket.generation);
        assert_eq!(controller.visible_text(), "r");
        controller.tick(ticket.generation);
        assert_eq!(controller.visible_text(), "ré");

        run_to_ready(&mut controller, ticket.generation);
        assert_eq!(controller.visible_text(), "résumé ✓");
        assert_eq!(controller.revealed_len(), 8);
    }
}
