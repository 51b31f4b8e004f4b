//! End-to-end tests for the briefing reveal flow and the tilt engine,
//! driving the public API the way a surface would.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use deck_core::{
    compute_tilt, BriefingController, BriefingDriver, BriefingPhase, BriefingRequest, Module,
    NarrativeBackend, ScriptedBackend, SurfaceRect, TiltEngine, MAX_TILT_DEG,
};

fn alpha() -> Module {
    Module::new("alpha", "ALPHA").with_items(["Scan sector 9", "Report anomalies"])
}

/// The worked example from the design discussions: ALPHA's briefing call
/// receives the title and the ". "-joined description, and the returned
/// text streams to completion.
#[test]
fn alpha_example_end_to_end() {
    let mut controller = BriefingController::new();
    let ticket = controller.select(Some(&alpha())).unwrap();

    assert_eq!(ticket.title, "ALPHA");
    assert_eq!(ticket.description, "Scan sector 9. Report anomalies");

    let text = "Sector clear.";
    assert!(controller.fetch_resolved(ticket.generation, text.to_string()));

    for _ in 0..text.chars().count() {
        assert!(controller.tick(ticket.generation));
    }

    assert_eq!(controller.visible_text(), "Sector clear.");
    assert!(controller.is_ready());
}

/// Successful fetches always terminate in `Ready` with the full text
/// visible, regardless of the subject.
#[test]
fn every_selection_reaches_ready() {
    let subjects = [
        Module::new("a", "A").with_text("short"),
        Module::new("b", "B").with_items(["one", "two", "three"]),
        Module::new("c", "C").with_text("résumé ✓ done"),
    ];

    for subject in &subjects {
        let mut controller = BriefingController::new();
        let ticket = controller.select(Some(subject)).unwrap();
        let text = format!("Briefing for {}.", subject.title);
        controller.fetch_resolved(ticket.generation, text.clone());

        let mut guard = 0;
        while !controller.is_ready() {
            assert!(controller.tick(ticket.generation));
            guard += 1;
            assert!(guard <= text.chars().count());
        }
        assert_eq!(controller.visible_text(), text);
    }
}

/// Selecting S2 before S1's fetch resolves: S1's resolution must produce
/// no observable mutation of S2's session.
#[test]
fn superseded_fetch_never_leaks_text() {
    let mut controller = BriefingController::new();

    let s1 = controller.select(Some(&alpha())).unwrap();
    let beta = Module::new("beta", "BETA").with_text("standby");
    let s2 = controller.select(Some(&beta)).unwrap();

    assert!(!controller.fetch_resolved(s1.generation, "ALPHA INTEL".to_string()));
    assert_eq!(controller.phase(), BriefingPhase::Fetching);
    assert_eq!(controller.visible_text(), "");

    assert!(controller.fetch_resolved(s2.generation, "beta intel".to_string()));
    while !controller.is_ready() {
        controller.tick(s2.generation);
    }

    assert_eq!(controller.visible_text(), "beta intel");
    assert!(!controller.visible_text().contains("ALPHA"));
}

/// `revealed_len` is non-decreasing and bounded by the text length, and
/// `is_ready` stays true once set until the next selection.
#[test]
fn reveal_monotone_and_ready_stable() {
    let mut controller = BriefingController::new();
    let ticket = controller.select(Some(&alpha())).unwrap();
    controller.fetch_resolved(ticket.generation, "0123456789".to_string());

    let mut previous = 0;
    while !controller.is_ready() {
        controller.tick(ticket.generation);
        assert!(controller.revealed_len() >= previous);
        assert!(controller.revealed_len() <= 10);
        previous = controller.revealed_len();
    }

    // Ready is idempotent under further ticks.
    for _ in 0..5 {
        controller.tick(ticket.generation);
        assert!(controller.is_ready());
    }

    // A new selection starts a fresh, not-ready session.
    controller.select(Some(&alpha()));
    assert!(!controller.is_ready());
}

/// A rejected fetch still reaches `Ready` through the fallback text.
#[test]
fn fallback_reaches_ready() {
    let mut controller = BriefingController::new().with_fallback("cached intel only");
    let ticket = controller.select(Some(&alpha())).unwrap();

    assert!(controller.fetch_failed(ticket.generation));

    let mut ticks = 0;
    while !controller.is_ready() {
        controller.tick(ticket.generation);
        ticks += 1;
    }

    assert_eq!(controller.visible_text(), "cached intel only");
    assert_eq!(ticks, "cached intel only".chars().count());
}

// ---------------------------------------------------------------------------
// Driver tests (tokio)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn driver_streams_scripted_briefing() {
    let backend = Arc::new(ScriptedBackend::new().with_script("ALPHA", "Sector clear."));
    let mut driver = BriefingDriver::new(backend, "test-model");

    driver.select(Some(&alpha()));

    for _ in 0..100 {
        driver.pump();
        if driver.phase() != BriefingPhase::Fetching {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(driver.phase(), BriefingPhase::Streaming);

    driver.update(Duration::from_secs(1));
    assert!(driver.is_ready());
    assert_eq!(driver.visible_text(), "Sector clear.");
}

#[tokio::test]
async fn driver_supersession_keeps_only_latest() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_script("FIRST", "first intel")
            .with_script("SECOND", "second intel")
            .with_latency(Duration::from_millis(15)),
    );
    let mut driver = BriefingDriver::new(backend, "m");

    driver.select(Some(&Module::new("one", "FIRST").with_text("x")));
    driver.select(Some(&Module::new("two", "SECOND").with_text("y")));

    tokio::time::sleep(Duration::from_millis(100)).await;
    driver.pump();
    driver.update(Duration::from_secs(1));

    assert!(driver.is_ready());
    assert_eq!(driver.visible_text(), "second intel");
}

#[tokio::test]
async fn driver_failure_path_is_recovered() {
    let backend = Arc::new(ScriptedBackend::failing());
    let mut driver = BriefingDriver::new(backend, "m").with_fallback("fallback line");

    driver.select(Some(&alpha()));

    for _ in 0..100 {
        driver.pump();
        if driver.phase() != BriefingPhase::Fetching {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    driver.update(Duration::from_secs(1));
    assert!(driver.is_ready());
    assert_eq!(driver.visible_text(), "fallback line");
}

#[tokio::test]
async fn scripted_backend_round_trips_request_fields() {
    let backend = ScriptedBackend::new().with_script("ALPHA", "ok");
    let request = BriefingRequest::new("ALPHA", "Scan sector 9. Report anomalies");
    assert_eq!(backend.generate(&request).await.unwrap(), "ok");
    assert!(backend.health_check().await);
    assert_eq!(backend.name(), "Scripted");
}

// ---------------------------------------------------------------------------
// Tilt properties
// ---------------------------------------------------------------------------

#[test]
fn tilt_center_is_deterministic() {
    let rect = SurfaceRect::new(0.0, 0.0, 200.0, 100.0);
    let (rotation, spotlight) = compute_tilt(100.0, 50.0, rect, MAX_TILT_DEG);

    assert!(rotation.x_deg.abs() < 1e-5);
    assert!(rotation.y_deg.abs() < 1e-5);
    assert!((spotlight.x_pct - 50.0).abs() < 1e-5);
    assert!((spotlight.y_pct - 50.0).abs() < 1e-5);
    assert!((spotlight.intensity - 1.0).abs() < 1e-5);
}

#[test]
fn tilt_corner_hits_signed_max() {
    let rect = SurfaceRect::new(0.0, 0.0, 200.0, 100.0);
    let (rotation, _) = compute_tilt(200.0, 0.0, rect, MAX_TILT_DEG);

    assert!((rotation.y_deg - MAX_TILT_DEG).abs() < 1e-5);
    assert!((rotation.x_deg - MAX_TILT_DEG).abs() < 1e-5);
}

#[test]
fn tilt_rest_state_after_any_sequence() {
    let rect = SurfaceRect::new(10.0, 10.0, 120.0, 60.0);
    let mut engine = TiltEngine::new();

    engine.pointer_enter();
    for step in 0..50u16 {
        let px = 10.0 + f32::from(step) * 2.0;
        let py = 10.0 + f32::from(step % 30);
        engine.pointer_move(px.min(129.0), py.min(69.0), rect);
    }
    engine.pointer_leave();

    let state = engine.state();
    assert!(!state.hovered);
    assert!(state.rotation.x_deg.abs() < 1e-5);
    assert!(state.rotation.y_deg.abs() < 1e-5);
    assert!(state.spotlight.intensity.abs() < 1e-5);
}
