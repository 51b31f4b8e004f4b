//! Tilt Engine
//!
//! Converts raw pointer position over a rectangular surface into a bounded
//! 3D rotation and a spotlight position, and tracks the hover transition.
//! Surfaces render the output however they like (CSS transforms, terminal
//! highlights); the engine owns only the numbers.
//!
//! Every operation is synchronous and allocation-free: there is exactly
//! one state snapshot per surface, updated in place on each pointer event.
//!
//! # Caller Contract
//!
//! Two preconditions are deliberately NOT checked at runtime, keeping the
//! hot path branch-minimal:
//!
//! - [`TiltEngine::pointer_move`] must only be called for pointers inside
//!   `rect`. Out-of-bounds positions produce rotations beyond the
//!   configured maximum; the engine does not clamp.
//! - `rect` must have non-zero width and height. A degenerate rectangle
//!   divides by zero and yields non-finite values.
//!
//! Hover transitions form a two-state machine: `Rest --enter--> Hovered`,
//! `Hovered --leave--> Rest`, with moves updating values in place while
//! hovered. Leaving snaps straight back to rest; easing the visual return
//! is a presentation concern.

use serde::{Deserialize, Serialize};

/// Maximum rotation magnitude, in degrees, for in-bounds pointers
pub const MAX_TILT_DEG: f32 = 12.0;

/// A surface's bounding rectangle in absolute pointer coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Width (must be non-zero, see module docs)
    pub width: f32,
    /// Height (must be non-zero, see module docs)
    pub height: f32,
}

impl SurfaceRect {
    /// Create a rectangle from its left/top corner and size
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Bounded rotation of the surface, in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation around the horizontal axis; positive tips the top away
    pub x_deg: f32,
    /// Rotation around the vertical axis; positive tips the right away
    pub y_deg: f32,
}

/// Spotlight tracking the pointer within the surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Spotlight {
    /// Horizontal position as a percentage of the surface width
    pub x_pct: f32,
    /// Vertical position as a percentage of the surface height
    pub y_pct: f32,
    /// Light intensity in `[0, 1]`; 0 at rest
    pub intensity: f32,
}

/// Pointer-derived visual state of one surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TiltState {
    /// Current rotation; `(0, 0)` at rest
    pub rotation: Rotation,
    /// Current spotlight; intensity 0 at rest
    pub spotlight: Spotlight,
    /// Whether the pointer is over the surface
    pub hovered: bool,
}

/// Pure tilt computation for a single pointer snapshot.
///
/// Normalizes the pointer offset from the surface center to `[-1, 1]` per
/// axis and scales it to `max_angle_deg`. Vertical pointer movement tilts
/// the X axis with inverted sign so the surface appears to face the
/// pointer. The caller contract in the module docs applies.
#[must_use]
pub fn compute_tilt(
    pointer_x: f32,
    pointer_y: f32,
    rect: SurfaceRect,
    max_angle_deg: f32,
) -> (Rotation, Spotlight) {
    let x = pointer_x - rect.left;
    let y = pointer_y - rect.top;

    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;
    let dx = (x - half_w) / half_w;
    let dy = (y - half_h) / half_h;

    let rotation = Rotation {
        x_deg: -dy * max_angle_deg,
        y_deg: dx * max_angle_deg,
    };
    let spotlight = Spotlight {
        x_pct: x / rect.width * 100.0,
        y_pct: y / rect.height * 100.0,
        intensity: 1.0,
    };

    (rotation, spotlight)
}

/// Stateful tilt tracker for one surface.
///
/// Lives as long as the surface does; there is no terminal state, only
/// the rest/hovered cycle.
#[derive(Clone, Copy, Debug)]
pub struct TiltEngine {
    state: TiltState,
    max_angle_deg: f32,
}

impl TiltEngine {
    /// Create an engine at rest with the default maximum angle
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: TiltState::default(),
            max_angle_deg: MAX_TILT_DEG,
        }
    }

    /// Override the maximum rotation magnitude
    #[must_use]
    pub fn with_max_angle(mut self, max_angle_deg: f32) -> Self {
        self.max_angle_deg = max_angle_deg;
        self
    }

    /// The pointer entered the surface
    pub fn pointer_enter(&mut self) {
        self.state.hovered = true;
    }

    /// The pointer moved while over the surface.
    ///
    /// See the module docs: the pointer must be inside `rect`, and `rect`
    /// must be non-degenerate.
    pub fn pointer_move(&mut self, pointer_x: f32, pointer_y: f32, rect: SurfaceRect) {
        let (rotation, spotlight) = compute_tilt(pointer_x, pointer_y, rect, self.max_angle_deg);
        self.state.rotation = rotation;
        self.state.spotlight = spotlight;
    }

    /// The pointer left the surface: snap back to rest.
    ///
    /// Rotation returns to `(0, 0)` and the spotlight goes dark; its last
    /// position is retained so a surface can fade it out in place.
    pub fn pointer_leave(&mut self) {
        self.state.hovered = false;
        self.state.rotation = Rotation::default();
        self.state.spotlight.intensity = 0.0;
    }

    /// Current state snapshot
    #[must_use]
    pub fn state(&self) -> TiltState {
        self.state
    }

    /// Whether the pointer is currently over the surface
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.state.hovered
    }
}

impl Default for TiltEngine {
    fn default() -> Self {
        Self::new()
    }
}
