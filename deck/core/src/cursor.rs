//! Cursor Tracker
//!
//! Pointer-following state for a custom cursor overlay: last known
//! position, whether an interactive element is under it, and whether it
//! has been seen at all (surfaces hide the cursor until the first move).

/// State for a custom cursor overlay
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorTracker {
    position: (f32, f32),
    hovering: bool,
    visible: bool,
}

impl CursorTracker {
    /// Create a hidden tracker at the origin
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer move; the cursor becomes visible on first move
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.position = (x, y);
        self.visible = true;
    }

    /// Record whether an interactive element is under the pointer
    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    /// Last known pointer position
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Whether an interactive element is under the pointer
    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Whether the pointer has been seen yet
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
