//! Theme and Colors
//!
//! The deck's neon-on-black palette. Accent colors match the four module
//! color themes; the rest are shared UI tones.

use deck_core::ColorTheme;
use ratatui::style::Color;

// ============================================================================
// Module Accent Colors
// ============================================================================

/// Cyan accent
pub const CYAN_ACCENT: Color = Color::Rgb(34, 211, 238);

/// Violet accent
pub const VIOLET_ACCENT: Color = Color::Rgb(167, 139, 250);

/// Rose accent
pub const ROSE_ACCENT: Color = Color::Rgb(251, 113, 133);

/// Amber accent
pub const AMBER_ACCENT: Color = Color::Rgb(251, 191, 36);

/// Accent color for a module theme
pub fn accent(theme: ColorTheme) -> Color {
    match theme {
        ColorTheme::Cyan => CYAN_ACCENT,
        ColorTheme::Violet => VIOLET_ACCENT,
        ColorTheme::Rose => ROSE_ACCENT,
        ColorTheme::Amber => AMBER_ACCENT,
    }
}

// ============================================================================
// UI Colors
// ============================================================================

/// Primary text
pub const TEXT_PRIMARY: Color = Color::Rgb(229, 231, 235);

/// Secondary text
pub const TEXT_DIM: Color = Color::Rgb(156, 163, 175);

/// Borders and separators at rest
pub const BORDER_DIM: Color = Color::Rgb(75, 85, 99);

/// Spotlight glare background
pub const GLARE: Color = Color::Rgb(55, 65, 81);

/// Ready / online green
pub const SUCCESS_GREEN: Color = Color::Rgb(74, 222, 128);

/// Pending / waiting yellow
pub const WARNING_YELLOW: Color = Color::Rgb(250, 204, 21);

/// Terminal prompt gray
pub const PROMPT_GRAY: Color = Color::Rgb(107, 114, 128);
