//! ModuleCard Widget
//!
//! One selectable card on the deck grid. The tilt state from the core
//! drives two effects a terminal can actually show: the title shifts a
//! column or two with the Y rotation (parallax), and the spotlight
//! brightens the cells under the pointer.

use deck_core::{Module, TiltState, MAX_TILT_DEG};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Widget};
use unicode_width::UnicodeWidthStr;

use crate::theme;

/// A module card with its current tilt state
pub struct ModuleCard<'a> {
    module: &'a Module,
    tilt: TiltState,
}

impl<'a> ModuleCard<'a> {
    /// Create a card for a module
    pub fn new(module: &'a Module, tilt: TiltState) -> Self {
        Self { module, tilt }
    }

    /// Horizontal parallax offset derived from the Y rotation
    fn title_shift(&self) -> i16 {
        let norm = self.tilt.rotation.y_deg / MAX_TILT_DEG;
        (norm * 2.0).round() as i16
    }
}

impl Widget for ModuleCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 8 || area.height < 5 {
            return;
        }

        let accent = theme::accent(self.module.theme);
        let border_style = if self.tilt.hovered {
            Style::default().fg(accent)
        } else {
            Style::default().fg(theme::BORDER_DIM)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height < 3 {
            return;
        }

        // Title row with parallax shift, level badge right-aligned.
        let title_style = Style::default()
            .fg(theme::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD);
        let shift = self.title_shift();
        let base_x = i32::from(inner.x) + 1 + i32::from(shift);
        let title_x = base_x.clamp(i32::from(inner.x), i32::from(inner.right()) - 1) as u16;
        let title: String = self
            .module
            .title
            .chars()
            .take(inner.width.saturating_sub(8) as usize)
            .collect();
        buf.set_string(title_x, inner.y, &title, title_style);

        let badge = format!("SEC:{}", self.module.level.abbrev());
        if inner.width as usize > title.width() + badge.len() + 2 {
            let badge_style = if self.tilt.hovered {
                Style::default().fg(theme::SUCCESS_GREEN)
            } else {
                Style::default().fg(theme::TEXT_DIM)
            };
            let badge_x = inner.right().saturating_sub(badge.len() as u16 + 1);
            buf.set_string(badge_x, inner.y, &badge, badge_style);
        }

        // Divider.
        if inner.height > 1 {
            let divider = "─".repeat(inner.width.saturating_sub(2) as usize);
            buf.set_string(
                inner.x + 1,
                inner.y + 1,
                &divider,
                Style::default().fg(theme::BORDER_DIM),
            );
        }

        // Description lines.
        let desc_style = if self.tilt.hovered {
            Style::default().fg(theme::TEXT_PRIMARY)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        let stats_rows = usize::from(!self.module.stats.is_empty());
        let desc_budget = (inner.height as usize).saturating_sub(2 + stats_rows);
        for (i, line) in self.module.description.lines().iter().take(desc_budget).enumerate() {
            let y = inner.y + 2 + i as u16;
            buf.set_string(inner.x + 1, y, "►", Style::default().fg(accent));
            let text: String = line
                .chars()
                .take(inner.width.saturating_sub(4) as usize)
                .collect();
            buf.set_string(inner.x + 3, y, &text, desc_style);
        }

        // Stats on the bottom row.
        if !self.module.stats.is_empty() {
            let y = inner.bottom().saturating_sub(1);
            let mut x = inner.x + 1;
            for stat in &self.module.stats {
                let label = format!("{} ", stat.label);
                let value = format!("{}  ", stat.value);
                let needed = (label.len() + value.len()) as u16;
                if x + needed > inner.right() {
                    break;
                }
                buf.set_string(x, y, &label, Style::default().fg(theme::PROMPT_GRAY));
                x += label.len() as u16;
                buf.set_string(x, y, &value, Style::default().fg(theme::TEXT_PRIMARY));
                x += value.len() as u16;
            }
        }

        // Spotlight glare under the pointer.
        if self.tilt.spotlight.intensity > 0.0 {
            let sx = inner.x as f32 + self.tilt.spotlight.x_pct / 100.0 * f32::from(inner.width);
            let sy = inner.y as f32 + self.tilt.spotlight.y_pct / 100.0 * f32::from(inner.height);
            let glare = Rect::new(
                (sx as u16).saturating_sub(1),
                sy as u16,
                3,
                1,
            )
            .intersection(inner);
            buf.set_style(glare, Style::default().bg(theme::GLARE));
        }
    }
}
