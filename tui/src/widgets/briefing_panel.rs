//! BriefingPanel Widget
//!
//! The detail overlay for a selected module: a terminal-styled pane that
//! shows the uplink indicator while the briefing is fetched, the text as
//! it streams in, and the EXECUTE gate once the reveal completes.

use deck_core::{BriefingPhase, Module};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Clear, Widget};

use crate::theme;

/// Detail overlay for one module's briefing
pub struct BriefingPanel<'a> {
    module: &'a Module,
    phase: BriefingPhase,
    text: &'a str,
    /// Animation counter for the fetch indicator, advanced by the host
    pulse: u64,
}

impl<'a> BriefingPanel<'a> {
    /// Create a panel for a module with the current reveal state
    pub fn new(module: &'a Module, phase: BriefingPhase, text: &'a str, pulse: u64) -> Self {
        Self {
            module,
            phase,
            text,
            pulse,
        }
    }
}

impl Widget for BriefingPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            return;
        }

        Clear.render(area, buf);

        let accent = theme::accent(self.module.theme);
        let header = format!(" root@vibedeck:~/{} ", self.module.id);
        let hint = if self.phase == BriefingPhase::Ready {
            " [ENTER] EXECUTE   [ESC] CLOSE "
        } else {
            " [ESC] CLOSE "
        };

        let block = Block::bordered()
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(accent))
            .title(header)
            .title_bottom(hint);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 6 || inner.height < 5 {
            return;
        }

        // Module identity line.
        buf.set_string(
            inner.x + 1,
            inner.y,
            format!("MODULE: {}", self.module.title),
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        );
        let level = format!("[{}]", self.module.level);
        if inner.width > level.len() as u16 + 2 {
            buf.set_string(
                inner.right().saturating_sub(level.len() as u16 + 1),
                inner.y,
                &level,
                Style::default().fg(accent),
            );
        }

        buf.set_string(
            inner.x + 1,
            inner.y + 1,
            "> INITIALIZING PROTOCOL...",
            Style::default()
                .fg(theme::SUCCESS_GREEN)
                .add_modifier(Modifier::BOLD),
        );

        // Body: indicator or streamed text.
        let body = Rect::new(
            inner.x + 1,
            inner.y + 3,
            inner.width.saturating_sub(2),
            inner.height.saturating_sub(5),
        );

        match self.phase {
            BriefingPhase::Idle | BriefingPhase::Fetching => {
                let dots = ".".repeat((self.pulse % 4) as usize);
                buf.set_string(
                    body.x,
                    body.y,
                    format!("Establishing secure uplink{dots}"),
                    Style::default().fg(accent),
                );
            }
            BriefingPhase::Streaming | BriefingPhase::Ready => {
                self.render_body(body, buf);
            }
        }

        // Status line.
        let (status, style) = if self.phase == BriefingPhase::Ready {
            (
                "STATUS ░ READY TO EXECUTE",
                Style::default()
                    .fg(theme::SUCCESS_GREEN)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (
                "STATUS ░ AWAITING RESPONSE...",
                Style::default().fg(theme::WARNING_YELLOW),
            )
        };
        buf.set_string(inner.x + 1, inner.bottom().saturating_sub(1), status, style);
    }
}

impl BriefingPanel<'_> {
    fn render_body(&self, body: Rect, buf: &mut Buffer) {
        if body.width < 4 || body.height == 0 {
            return;
        }

        let prompt_width = 2usize;
        let wrap_width = (body.width as usize).saturating_sub(prompt_width);
        let mut lines: Vec<String> = textwrap::wrap(self.text, wrap_width)
            .into_iter()
            .map(|cow| cow.into_owned())
            .collect();
        if lines.is_empty() {
            lines.push(String::new());
        }

        if self.phase == BriefingPhase::Streaming {
            // Trailing cursor block rides the last revealed character.
            if let Some(last) = lines.last_mut() {
                last.push('▇');
            }
        }

        // Auto-scroll: keep the tail visible.
        let height = body.height as usize;
        let skip = lines.len().saturating_sub(height);

        for (i, line) in lines.iter().skip(skip).take(height).enumerate() {
            let y = body.y + i as u16;
            if i == 0 && skip == 0 {
                buf.set_string(body.x, y, "$", Style::default().fg(theme::PROMPT_GRAY));
            }
            buf.set_string(
                body.x + prompt_width as u16,
                y,
                line,
                Style::default().fg(theme::TEXT_PRIMARY),
            );
        }
    }
}
