//! Main Application
//!
//! The App owns the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize) over crossterm's EventStream
//! - Pointer hit-testing that feeds the per-card tilt engines
//! - A `BriefingDriver` for the selected module's reveal session
//! - Rendering of the grid, footer, and detail overlay
//!
//! All interaction semantics live in `deck-core`; the App only routes
//! events in and draws state out.

use std::io;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;
use ratatui::Terminal;

use deck_core::{
    load_catalog_from_path, load_config_from_path, BriefingDriver, Catalog, CursorTracker,
    DeckConfig, Module, NarrativeBackend, OllamaBackend, RandomTagSource, ScriptedBackend,
    SurfaceRect, TagSource, TiltEngine,
};

use crate::theme;
use crate::widgets::{BriefingPanel, ModuleCard};

/// Card grid geometry
const CARD_WIDTH: u16 = 34;
const CARD_HEIGHT: u16 = 9;
const CARD_GAP: u16 = 2;
const GRID_LEFT: u16 = 2;
/// Rows consumed by the page header
const HEADER_HEIGHT: u16 = 4;
/// Rows reserved for the footer
const FOOTER_HEIGHT: u16 = 1;

/// One card slot on the grid
struct Card {
    module: Module,
    tilt: TiltEngine,
    /// Screen rect; empty when the card doesn't fit the current terminal
    rect: Rect,
}

/// A section header row
struct SectionHeader {
    title: String,
    y: u16,
}

/// Recompute card rects and section header rows for a terminal area.
///
/// Cards that don't fully fit above the footer get an empty rect and are
/// skipped by rendering and hit-testing.
fn reflow(
    sections: &[(String, Range<usize>)],
    cards: &mut [Card],
    area: Rect,
) -> Vec<SectionHeader> {
    let mut headers = Vec::new();
    let columns = ((area.width.saturating_sub(GRID_LEFT)) / (CARD_WIDTH + CARD_GAP)).max(1);
    let bottom_limit = area.height.saturating_sub(FOOTER_HEIGHT);
    let mut y = HEADER_HEIGHT + 1;

    for (title, range) in sections {
        headers.push(SectionHeader {
            title: title.clone(),
            y,
        });
        y += 2;

        for (offset, index) in range.clone().enumerate() {
            let col = offset as u16 % columns;
            let row = offset as u16 / columns;
            let x = GRID_LEFT + col * (CARD_WIDTH + CARD_GAP);
            let card_y = y + row * (CARD_HEIGHT + 1);

            let fits = card_y + CARD_HEIGHT <= bottom_limit && x + CARD_WIDTH <= area.width;
            cards[index].rect = if fits {
                Rect::new(x, card_y, CARD_WIDTH, CARD_HEIGHT)
            } else {
                Rect::default()
            };
        }

        let rows = (range.len() as u16).div_ceil(columns);
        y += rows * (CARD_HEIGHT + 1) + 1;
    }

    headers
}

/// Main application state
pub struct App {
    running: bool,
    /// Section titles with the index range of their cards
    sections: Vec<(String, Range<usize>)>,
    cards: Vec<Card>,
    headers: Vec<SectionHeader>,
    hovered: Option<usize>,
    /// Card index whose overlay is open
    selected: Option<usize>,
    driver: BriefingDriver,
    backend_name: String,
    backend_online: bool,
    cursor: CursorTracker,
    session_tag: String,
    /// Action reported on the last EXECUTE, shown after exit
    last_action: Option<String>,
    last_frame: Instant,
    frames: u64,
}

impl App {
    /// Create a new App instance.
    ///
    /// Reads configuration and catalog paths from `VIBEDECK_CONFIG` /
    /// `VIBEDECK_CATALOG`; set `VIBEDECK_OFFLINE` to use the scripted
    /// demo backend instead of Ollama.
    pub async fn new() -> anyhow::Result<Self> {
        let config = load_config_from_path(env_path("VIBEDECK_CONFIG"))?;
        let catalog = load_catalog_from_path(env_path("VIBEDECK_CATALOG"))?;

        let backend: Arc<dyn NarrativeBackend> = if std::env::var("VIBEDECK_OFFLINE").is_ok() {
            Arc::new(ScriptedBackend::demo())
        } else {
            Arc::new(OllamaBackend::new(
                config.backend_host.clone(),
                config.backend_port,
            ))
        };
        let backend_name = backend.name().to_string();

        // Bounded probe so a dead backend can't stall startup.
        let backend_online =
            tokio::time::timeout(Duration::from_millis(800), backend.health_check())
                .await
                .unwrap_or(false);
        tracing::info!(backend = %backend_name, online = backend_online, "Backend probed");

        let driver = BriefingDriver::new(Arc::clone(&backend), config.model.clone())
            .with_reveal_interval(config.reveal_interval)
            .with_fallback(config.fallback_text.clone());

        let size = crossterm::terminal::size()?;
        let (sections, mut cards) = build_cards(&catalog, &config);
        let headers = reflow(&sections, &mut cards, Rect::new(0, 0, size.0, size.1));

        Ok(Self {
            running: true,
            sections,
            cards,
            headers,
            hovered: None,
            selected: None,
            driver,
            backend_name,
            backend_online,
            cursor: CursorTracker::new(),
            session_tag: RandomTagSource.session_tag(),
            last_action: None,
            last_frame: Instant::now(),
            frames: 0,
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let frame_duration = Duration::from_millis(33);
        let mut event_stream = EventStream::new();

        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key);
                            }
                            Event::Mouse(mouse) => self.handle_mouse(mouse),
                            Event::Resize(w, h) => self.handle_resize(w, h),
                            _ => {}
                        }
                    }
                }

                _ = tokio::time::sleep(frame_duration) => {}
            }

            self.update();
            self.render(terminal)?;
        }

        Ok(())
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.selected.is_some() {
                    self.close_overlay();
                } else {
                    self.running = false;
                }
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('q') if self.selected.is_none() => {
                self.running = false;
            }
            KeyCode::Enter | KeyCode::Char('e') => self.execute_action(),
            _ => {}
        }
    }

    /// Handle mouse input: hover drives the tilt engines, click selects
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.pointer_moved(mouse.column, mouse.row);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if self.selected.is_none() {
                    if let Some(index) = self.card_at(mouse.column, mouse.row) {
                        self.open_overlay(index);
                    }
                }
            }
            _ => {}
        }
    }

    fn pointer_moved(&mut self, column: u16, row: u16) {
        self.cursor.pointer_moved(f32::from(column), f32::from(row));

        // The grid is inert while the overlay is up.
        let target = if self.selected.is_none() {
            self.card_at(column, row)
        } else {
            None
        };

        if target != self.hovered {
            if let Some(old) = self.hovered {
                self.cards[old].tilt.pointer_leave();
            }
            if let Some(new) = target {
                self.cards[new].tilt.pointer_enter();
            }
            self.hovered = target;
        }

        self.cursor.set_hovering(target.is_some());

        // Only in-bounds pointers are forwarded; the tilt engine's caller
        // contract requires it.
        if let Some(index) = target {
            let rect = self.cards[index].rect;
            let surface = SurfaceRect::new(
                f32::from(rect.x),
                f32::from(rect.y),
                f32::from(rect.width),
                f32::from(rect.height),
            );
            self.cards[index]
                .tilt
                .pointer_move(f32::from(column), f32::from(row), surface);
        }
    }

    /// Index of the card under a screen position, if any
    fn card_at(&self, column: u16, row: u16) -> Option<usize> {
        let position = Position::new(column, row);
        self.cards
            .iter()
            .position(|card| card.rect.width > 0 && card.rect.contains(position))
    }

    fn open_overlay(&mut self, index: usize) {
        // Release the hover so the grid is at rest behind the overlay.
        if let Some(old) = self.hovered.take() {
            self.cards[old].tilt.pointer_leave();
        }
        self.selected = Some(index);
        let module = self.cards[index].module.clone();
        tracing::info!(module = %module.id, "Module selected");
        self.driver.select(Some(&module));
    }

    fn close_overlay(&mut self) {
        self.selected = None;
        self.driver.select(None);
    }

    /// EXECUTE: only once the briefing is fully revealed
    fn execute_action(&mut self) {
        let Some(index) = self.selected else {
            return;
        };
        if !self.driver.is_ready() {
            return;
        }

        // The shell performs no navigation; it only reports the reference.
        if let Some(url) = self.cards[index].module.action_url.clone() {
            tracing::info!(action = %url, "Action dispatched");
            self.last_action = Some(url);
        }
        self.close_overlay();
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.headers = reflow(&self.sections, &mut self.cards, Rect::new(0, 0, width, height));

        // Stale rects invalidate the hover.
        if let Some(old) = self.hovered.take() {
            self.cards[old].tilt.pointer_leave();
        }
        self.cursor.set_hovering(false);
    }

    /// Advance the briefing clock and drain fetch completions
    fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.frames = self.frames.wrapping_add(1);

        self.driver.pump();
        self.driver.update(delta);
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();

            self.render_header(area, buf);
            self.render_grid(buf);
            self.render_footer(area, buf);

            if let Some(index) = self.selected {
                let overlay = overlay_rect(area);
                BriefingPanel::new(
                    &self.cards[index].module,
                    self.driver.phase(),
                    self.driver.visible_text(),
                    self.frames / 8,
                )
                .render(overlay, buf);
            }

            self.render_cursor(area, buf);
        })?;

        Ok(())
    }

    fn render_header(&self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        if area.height <= HEADER_HEIGHT {
            return;
        }

        buf.set_string(
            GRID_LEFT,
            1,
            "COMMAND DECK",
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        );

        let status = if self.backend_online { "ONLINE" } else { "LOCAL" };
        let status_style = if self.backend_online {
            Style::default().fg(theme::SUCCESS_GREEN)
        } else {
            Style::default().fg(theme::WARNING_YELLOW)
        };
        let right = format!("● {status}  {}", self.backend_name);
        let right_width = right.chars().count() as u16;
        if area.width > right_width + 2 {
            buf.set_string(
                area.width.saturating_sub(right_width + 2),
                1,
                &right,
                status_style,
            );
        }

        buf.set_string(
            GRID_LEFT,
            2,
            "Welcome back, Operative. Select a module to engage protocols.",
            Style::default().fg(theme::TEXT_DIM),
        );
    }

    fn render_grid(&self, buf: &mut ratatui::buffer::Buffer) {
        let area = buf.area;

        for header in &self.headers {
            if header.y >= area.height {
                continue;
            }
            let line = format!("── {} ", header.title);
            buf.set_string(
                GRID_LEFT,
                header.y,
                &line,
                Style::default()
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            );
            let used = GRID_LEFT + line.chars().count() as u16;
            if area.width > used + 2 {
                let rule = "─".repeat((area.width - used - 2) as usize);
                buf.set_string(used, header.y, &rule, Style::default().fg(theme::BORDER_DIM));
            }
        }

        for card in &self.cards {
            if card.rect.width > 0 {
                ModuleCard::new(&card.module, card.tilt.state()).render(card.rect, buf);
            }
        }
    }

    fn render_footer(&self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        if area.height < 2 {
            return;
        }
        let y = area.height - 1;

        let left = " SECURE CONNECTION ░ [Q] QUIT";
        buf.set_string(0, y, left, Style::default().fg(theme::PROMPT_GRAY));

        let right = format!("ID: {} // ENCRYPTED ", self.session_tag);
        let widths = (left.chars().count() + right.chars().count()) as u16;
        if area.width > widths {
            buf.set_string(
                area.width - right.chars().count() as u16,
                y,
                &right,
                Style::default().fg(theme::PROMPT_GRAY),
            );
        }
    }

    /// Custom cursor overlay: a reversed cell riding the pointer
    fn render_cursor(&self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        if !self.cursor.is_visible() {
            return;
        }
        let (x, y) = self.cursor.position();
        let cell = Rect::new(x as u16, y as u16, 1, 1).intersection(area);

        let mut style = Style::default().add_modifier(Modifier::REVERSED);
        if self.cursor.is_hovering() {
            style = style.add_modifier(Modifier::BOLD);
        }
        buf.set_style(cell, style);
    }

    /// Action reference dispatched by the last EXECUTE, for post-exit display
    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }
}

fn build_cards(catalog: &Catalog, config: &DeckConfig) -> (Vec<(String, Range<usize>)>, Vec<Card>) {
    let mut sections = Vec::new();
    let mut cards = Vec::new();

    for section in &catalog.sections {
        let start = cards.len();
        for module in &section.modules {
            cards.push(Card {
                module: module.clone(),
                tilt: TiltEngine::new().with_max_angle(config.max_tilt_deg),
                rect: Rect::default(),
            });
        }
        sections.push((section.title.clone(), start..cards.len()));
    }

    (sections, cards)
}

/// Centered overlay rect sized to the terminal
fn overlay_rect(area: Rect) -> Rect {
    let width = area.width.saturating_sub(8).clamp(20, 72);
    let height = area.height.saturating_sub(6).clamp(8, 18);
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name).map(PathBuf::from)
}
