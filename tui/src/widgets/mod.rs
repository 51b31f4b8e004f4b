//! Deck Widgets
//!
//! Card and overlay widgets. Widgets are render-only: they take core
//! state by reference and draw it, carrying no interaction logic.

mod briefing_panel;
mod module_card;

pub use briefing_panel::BriefingPanel;
pub use module_card::ModuleCard;
