//! UI rendering for the pane strip.
//!
//! ```text
//! ┌ #1 Title ──────┐┌ #2 Other ─────┐
//! │ you: ...        ││ ai: ...        │
//! └─────────────────┘└────────────────┘
//! notice
//! ┌ Send ─────────────────────────────┐
//! │ composer text_                    │
//! └───────────────────────────────────┘
//! Retry · Beam · Open · ...
//! ```

mod composer;
mod helpers;
mod overlay;
mod pane_strip;
mod theme;

pub use composer::composer_label;
pub use helpers::{centered_rect, pane_at, pane_columns, truncate_string};
pub use pane_strip::pane_border_color;
pub use theme::{COLOR_BORDER, COLOR_MULTICAST_SOFT, COLOR_PRIMARY};

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::ChatApp;

/// Screen regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub panes: Rect,
    pub notice: Rect,
    pub composer: Rect,
    pub hints: Rect,
}

pub fn screen_areas(area: Rect) -> ScreenAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);
    ScreenAreas {
        panes: chunks[0],
        notice: chunks[1],
        composer: chunks[2],
        hints: chunks[3],
    }
}

/// Render the whole chat screen.
pub fn render(frame: &mut Frame, app: &ChatApp) {
    let areas = screen_areas(frame.area());
    pane_strip::render_pane_strip(frame, areas.panes, app);
    overlay::render_notice(frame, areas.notice, app);
    composer::render_composer(frame, areas.composer, app);
    composer::render_hints(frame, areas.hints, app);
    overlay::render_overlay(frame, areas.panes, app);
}
