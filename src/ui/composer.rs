//! Composer line and shortcut hints.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::theme::{COLOR_BORDER, COLOR_DIM, COLOR_MULTICAST_SOFT, COLOR_PRIMARY};
use crate::app::ChatApp;

/// Label next to the composer describing where a message goes.
pub fn composer_label(multicast_state: Option<bool>, unique_open: usize) -> String {
    match multicast_state {
        Some(true) => format!(" Send to all ({}) ", unique_open),
        Some(false) => " Send (Ctrl+G: all) ".to_string(),
        None => " Send ".to_string(),
    }
}

pub fn render_composer(frame: &mut Frame, area: Rect, app: &ChatApp) {
    if !app.is_composer_visible() {
        let hidden = Paragraph::new(Line::from(Span::styled(
            "Composer hidden while the beam is open",
            Style::default().fg(COLOR_DIM),
        )))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(COLOR_BORDER)));
        frame.render_widget(hidden, area);
        return;
    }

    let multicast_state = app.composer_multicast_state();
    let border = if multicast_state == Some(true) {
        COLOR_MULTICAST_SOFT
    } else {
        COLOR_PRIMARY
    };
    let label = composer_label(multicast_state, app.panes().unique_conversation_ids().len());

    let composer = Paragraph::new(Line::from(vec![
        Span::raw(app.composer_text.clone()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(label),
    );
    frame.render_widget(composer, area);
}

/// One line of enabled shortcuts.
pub fn render_hints(frame: &mut Frame, area: Rect, app: &ChatApp) {
    let ctx = app.shortcut_context();
    let mut spans = Vec::new();
    for (binding, enabled) in app.router().bindings(&ctx) {
        if !enabled {
            continue;
        }
        if !spans.is_empty() {
            spans.push(Span::styled(" · ", Style::default().fg(COLOR_DIM)));
        }
        spans.push(Span::styled(
            binding.action.label(),
            Style::default().fg(COLOR_DIM),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
