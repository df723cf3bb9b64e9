//! The row of conversation panes.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::helpers::{pane_columns, truncate_string};
use super::theme::{
    COLOR_ASSISTANT, COLOR_BORDER, COLOR_DIM, COLOR_MULTICAST_SOFT, COLOR_PRIMARY, COLOR_SYSTEM,
    COLOR_USER,
};
use crate::app::ChatApp;
use crate::models::{Conversation, MessageRole};

/// Border color of a pane.
///
/// The focused pane uses the primary colour. Other panes get a soft tint
/// when the composer reaches them too: while multicasting, or when every
/// pane shows the same conversation.
pub fn pane_border_color(
    is_focused: bool,
    will_multicast: bool,
    is_multi_conversation: bool,
) -> ratatui::style::Color {
    if is_focused {
        COLOR_PRIMARY
    } else if will_multicast || !is_multi_conversation {
        COLOR_MULTICAST_SOFT
    } else {
        COLOR_BORDER
    }
}

pub fn render_pane_strip(frame: &mut Frame, area: Rect, app: &ChatApp) {
    let layout = app.layout();
    let will_multicast = app.will_multicast();
    let is_multi_conversation = layout.is_multi_conversation;
    let columns = pane_columns(area, layout.panes.len());

    for (idx, (pane, rect)) in layout.panes.iter().zip(columns).enumerate() {
        let is_focused = layout.is_focused(idx);
        let conversation = pane
            .conversation_id
            .as_ref()
            .and_then(|id| app.store().conversation(id));

        let title = match &conversation {
            Some(c) => {
                let n = app.store().position(&c.id).map(|p| p + 1).unwrap_or(0);
                format!(" #{} {} ", n, c.display_title())
            }
            None => " (no conversation) ".to_string(),
        };
        let title_style = if is_focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_DIM)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(pane_border_color(
                is_focused,
                will_multicast,
                is_multi_conversation,
            )))
            .title(Span::styled(
                truncate_string(&title, rect.width.saturating_sub(2) as usize),
                title_style,
            ));

        let inner_height = rect.height.saturating_sub(2);
        let mut lines = match &conversation {
            Some(c) => conversation_lines(c),
            None => Vec::new(),
        };
        if app.pane_beam_open(idx) {
            lines.push(Line::from(Span::styled(
                "beam open",
                Style::default().fg(COLOR_PRIMARY).add_modifier(Modifier::ITALIC),
            )));
        }

        // keep the tail visible
        let scroll = (lines.len() as u16).saturating_sub(inner_height);
        let body = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(body, rect);
    }
}

fn conversation_lines(conversation: &Conversation) -> Vec<Line<'static>> {
    if conversation.is_empty() {
        return vec![Line::from(Span::styled(
            "empty conversation",
            Style::default().fg(COLOR_DIM),
        ))];
    }
    conversation
        .messages
        .iter()
        .map(|message| {
            let (label, color) = match message.role {
                MessageRole::User => ("you", COLOR_USER),
                MessageRole::Assistant => ("ai", COLOR_ASSISTANT),
                MessageRole::System => ("sys", COLOR_SYSTEM),
            };
            Line::from(vec![
                Span::styled(
                    format!("{}: ", label),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(message.text_content()),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_colors() {
        assert_eq!(pane_border_color(true, true, true), COLOR_PRIMARY);
        assert_eq!(pane_border_color(true, false, false), COLOR_PRIMARY);
        assert_eq!(pane_border_color(false, true, true), COLOR_MULTICAST_SOFT);
        assert_eq!(pane_border_color(false, false, true), COLOR_BORDER);
        // Same conversation everywhere: the other panes mirror the focused one
        assert_eq!(pane_border_color(false, false, false), COLOR_MULTICAST_SOFT);
    }
}
