//! Notices, confirmations and modal surfaces drawn over the panes.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::helpers::centered_rect;
use super::theme::{COLOR_DIALOG_BG, COLOR_DIM, COLOR_ISSUE, COLOR_PRIMARY, COLOR_SUCCESS, COLOR_TITLE};
use crate::app::{ChatApp, Modal, TradeConfig};
use crate::notifications::NoticeKind;

pub fn render_notice(frame: &mut Frame, area: Rect, app: &ChatApp) {
    let Some(notice) = app.notices.latest() else {
        return;
    };
    let color = match notice.kind {
        NoticeKind::Issue => COLOR_ISSUE,
        NoticeKind::Success => COLOR_SUCCESS,
        NoticeKind::Title => COLOR_TITLE,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(notice.message.clone(), Style::default().fg(color))),
        area,
    );
}

/// The pending confirmation, else the open modal.
pub fn render_overlay(frame: &mut Frame, area: Rect, app: &ChatApp) {
    if let Some(request) = app.lifecycle().pending_confirmation() {
        let prompt = request.prompt();
        let lines = vec![
            Line::from(prompt.text),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("[Enter] {}", prompt.positive_label),
                    Style::default().fg(COLOR_ISSUE).add_modifier(Modifier::BOLD),
                ),
                Span::styled("   [Esc] Cancel", Style::default().fg(COLOR_DIM)),
            ]),
        ];
        render_dialog(frame, area, " Confirm ", lines);
        return;
    }

    if let Some(modal) = &app.modal {
        render_dialog(frame, area, modal.title(), modal_body(modal));
    }
}

fn modal_body(modal: &Modal) -> Vec<Line<'static>> {
    let body = match modal {
        Modal::ModelsSetup => "No chat model is configured. Set PANECHAT_CHAT_LLM.".to_string(),
        Modal::Preferences(tab) => format!("Preferences: {:?}", tab),
        Modal::LlmOptions(llm) => format!("Options for {}", llm),
        Modal::Diagram(config) => format!("Diagram from: {}", config.text),
        Modal::Flatten(id) => format!("Flatten conversation {}", id),
        Modal::Trade(TradeConfig::Import) => "Import conversations from a file".to_string(),
        Modal::Trade(TradeConfig::Export {
            export_all: true, ..
        }) => "Export all conversations".to_string(),
        Modal::Trade(TradeConfig::Export {
            conversation_id, ..
        }) => match conversation_id {
            Some(id) => format!("Export conversation {}", id),
            None => "Export conversation".to_string(),
        },
    };
    vec![
        Line::from(body),
        Line::from(""),
        Line::from(Span::styled("[Esc] Close", Style::default().fg(COLOR_DIM))),
    ]
}

fn render_dialog(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let rect = centered_rect(area, 60, 8);
    frame.render_widget(Clear, rect);
    let dialog = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(COLOR_DIALOG_BG))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(COLOR_PRIMARY))
                .title(title.to_string()),
        );
    frame.render_widget(dialog, rect);
}
