//! Small layout and text helpers.

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to `max_width` display columns, adding "..." if truncated.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let target = max_width.saturating_sub(3);
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(1);
        if width + w > target {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Equal-width columns for `count` panes.
pub fn pane_columns(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 || area.width == 0 {
        return Vec::new();
    }
    let count = count as u16;
    let base = area.width / count;
    let extra = area.width % count;
    let mut x = area.x;
    (0..count)
        .map(|i| {
            // leftmost columns absorb the remainder
            let width = base + u16::from(i < extra);
            let rect = Rect::new(x, area.y, width, area.height);
            x += width;
            rect
        })
        .collect()
}

/// Index of the pane column containing `(column, row)`.
pub fn pane_at(area: Rect, count: usize, column: u16, row: u16) -> Option<usize> {
    pane_columns(area, count).iter().position(|rect| {
        column >= rect.x
            && column < rect.x + rect.width
            && row >= rect.y
            && row < rect.y + rect.height
    })
}

/// A rectangle centred in `area`, clamped to it.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
