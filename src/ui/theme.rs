//! Color theme constants for the pane strip.

use ratatui::style::Color;

// ============================================================================
// Panes
// ============================================================================

/// Border of the focused pane
pub const COLOR_PRIMARY: Color = Color::Rgb(0, 122, 204); // blue #007ACC

/// Border of unfocused panes that will receive a multicast
pub const COLOR_MULTICAST_SOFT: Color = Color::Rgb(90, 130, 170);

/// Border of other unfocused panes
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Dim text for less important info
pub const COLOR_DIM: Color = Color::DarkGray;

/// Role labels
pub const COLOR_USER: Color = Color::LightCyan;
pub const COLOR_ASSISTANT: Color = Color::White;
pub const COLOR_SYSTEM: Color = Color::Gray;

// ============================================================================
// Notices and dialogs
// ============================================================================

pub const COLOR_ISSUE: Color = Color::Red;
pub const COLOR_SUCCESS: Color = Color::Rgb(4, 181, 117); // green #04B575
pub const COLOR_TITLE: Color = Color::White;

/// Background for dialog boxes
pub const COLOR_DIALOG_BG: Color = Color::Rgb(10, 15, 35);
