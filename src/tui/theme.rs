//! Centralized Steel & Amber color theme for the CAFM Desk TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Steel blue, primary accent: active items, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x33, 0x66, 0x99);
/// Light steel, highlights and secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x5C, 0x8A, 0xBD);
/// Dark steel, subtle backgrounds.
pub const PRIMARY_DARK: Color = Color::Rgb(0x1F, 0x3D, 0x5C);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Amber, calls to action and important items.
pub const ACCENT: Color = Color::Rgb(0xFF, 0xB3, 0x00);
/// Soft amber, secondary emphasis.
pub const ACCENT_SOFT: Color = Color::Rgb(0xFF, 0xC6, 0x4D);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Near-black base background.
pub const BG_BASE: Color = Color::Rgb(0x10, 0x14, 0x18);
/// Elevated panels, sidebar.
pub const BG_SURFACE: Color = Color::Rgb(0x18, 0x20, 0x28);

// ── Text ────────────────────────────────────────────────────────────────────

/// Primary text.
pub const TEXT: Color = Color::Rgb(0xE6, 0xE6, 0xE6);
/// Muted text: secondary labels, borders.
pub const TEXT_MUTED: Color = Color::Rgb(0x8A, 0x8A, 0x8A);
/// Dim text: disabled items, faint hints.
pub const TEXT_DIM: Color = Color::Rgb(0x55, 0x55, 0x55);

// ── Semantic ────────────────────────────────────────────────────────────────

/// Destructive actions, failures.
pub const ERROR: Color = Color::Rgb(0xE5, 0x53, 0x4B);
/// Confirmations, healthy status.
pub const SUCCESS: Color = Color::Rgb(0x5F, 0xB0, 0x6A);
/// Alerts, degraded status.
pub const WARNING: Color = Color::Rgb(0xF5, 0xA6, 0x23);
/// Informational highlights.
pub const INFO: Color = Color::Rgb(0x4F, 0xA3, 0xE3);

// ── Style helpers ───────────────────────────────────────────────────────────

/// Accent-colored bold text (titles, active items).
pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Focused border style.
pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

/// Unfocused border style.
pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Muted label text.
pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Dim text for disabled/faint items.
pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Color for a service request status tag. Unknown statuses stay neutral.
pub fn status_color(status: &str) -> Color {
    match status.to_ascii_uppercase().as_str() {
        "OPEN" | "NEW" => INFO,
        "IN_PROGRESS" | "ASSIGNED" => WARNING,
        "COMPLETED" | "CLOSED" | "RESOLVED" => SUCCESS,
        "CANCELLED" | "REJECTED" => ERROR,
        _ => TEXT_MUTED,
    }
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block with focused styling.
pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

/// A bordered block with default (unfocused) styling.
pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_color_known_tags() {
        assert_eq!(status_color("open"), INFO);
        assert_eq!(status_color("IN_PROGRESS"), WARNING);
        assert_eq!(status_color("Closed"), SUCCESS);
        assert_eq!(status_color("cancelled"), ERROR);
    }

    #[test]
    fn test_status_color_unknown_is_neutral() {
        assert_eq!(status_color("whatever"), TEXT_MUTED);
    }

    #[test]
    fn test_style_helpers_return_non_default() {
        assert_ne!(title(), Style::default());
        assert_ne!(heading(), Style::default());
        assert_ne!(highlight(), Style::default());
        assert_ne!(muted(), Style::default());
    }
}
