//! Root layout computation for sidebar + main content + status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the expanded sidebar (icon + label rows).
pub const SIDEBAR_EXPANDED_WIDTH: u16 = 22;
/// Width of the compact sidebar (icons only).
pub const SIDEBAR_COMPACT_WIDTH: u16 = 4;
/// Auto-compact the sidebar below this terminal width.
pub const AUTO_COMPACT_THRESHOLD: u16 = 64;
/// Hide the sidebar entirely below this terminal width.
pub const HIDE_SIDEBAR_THRESHOLD: u16 = 24;

/// Effective sidebar presentation for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarMode {
    Expanded,
    Compact,
    Hidden,
}

/// Computed regions for a single frame.
pub struct FrameRegions {
    /// Sidebar area (None when hidden).
    pub sidebar: Option<Rect>,
    /// Main content area.
    pub main: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl FrameRegions {
    /// Compute regions from the terminal area and the user's collapse
    /// preference. Narrow terminals override the preference downward.
    pub fn compute(area: Rect, user_collapsed: bool) -> (Self, SidebarMode) {
        let mode = if area.width < HIDE_SIDEBAR_THRESHOLD {
            SidebarMode::Hidden
        } else if user_collapsed || area.width < AUTO_COMPACT_THRESHOLD {
            SidebarMode::Compact
        } else {
            SidebarMode::Expanded
        };

        let rows = Layout::vertical([
            Constraint::Min(1),    // content (sidebar + main)
            Constraint::Length(1), // status bar
        ])
        .split(area);
        let content = rows[0];
        let status = rows[1];

        let sidebar_width = match mode {
            SidebarMode::Hidden => 0,
            SidebarMode::Compact => SIDEBAR_COMPACT_WIDTH,
            SidebarMode::Expanded => SIDEBAR_EXPANDED_WIDTH,
        };

        let (sidebar, main) = if sidebar_width == 0 {
            (None, content)
        } else {
            let cols = Layout::horizontal([
                Constraint::Length(sidebar_width),
                Constraint::Min(1),
            ])
            .split(content);
            (Some(cols[0]), cols[1])
        };

        (
            FrameRegions {
                sidebar,
                main,
                status,
            },
            mode,
        )
    }
}
