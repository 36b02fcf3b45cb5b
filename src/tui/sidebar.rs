//! Collapsible left sidebar listing the top-level views.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::events::{AreaFocus, Focus};
use super::layout::SidebarMode;
use super::theme;

/// Sidebar navigation state.
pub struct SidebarState {
    /// Whether the user has toggled collapse (Ctrl+B).
    pub user_collapsed: bool,
    /// Currently highlighted item index (into Focus::ALL).
    pub selected: usize,
}

impl SidebarState {
    pub fn new() -> Self {
        Self {
            user_collapsed: false,
            selected: 0,
        }
    }

    pub fn toggle_collapse(&mut self) {
        self.user_collapsed = !self.user_collapsed;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Focus::ALL.len();
    }

    pub fn select_prev(&mut self) {
        if self.selected == 0 {
            self.selected = Focus::ALL.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn selected_focus(&self) -> Focus {
        Focus::ALL[self.selected]
    }

    /// Sync selection to the active focus (after Tab navigation).
    pub fn sync_to_focus(&mut self, focus: Focus) {
        if let Some(idx) = Focus::ALL.iter().position(|&f| f == focus) {
            self.selected = idx;
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        mode: SidebarMode,
        current_focus: Focus,
        area_focus: AreaFocus,
    ) {
        match mode {
            SidebarMode::Hidden => {}
            SidebarMode::Compact => self.render_compact(frame, area, current_focus),
            SidebarMode::Expanded => self.render_expanded(frame, area, current_focus, area_focus),
        }
    }

    fn render_compact(&self, frame: &mut Frame, area: Rect, current_focus: Focus) {
        let mut lines = vec![Line::raw("")];
        for focus in Focus::ALL {
            let style = if focus == current_focus {
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::TEXT_MUTED)
            };
            lines.push(Line::from(Span::styled(format!(" {} ", focus.icon()), style)));
        }
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }

    fn render_expanded(
        &self,
        frame: &mut Frame,
        area: Rect,
        current_focus: Focus,
        area_focus: AreaFocus,
    ) {
        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" CAFM DESK", theme::heading())),
            Line::raw(""),
        ];

        for (i, focus) in Focus::ALL.iter().enumerate() {
            let is_current = *focus == current_focus;
            let is_highlighted = area_focus == AreaFocus::Sidebar && i == self.selected;

            let marker = if is_highlighted { "▸" } else { " " };
            let style = if is_current {
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
            } else if is_highlighted {
                Style::default().fg(theme::PRIMARY_LIGHT)
            } else {
                Style::default().fg(theme::TEXT_MUTED)
            };

            lines.push(Line::from(Span::styled(
                format!("{marker} {} {}", focus.icon(), focus.label()),
                style,
            )));
        }

        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        let mut sidebar = SidebarState::new();
        for _ in 0..Focus::ALL.len() {
            sidebar.select_next();
        }
        assert_eq!(sidebar.selected, 0);
        sidebar.select_prev();
        assert_eq!(sidebar.selected, Focus::ALL.len() - 1);
    }

    #[test]
    fn test_sync_to_focus() {
        let mut sidebar = SidebarState::new();
        sidebar.sync_to_focus(Focus::Locations);
        assert_eq!(sidebar.selected_focus(), Focus::Locations);
    }

    #[test]
    fn test_toggle_collapse() {
        let mut sidebar = SidebarState::new();
        assert!(!sidebar.user_collapsed);
        sidebar.toggle_collapse();
        assert!(sidebar.user_collapsed);
    }
}
