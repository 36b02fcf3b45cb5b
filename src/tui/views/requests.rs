//! Service request list view.
//!
//! Master-detail layout: list on the left, detail panel on the right.
//! `n` opens the creation wizard, `r` refreshes, `Enter` toggles detail.

use chrono::{DateTime, Utc};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;

use crate::api::models::ServiceRequest;
use crate::tui::services::Services;
use crate::tui::theme;

// ── Internal async data events ─────────────────────────────────────────────

enum RequestDataEvent {
    Loaded(Vec<ServiceRequest>),
    LoadError(String),
}

/// Outcome of input handling surfaced to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestsResult {
    Consumed,
    /// User asked to start a new service request.
    NewRequest,
}

// ── State ──────────────────────────────────────────────────────────────────

pub struct RequestsViewState {
    requests: Vec<ServiceRequest>,
    selected: usize,
    show_detail: bool,
    error: Option<String>,
    loading: bool,
    /// Request id to highlight once the next load lands (set after a
    /// wizard submission).
    pending_focus: Option<String>,

    data_tx: mpsc::UnboundedSender<RequestDataEvent>,
    data_rx: mpsc::UnboundedReceiver<RequestDataEvent>,
}

impl RequestsViewState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            requests: Vec::new(),
            selected: 0,
            show_detail: false,
            error: None,
            loading: false,
            pending_focus: None,
            data_tx,
            data_rx,
        }
    }

    pub fn load(&mut self, services: &Services) {
        self.loading = true;
        let api = services.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            match api.list_service_requests().await {
                Ok(requests) => {
                    let _ = tx.send(RequestDataEvent::Loaded(requests));
                }
                Err(e) => {
                    log::warn!("Service request list failed: {e}");
                    let _ = tx.send(RequestDataEvent::LoadError(format!("{e}")));
                }
            }
        });
    }

    /// Highlight `id` when the next load completes.
    pub fn focus_request(&mut self, id: &str) {
        self.pending_focus = Some(id.to_string());
    }

    pub fn poll(&mut self) {
        while let Ok(event) = self.data_rx.try_recv() {
            match event {
                RequestDataEvent::Loaded(requests) => {
                    self.requests = requests;
                    self.loading = false;
                    self.error = None;
                    if let Some(id) = self.pending_focus.take() {
                        if let Some(idx) = self.requests.iter().position(|r| r.id == id) {
                            self.selected = idx;
                            self.show_detail = true;
                        }
                    }
                    self.clamp_selection();
                }
                RequestDataEvent::LoadError(message) => {
                    self.loading = false;
                    self.error = Some(message);
                }
            }
        }
    }

    fn clamp_selection(&mut self) {
        if self.requests.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.requests.len() - 1);
        }
    }

    // ── Input handling ─────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> Option<RequestsResult> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                if !self.requests.is_empty() {
                    self.selected = (self.selected + 1).min(self.requests.len() - 1);
                }
                Some(RequestsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.selected = self.selected.saturating_sub(1);
                Some(RequestsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                self.show_detail = !self.show_detail;
                Some(RequestsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                Some(RequestsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('n')) => Some(RequestsResult::NewRequest),
            _ => None,
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.show_detail && !self.requests.is_empty() {
            let chunks =
                Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                    .split(area);
            self.render_list(frame, chunks[0]);
            self.render_detail(frame, chunks[1]);
        } else {
            self.render_list(frame, area);
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let title = format!("Service Requests ({})", self.requests.len());
        let block = theme::block_default(&title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line<'static>> = vec![Line::raw("")];

        if self.loading && self.requests.is_empty() {
            lines.push(Line::from(Span::styled("  Loading…", theme::muted())));
        } else if self.requests.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("No service requests yet. Press ", theme::muted()),
                Span::styled("n", theme::highlight()),
                Span::styled(" to create one.", theme::muted()),
            ]));
        } else {
            for (i, request) in self.requests.iter().enumerate() {
                let is_selected = i == self.selected;
                let cursor = if is_selected { "▸ " } else { "  " };
                let name_style = if is_selected {
                    Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                let code = request.code.as_deref().unwrap_or(&request.id);
                let status = request.status.as_deref().unwrap_or("-");
                let summary = request
                    .description
                    .as_deref()
                    .unwrap_or("(no description)");

                lines.push(Line::from(vec![
                    Span::styled(
                        cursor.to_string(),
                        if is_selected {
                            Style::default().fg(theme::ACCENT)
                        } else {
                            Style::default()
                        },
                    ),
                    Span::styled(format!("{:<10}", truncate(code, 10)), name_style),
                    Span::styled(
                        format!("{:<12}", truncate(status, 12)),
                        Style::default().fg(theme::status_color(status)),
                    ),
                    Span::styled(truncate(summary, 32), theme::muted()),
                    Span::raw("  "),
                    Span::styled(
                        request.created_at.map(relative_age).unwrap_or_default(),
                        theme::dim(),
                    ),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("n", theme::key_hint()),
            Span::raw(":new "),
            Span::styled("r", theme::key_hint()),
            Span::raw(":refresh "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":detail "),
            Span::styled("j/k", theme::key_hint()),
            Span::raw(":move"),
        ]));

        if let Some(ref err) = self.error {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("✗ {err}"), Style::default().fg(theme::ERROR)),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let request = match self.requests.get(self.selected) {
            Some(r) => r,
            None => return,
        };

        let title = request.code.as_deref().unwrap_or(&request.id);
        let block = theme::block_focused(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line<'static>> = vec![Line::raw("")];

        if let Some(ref status) = request.status {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("Status: ", theme::muted()),
                Span::styled(
                    status.clone(),
                    Style::default().fg(theme::status_color(status)),
                ),
            ]));
        }
        for (label, value) in [
            ("Location: ", &request.location_name),
            ("Asset: ", &request.asset_name),
            ("Category: ", &request.category_name),
        ] {
            if let Some(value) = value {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(label.to_string(), theme::muted()),
                    Span::raw(truncate(value, 40)),
                ]));
            }
        }
        if let Some(created) = request.created_at {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("Opened: ", theme::muted()),
                Span::styled(
                    format!(
                        "{} ({})",
                        created.format("%Y-%m-%d %H:%M"),
                        relative_age(created)
                    ),
                    theme::dim(),
                ),
            ]));
        }
        if let Some(ref description) = request.description {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled("  DESCRIPTION", theme::heading())));
            for line in description.lines().take(12) {
                lines.push(Line::from(vec![Span::raw("  "), Span::raw(line.to_string())]));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

// ── Free helpers ───────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        s.to_string()
    }
}

/// Coarse relative age for list rows, computed from the server timestamp.
fn relative_age(created: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(created);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 60 * 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(id: &str) -> ServiceRequest {
        ServiceRequest {
            id: id.to_string(),
            code: None,
            status: None,
            description: None,
            location_name: None,
            asset_name: None,
            category_name: None,
            created_at: None,
        }
    }

    #[test]
    fn test_new_view_is_empty() {
        let state = RequestsViewState::new();
        assert!(state.requests.is_empty());
        assert_eq!(state.selected, 0);
        assert!(!state.show_detail);
    }

    #[test]
    fn test_pending_focus_applied_on_load() {
        let mut state = RequestsViewState::new();
        state.focus_request("sr-2");
        state
            .data_tx
            .send(RequestDataEvent::Loaded(vec![
                request("sr-1"),
                request("sr-2"),
                request("sr-3"),
            ]))
            .unwrap();
        state.poll();
        assert_eq!(state.selected, 1);
        assert!(state.show_detail);
        assert!(state.pending_focus.is_none());
    }

    #[test]
    fn test_pending_focus_missing_id_is_harmless() {
        let mut state = RequestsViewState::new();
        state.focus_request("sr-404");
        state
            .data_tx
            .send(RequestDataEvent::Loaded(vec![request("sr-1")]))
            .unwrap();
        state.poll();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_load_error_surfaces_inline() {
        let mut state = RequestsViewState::new();
        state
            .data_tx
            .send(RequestDataEvent::LoadError("boom".into()))
            .unwrap();
        state.poll();
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_selection_clamped_after_shrink() {
        let mut state = RequestsViewState::new();
        state.requests = vec![request("a"), request("b"), request("c")];
        state.selected = 2;
        state
            .data_tx
            .send(RequestDataEvent::Loaded(vec![request("a")]))
            .unwrap();
        state.poll();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_relative_age_buckets() {
        let now = Utc::now();
        assert_eq!(relative_age(now), "just now");
        assert_eq!(relative_age(now - Duration::minutes(5)), "5m ago");
        assert_eq!(relative_age(now - Duration::hours(3)), "3h ago");
        assert_eq!(relative_age(now - Duration::days(2)), "2d ago");
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        assert_eq!(truncate("مضخة المياه الرئيسية", 8), "مضخة ال…");
        assert_eq!(truncate("pump", 10), "pump");
    }
}
