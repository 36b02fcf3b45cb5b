//! Location hierarchy browser.
//!
//! Renders the flattened tree with depth indentation; `/` searches by
//! name, `n` opens the wizard pre-seeded with the selected location
//! (the wizard then starts on the category step).

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;

use crate::api::models::LocationNode;
use crate::core::locations::{filter_locations, flatten_locations, FlatLocation};
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

// ── Internal async data events ─────────────────────────────────────────────

enum LocationDataEvent {
    Loaded(Vec<LocationNode>),
    LoadError(String),
}

/// Outcome of input handling surfaced to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationsResult {
    Consumed,
    /// Start the wizard with this location already resolved.
    NewRequestAt { location_id: String },
}

// ── State ──────────────────────────────────────────────────────────────────

pub struct LocationsViewState {
    /// Flat projection of the last fetched tree, recomputed on every load.
    flat: Vec<FlatLocation>,
    selected: usize,
    search: InputBuffer,
    searching: bool,
    error: Option<String>,
    loading: bool,

    data_tx: mpsc::UnboundedSender<LocationDataEvent>,
    data_rx: mpsc::UnboundedReceiver<LocationDataEvent>,
}

impl LocationsViewState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            flat: Vec::new(),
            selected: 0,
            search: InputBuffer::new(),
            searching: false,
            error: None,
            loading: false,
            data_tx,
            data_rx,
        }
    }

    pub fn load(&mut self, services: &Services) {
        self.loading = true;
        let api = services.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            match api.fetch_location_tree().await {
                Ok(roots) => {
                    let _ = tx.send(LocationDataEvent::Loaded(roots));
                }
                Err(e) => {
                    log::warn!("Location tree fetch failed: {e}");
                    let _ = tx.send(LocationDataEvent::LoadError(format!("{e}")));
                }
            }
        });
    }

    pub fn poll(&mut self) {
        while let Ok(event) = self.data_rx.try_recv() {
            match event {
                LocationDataEvent::Loaded(roots) => {
                    self.flat = flatten_locations(&roots);
                    self.loading = false;
                    self.error = None;
                    self.clamp_selection();
                }
                LocationDataEvent::LoadError(message) => {
                    self.loading = false;
                    self.error = Some(message);
                }
            }
        }
    }

    fn visible(&self) -> Vec<&FlatLocation> {
        filter_locations(&self.flat, self.search.text())
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(len - 1);
        }
    }

    // ── Input handling ─────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> Option<LocationsResult> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        if self.searching {
            match (*modifiers, *code) {
                (_, KeyCode::Esc) => {
                    self.searching = false;
                    self.search.clear();
                    self.selected = 0;
                }
                (_, KeyCode::Enter) => self.searching = false,
                (_, KeyCode::Backspace) => {
                    self.search.backspace();
                    self.selected = 0;
                }
                (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                    self.search.insert_char(c);
                    self.selected = 0;
                }
                _ => {}
            }
            return Some(LocationsResult::Consumed);
        }

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('/')) => {
                self.searching = true;
                Some(LocationsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                let len = self.visible().len();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
                Some(LocationsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.selected = self.selected.saturating_sub(1);
                Some(LocationsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                Some(LocationsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('n') | KeyCode::Enter) => {
                let visible = self.visible();
                visible.get(self.selected).map(|location| {
                    LocationsResult::NewRequestAt {
                        location_id: location.id.clone(),
                    }
                })
            }
            (KeyModifiers::NONE, KeyCode::Esc) if !self.search.text().is_empty() => {
                self.search.clear();
                self.selected = 0;
                Some(LocationsResult::Consumed)
            }
            _ => None,
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let visible = self.visible();
        let title = format!("Locations ({})", visible.len());
        let block = theme::block_default(&title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line<'static>> = Vec::new();

        let search_display = if self.searching {
            format!("/{}▎", self.search.text())
        } else if self.search.text().is_empty() {
            "/ to search".to_string()
        } else {
            format!("/{}", self.search.text())
        };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                search_display,
                if self.searching {
                    Style::default().fg(theme::TEXT)
                } else {
                    theme::muted()
                },
            ),
        ]));
        lines.push(Line::raw(""));

        if self.loading && self.flat.is_empty() {
            lines.push(Line::from(Span::styled("  Loading…", theme::muted())));
        } else if visible.is_empty() {
            let message = if self.search.text().is_empty() {
                "  No locations available."
            } else {
                "  Nothing matches the search."
            };
            lines.push(Line::from(Span::styled(message.to_string(), theme::muted())));
        } else {
            for (i, location) in visible.iter().enumerate() {
                let is_selected = i == self.selected;
                let cursor = if is_selected { "▸ " } else { "  " };
                let indent = "  ".repeat(location.depth);
                let name_style = if is_selected {
                    Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                lines.push(Line::from(vec![
                    Span::styled(
                        cursor.to_string(),
                        if is_selected {
                            Style::default().fg(theme::ACCENT)
                        } else {
                            Style::default()
                        },
                    ),
                    Span::raw(indent),
                    Span::styled(location.name.clone(), name_style),
                    Span::raw("  "),
                    Span::styled(location.kind.label().to_string(), theme::dim()),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("n/Enter", theme::key_hint()),
            Span::raw(":report issue here "),
            Span::styled("/", theme::key_hint()),
            Span::raw(":search "),
            Span::styled("r", theme::key_hint()),
            Span::raw(":refresh"),
        ]));

        if let Some(ref err) = self.error {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("✗ {err}"), Style::default().fg(theme::ERROR)),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
