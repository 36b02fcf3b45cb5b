//! Asset browser view.
//!
//! Searchable flat list of assets. `/` enters search mode, `n` opens the
//! service-request wizard pre-seeded with the selected asset (asset-first
//! entry: the wizard resolves the owning location itself).

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;

use crate::api::models::AssetSummary;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

// ── Internal async data events ─────────────────────────────────────────────

enum AssetDataEvent {
    Loaded(Vec<AssetSummary>),
    LoadError(String),
}

/// Outcome of input handling surfaced to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetsResult {
    Consumed,
    /// Start the wizard seeded with this asset.
    NewRequestForAsset { id: String, name: String },
}

// ── State ──────────────────────────────────────────────────────────────────

pub struct AssetsViewState {
    assets: Vec<AssetSummary>,
    selected: usize,
    search: InputBuffer,
    searching: bool,
    error: Option<String>,
    loading: bool,

    data_tx: mpsc::UnboundedSender<AssetDataEvent>,
    data_rx: mpsc::UnboundedReceiver<AssetDataEvent>,
}

impl AssetsViewState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            assets: Vec::new(),
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
            match api.fetch_assets(None).await {
                Ok(assets) => {
                    let _ = tx.send(AssetDataEvent::Loaded(assets));
                }
                Err(e) => {
                    log::warn!("Asset list failed: {e}");
                    let _ = tx.send(AssetDataEvent::LoadError(format!("{e}")));
                }
            }
        });
    }

    pub fn poll(&mut self) {
        while let Ok(event) = self.data_rx.try_recv() {
            match event {
                AssetDataEvent::Loaded(assets) => {
                    self.assets = assets;
                    self.loading = false;
                    self.error = None;
                    self.clamp_selection();
                }
                AssetDataEvent::LoadError(message) => {
                    self.loading = false;
                    self.error = Some(message);
                }
            }
        }
    }

    /// Assets whose name or code contains the query, case-insensitive.
    fn visible(&self) -> Vec<&AssetSummary> {
        let query = self.search.text().to_lowercase();
        if query.is_empty() {
            return self.assets.iter().collect();
        }
        self.assets
            .iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&query)
                    || a.code
                        .as_deref()
                        .map(|c| c.to_lowercase().contains(&query))
                        .unwrap_or(false)
            })
            .collect()
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

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> Option<AssetsResult> {
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
            return Some(AssetsResult::Consumed);
        }

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('/')) => {
                self.searching = true;
                Some(AssetsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                let len = self.visible().len();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
                Some(AssetsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.selected = self.selected.saturating_sub(1);
                Some(AssetsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                Some(AssetsResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('n') | KeyCode::Enter) => {
                let visible = self.visible();
                visible.get(self.selected).map(|asset| {
                    AssetsResult::NewRequestForAsset {
                        id: asset.id.clone(),
                        name: asset.name.clone(),
                    }
                })
            }
            (KeyModifiers::NONE, KeyCode::Esc) if !self.search.text().is_empty() => {
                self.search.clear();
                self.selected = 0;
                Some(AssetsResult::Consumed)
            }
            _ => None,
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let visible = self.visible();
        let title = format!("Assets ({})", visible.len());
        let block = theme::block_default(&title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line<'static>> = Vec::new();

        // Search row
        let search_style = if self.searching {
            Style::default().fg(theme::TEXT)
        } else {
            theme::muted()
        };
        let search_display = if self.searching {
            format!("/{}▎", self.search.text())
        } else if self.search.text().is_empty() {
            "/ to search".to_string()
        } else {
            format!("/{}", self.search.text())
        };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(search_display, search_style),
        ]));
        lines.push(Line::raw(""));

        if self.loading && self.assets.is_empty() {
            lines.push(Line::from(Span::styled("  Loading…", theme::muted())));
        } else if visible.is_empty() {
            let message = if self.search.text().is_empty() {
                "  No assets available."
            } else {
                "  Nothing matches the search."
            };
            lines.push(Line::from(Span::styled(message.to_string(), theme::muted())));
        } else {
            for (i, asset) in visible.iter().enumerate() {
                let is_selected = i == self.selected;
                let cursor = if is_selected { "▸ " } else { "  " };
                let name_style = if is_selected {
                    Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let code = asset.code.as_deref().unwrap_or("-");

                lines.push(Line::from(vec![
                    Span::styled(
                        cursor.to_string(),
                        if is_selected {
                            Style::default().fg(theme::ACCENT)
                        } else {
                            Style::default()
                        },
                    ),
                    Span::styled(format!("{:<28}", truncate(&asset.name, 28)), name_style),
                    Span::styled(truncate(code, 16), theme::muted()),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("n/Enter", theme::key_hint()),
            Span::raw(":report issue "),
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

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        s.to_string()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, name: &str, code: Option<&str>) -> AssetSummary {
        AssetSummary {
            id: id.to_string(),
            name: name.to_string(),
            code: code.map(str::to_string),
            location_id: None,
        }
    }

    #[test]
    fn test_visible_filters_by_name_and_code() {
        let mut state = AssetsViewState::new();
        state.assets = vec![
            asset("1", "Chiller 3", Some("CH-003")),
            asset("2", "Main Pump", Some("PU-001")),
        ];
        state.search.set_text("pump");
        let visible = state.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "2");

        state.search.set_text("ch-0");
        let visible = state.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "1");
    }

    #[test]
    fn test_empty_query_shows_all() {
        let mut state = AssetsViewState::new();
        state.assets = vec![asset("1", "A", None), asset("2", "B", None)];
        assert_eq!(state.visible().len(), 2);
    }

    #[test]
    fn test_load_event_clears_error() {
        let mut state = AssetsViewState::new();
        state.error = Some("old".into());
        state
            .data_tx
            .send(AssetDataEvent::Loaded(vec![asset("1", "A", None)]))
            .unwrap();
        state.poll();
        assert!(state.error.is_none());
        assert_eq!(state.assets.len(), 1);
    }

    #[test]
    fn test_selection_clamps_to_filtered_len() {
        let mut state = AssetsViewState::new();
        state.assets = vec![
            asset("1", "Chiller", None),
            asset("2", "Pump", None),
            asset("3", "Fan", None),
        ];
        state.selected = 2;
        state.search.set_text("pump");
        state.clamp_selection();
        assert_eq!(state.selected, 0);
    }
}
