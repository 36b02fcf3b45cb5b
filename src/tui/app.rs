use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::api::models::ServiceRequest;
use crate::core::wizard::WizardSeed;

use super::events::{Action, AppEvent, AreaFocus, Focus, Notification, NotificationLevel};
use super::layout::FrameRegions;
use super::services::Services;
use super::sidebar::SidebarState;
use super::theme;
use super::views::assets::{AssetsResult, AssetsViewState};
use super::views::locations::{LocationsResult, LocationsViewState};
use super::views::request_wizard::{RequestWizardState, WizardResult};
use super::views::requests::{RequestsResult, RequestsViewState};

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Currently focused top-level view.
    pub focus: Focus,
    /// Whether sidebar or main content has input focus.
    pub area_focus: AreaFocus,
    /// Sidebar navigation state.
    pub sidebar: SidebarState,
    /// Service request list view state.
    pub requests: RequestsViewState,
    /// Asset browser view state.
    pub assets: AssetsViewState,
    /// Location browser view state.
    pub locations: LocationsViewState,
    /// Creation wizard (Some while the flow is open). The wizard owns its
    /// draft; dropping it discards the draft and its image previews.
    pub wizard: Option<RequestWizardState>,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender for pushing events from within the app.
    #[allow(dead_code)]
    event_tx: mpsc::UnboundedSender<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        services: Services,
    ) -> Self {
        Self {
            running: true,
            focus: Focus::Requests,
            area_focus: AreaFocus::Main,
            sidebar: SidebarState::new(),
            requests: RequestsViewState::new(),
            assets: AssetsViewState::new(),
            locations: LocationsViewState::new(),
            wizard: None,
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            event_rx,
            event_tx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render, select, update, loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        // Initial data for the landing view.
        self.requests.load(&self.services);

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: the wizard consumes all input while open
                if self.wizard.is_some() {
                    let result = match self.wizard.as_mut() {
                        Some(wizard) => wizard.handle_input(&crossterm_event),
                        None => None,
                    };
                    match result {
                        Some(WizardResult::Closed) => {
                            self.wizard = None;
                        }
                        Some(WizardResult::Created(request)) => {
                            self.finish_wizard(request);
                        }
                        None => {}
                    }
                    return;
                }

                // Priority 3: sidebar input (when focused)
                if self.area_focus == AreaFocus::Sidebar
                    && self.handle_sidebar_input(&crossterm_event)
                {
                    return;
                }

                // Priority 4: focused view
                if self.dispatch_view_input(&crossterm_event) {
                    return;
                }

                // Priority 5: global keybindings
                if let Some(action) = self.map_input_to_action(crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    /// Dispatch input to the currently focused view. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        match self.focus {
            Focus::Requests => match self.requests.handle_input(event, &self.services) {
                Some(RequestsResult::Consumed) => true,
                Some(RequestsResult::NewRequest) => {
                    self.open_wizard(WizardSeed::default());
                    true
                }
                None => false,
            },
            Focus::Assets => match self.assets.handle_input(event, &self.services) {
                Some(AssetsResult::Consumed) => true,
                Some(AssetsResult::NewRequestForAsset { id, name }) => {
                    self.open_wizard(WizardSeed {
                        asset_id: Some(id),
                        asset_name: Some(name),
                        ..WizardSeed::default()
                    });
                    true
                }
                None => false,
            },
            Focus::Locations => match self.locations.handle_input(event, &self.services) {
                Some(LocationsResult::Consumed) => true,
                Some(LocationsResult::NewRequestAt { location_id }) => {
                    self.open_wizard(WizardSeed {
                        location_id: Some(location_id),
                        ..WizardSeed::default()
                    });
                    true
                }
                None => false,
            },
        }
    }

    /// Handle sidebar-specific input. Returns true if consumed.
    fn handle_sidebar_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j')) | (KeyModifiers::NONE, KeyCode::Down) => {
                self.sidebar.select_next();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k')) | (KeyModifiers::NONE, KeyCode::Up) => {
                self.sidebar.select_prev();
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
                let focus = self.sidebar.selected_focus();
                self.handle_action(focus.to_action());
                self.area_focus = AreaFocus::Main;
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('h')) => {
                self.sidebar.user_collapsed = true;
                self.area_focus = AreaFocus::Main;
                true
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.area_focus = AreaFocus::Main;
                true
            }
            _ => false,
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (modifiers, code) {
            // Ctrl+B toggles the sidebar
            (KeyModifiers::CONTROL, KeyCode::Char('b')) => Some(Action::ToggleSidebar),
            // Ctrl+N starts a blank service request from anywhere
            (KeyModifiers::CONTROL, KeyCode::Char('n')) => Some(Action::NewRequest),
            // Ctrl+C quits
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Tab => Some(Action::TabNext),
                KeyCode::BackTab => Some(Action::TabPrev),
                KeyCode::Char('1') => Some(Action::FocusRequests),
                KeyCode::Char('2') => Some(Action::FocusAssets),
                KeyCode::Char('3') => Some(Action::FocusLocations),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusRequests => {
                self.set_focus(Focus::Requests);
                self.requests.load(&self.services);
            }
            Action::FocusAssets => {
                self.set_focus(Focus::Assets);
                self.assets.load(&self.services);
            }
            Action::FocusLocations => {
                self.set_focus(Focus::Locations);
                self.locations.load(&self.services);
            }
            Action::TabNext => {
                self.focus = self.focus.next();
                self.sidebar.sync_to_focus(self.focus);
                self.on_focus_changed();
            }
            Action::TabPrev => {
                self.focus = self.focus.prev();
                self.sidebar.sync_to_focus(self.focus);
                self.on_focus_changed();
            }
            Action::ToggleSidebar => {
                self.sidebar.toggle_collapse();
                if !self.sidebar.user_collapsed {
                    self.area_focus = AreaFocus::Sidebar;
                    self.sidebar.sync_to_focus(self.focus);
                }
            }
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::NewRequest => self.open_wizard(WizardSeed::default()),
            Action::RefreshRequests => self.requests.load(&self.services),
            Action::RefreshAssets => self.assets.load(&self.services),
            Action::RefreshLocations => self.locations.load(&self.services),
        }
    }

    /// Set focus and sync sidebar selection.
    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.sidebar.sync_to_focus(focus);
        self.area_focus = AreaFocus::Main;
    }

    fn on_focus_changed(&mut self) {
        match self.focus {
            Focus::Requests => self.requests.load(&self.services),
            Focus::Assets => self.assets.load(&self.services),
            Focus::Locations => self.locations.load(&self.services),
        }
    }

    // ── Wizard lifecycle ────────────────────────────────────────────────

    fn open_wizard(&mut self, seed: WizardSeed) {
        let mut wizard = RequestWizardState::new(seed, &self.services);
        wizard.load();
        self.wizard = Some(wizard);
    }

    /// Successful submission: close the flow and land on the new request.
    fn finish_wizard(&mut self, request: ServiceRequest) {
        self.wizard = None;
        let label = request.code.clone().unwrap_or_else(|| request.id.clone());
        self.push_notification(
            format!("Service request {label} created"),
            NotificationLevel::Success,
        );
        self.set_focus(Focus::Requests);
        self.requests.focus_request(&request.id);
        self.requests.load(&self.services);
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: 100,
        });

        while self.notifications.len() > 3 {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired, poll async data.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        self.requests.poll();
        self.assets.poll();
        self.locations.poll();

        let wizard_result = self.wizard.as_mut().and_then(|w| w.poll());
        if let Some(WizardResult::Created(request)) = wizard_result {
            self.finish_wizard(request);
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let (regions, mode) = FrameRegions::compute(area, self.sidebar.user_collapsed);

        if let Some(sidebar_area) = regions.sidebar {
            self.sidebar
                .render(frame, sidebar_area, mode, self.focus, self.area_focus);
        }

        // The wizard replaces the main content while open.
        match self.wizard {
            Some(ref wizard) => wizard.render(frame, regions.main),
            None => self.render_content(frame, regions.main),
        }

        self.render_status_bar(frame, regions.status);
        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_content(&self, frame: &mut Frame, area: Rect) {
        match self.focus {
            Focus::Requests => self.requests.render(frame, area),
            Focus::Assets => self.assets.render(frame, area),
            Focus::Locations => self.locations.render(frame, area),
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let context = if self.wizard.is_some() {
            Span::styled(
                "New Request",
                Style::default()
                    .fg(theme::ACCENT_SOFT)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                self.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            )
        };

        let status = Line::from(vec![
            Span::styled(" CAFM DESK ", theme::brand_badge()),
            Span::raw(" "),
            context,
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":nav "),
            Span::styled("Ctrl+N", theme::key_hint()),
            Span::raw(":new request "),
            Span::styled("Ctrl+B", theme::key_hint()),
            Span::raw(":sidebar "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let notification_area = Rect::new(x, 1, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw(&n.message),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 75, area);

        let keybindings = vec![
            ("Global:", ""),
            ("q / Ctrl+C", "Quit"),
            ("?", "Toggle this help"),
            ("Tab / Shift+Tab", "Next / previous view"),
            ("1-3", "Jump to view by number"),
            ("Ctrl+N", "New service request"),
            ("Ctrl+B", "Toggle sidebar"),
            ("", ""),
            ("Lists:", ""),
            ("j/k", "Move selection"),
            ("/", "Search (assets, locations)"),
            ("r", "Refresh data"),
            ("Enter", "Open / select"),
            ("n", "New request for selection"),
            ("", ""),
            ("New request wizard:", ""),
            ("type", "Search locations (step 1)"),
            ("Enter", "Select item / advance"),
            ("Esc", "Back one step / cancel"),
            ("Tab", "Next field (step 3)"),
            ("Ctrl+Enter", "Submit (step 3)"),
            ("x", "Remove selected photo"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Keybindings", theme::title())),
            Line::raw(""),
        ];

        for (key, desc) in &keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {key}"),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{:<18}", key),
                        Style::default().fg(theme::PRIMARY_LIGHT).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("?", Style::default().fg(theme::PRIMARY_LIGHT).add_modifier(Modifier::BOLD)),
            Span::raw(" or "),
            Span::styled("Esc", Style::default().fg(theme::PRIMARY_LIGHT).add_modifier(Modifier::BOLD)),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
