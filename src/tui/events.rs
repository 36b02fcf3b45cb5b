//! Events flowing through the Elm-architecture event loop.

/// Events consumed by the main loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs and async data polling.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A resolved action to execute.
    Action(Action),
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusRequests,
    FocusAssets,
    FocusLocations,
    TabNext,
    TabPrev,
    ToggleSidebar,

    // Modals
    ShowHelp,
    CloseHelp,

    // Data
    NewRequest,
    RefreshRequests,
    RefreshAssets,
    RefreshLocations,

    // Application
    Quit,
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Requests,
    Assets,
    Locations,
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::Requests, Focus::Assets, Focus::Locations];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Requests => "Requests",
            Focus::Assets => "Assets",
            Focus::Locations => "Locations",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Focus::Requests => "▣",
            Focus::Assets => "⚙",
            Focus::Locations => "⌂",
        }
    }

    pub fn to_action(self) -> Action {
        match self {
            Focus::Requests => Action::FocusRequests,
            Focus::Assets => Action::FocusAssets,
            Focus::Locations => Action::FocusLocations,
        }
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}

/// Whether sidebar or main content has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaFocus {
    Sidebar,
    Main,
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_next_cycles() {
        let mut f = Focus::Requests;
        for _ in 0..Focus::ALL.len() {
            f = f.next();
        }
        assert_eq!(f, Focus::Requests);
    }

    #[test]
    fn test_focus_prev_cycles() {
        let mut f = Focus::Requests;
        for _ in 0..Focus::ALL.len() {
            f = f.prev();
        }
        assert_eq!(f, Focus::Requests);
    }

    #[test]
    fn test_focus_labels_and_icons_nonempty() {
        for f in Focus::ALL {
            assert!(!f.label().is_empty());
            assert!(!f.icon().is_empty());
        }
    }

    #[test]
    fn test_focus_actions_unique() {
        let actions: Vec<Action> = Focus::ALL.iter().map(|f| f.to_action()).collect();
        for (i, a) in actions.iter().enumerate() {
            for (j, b) in actions.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }
}
