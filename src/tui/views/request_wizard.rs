//! Three-step service request creation wizard.
//!
//! Step 1 resolves a location (searchable flattened tree) and optionally an
//! asset within it; step 2 drills into the two-level issue taxonomy; step 3
//! collects description and photos, then submits once. All state lives in
//! one [`WizardDraft`] owned here; step renderers only read it.
//!
//! Async data arrives on an internal channel. Asset lists are cached keyed
//! by location id, so a response for a superseded location can never
//! overwrite the current one (last intent wins, not last response).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;

use crate::api::models::{Asset, AssetSummary, IssueCategory, LocationNode, ServiceRequest};
use crate::api::CafmClient;
use crate::core::categories::{CategoryIcon, Locale};
use crate::core::images::PendingImage;
use crate::core::locations::{filter_locations, flatten_locations, FlatLocation};
use crate::core::wizard::{
    AssetChoice, CategoryChoice, WizardDraft, WizardSeed, WizardStep, MAX_IMAGES,
};
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

// ── Internal async data events ─────────────────────────────────────────────

enum WizardDataEvent {
    LocationsLoaded(Vec<LocationNode>),
    LocationsFailed(String),
    SeedAssetResolved(Box<Asset>),
    SeedAssetFailed(String),
    AssetsLoaded {
        location_id: String,
        assets: Vec<AssetSummary>,
    },
    AssetsFailed {
        location_id: String,
        message: String,
    },
    CategoriesLoaded(Vec<IssueCategory>),
    CategoriesFailed(String),
    Submitted(Box<ServiceRequest>),
    SubmitFailed(String),
}

/// Outcome surfaced to the app.
#[derive(Debug)]
pub enum WizardResult {
    /// User left the flow; the draft has been discarded.
    Closed,
    /// Submission succeeded; navigate to the created request.
    Created(ServiceRequest),
}

/// Sub-phase of the location step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocationPhase {
    Search,
    AssetPick,
}

/// Focused field on the details step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailsField {
    Description,
    AttachPath,
    Images,
}

// ── State ──────────────────────────────────────────────────────────────────

pub struct RequestWizardState {
    draft: WizardDraft,
    api: CafmClient,
    locale: Locale,
    preview_dir: PathBuf,

    // Step 1: locations + assets
    flat: Vec<FlatLocation>,
    locations_loading: bool,
    locations_error: Option<String>,
    search: InputBuffer,
    location_cursor: usize,
    phase: LocationPhase,
    /// Asset id still being resolved from an asset-first entry.
    resolving_seed: Option<String>,
    seed_asset_name: Option<String>,
    /// Inline note after a resolution fallback (not an error state).
    seed_note: Option<String>,
    /// Asset lists keyed by the location id that requested them.
    assets_by_location: HashMap<String, Vec<AssetSummary>>,
    assets_loading_for: Option<String>,
    assets_error: Option<String>,
    asset_cursor: usize,

    // Step 2: categories
    categories: Vec<IssueCategory>,
    categories_loading: bool,
    categories_error: Option<String>,
    category_cursor: usize,
    /// Index into `categories` while the child list is open.
    open_parent: Option<usize>,

    // Step 3: details
    description: InputBuffer,
    attach_path: InputBuffer,
    details_focus: DetailsField,
    image_cursor: usize,
    attach_error: Option<String>,
    submit_error: Option<String>,
    submitting: bool,

    data_tx: mpsc::UnboundedSender<WizardDataEvent>,
    data_rx: mpsc::UnboundedReceiver<WizardDataEvent>,
}

impl RequestWizardState {
    /// Build the wizard from entry parameters. Seeds are read once here;
    /// `load` starts the async fetches.
    pub fn new(seed: WizardSeed, services: &Services) -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        let mut draft = WizardDraft::from_seed(&seed);

        // A location seed is authoritative; a named asset seed alongside it
        // can be applied immediately without resolution.
        let mut resolving_seed = None;
        if seed.location_id.is_some() {
            if let (Some(asset_id), Some(asset_name)) = (&seed.asset_id, &seed.asset_name) {
                draft.choose_asset(asset_id, asset_name);
            }
        } else if let Some(asset_id) = &seed.asset_id {
            resolving_seed = Some(asset_id.clone());
        }

        let mut description = InputBuffer::new();
        description.set_text(draft.description());

        Self {
            draft,
            api: services.api.clone(),
            locale: services.locale,
            preview_dir: services.preview_dir.clone(),
            flat: Vec::new(),
            locations_loading: false,
            locations_error: None,
            search: InputBuffer::new(),
            location_cursor: 0,
            phase: LocationPhase::Search,
            resolving_seed,
            seed_asset_name: seed.asset_name,
            seed_note: None,
            assets_by_location: HashMap::new(),
            assets_loading_for: None,
            assets_error: None,
            asset_cursor: 0,
            categories: Vec::new(),
            categories_loading: false,
            categories_error: None,
            category_cursor: 0,
            open_parent: None,
            description,
            attach_path: InputBuffer::new(),
            details_focus: DetailsField::Description,
            image_cursor: 0,
            attach_error: None,
            submit_error: None,
            submitting: false,
            data_tx,
            data_rx,
        }
    }

    /// Kick off the initial fetches: location tree, taxonomy, and the
    /// asset-location resolution for an asset-first entry.
    pub fn load(&mut self) {
        self.locations_loading = true;
        let api = self.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            match api.fetch_location_tree().await {
                Ok(roots) => {
                    let _ = tx.send(WizardDataEvent::LocationsLoaded(roots));
                }
                Err(e) => {
                    log::warn!("Location tree fetch failed: {e}");
                    let _ = tx.send(WizardDataEvent::LocationsFailed(format!("{e}")));
                }
            }
        });

        self.categories_loading = true;
        let api = self.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            match api.fetch_issue_categories().await {
                Ok(categories) => {
                    let _ = tx.send(WizardDataEvent::CategoriesLoaded(categories));
                }
                Err(e) => {
                    log::warn!("Category fetch failed: {e}");
                    let _ = tx.send(WizardDataEvent::CategoriesFailed(format!("{e}")));
                }
            }
        });

        if let Some(asset_id) = self.resolving_seed.clone() {
            let api = self.api.clone();
            let tx = self.data_tx.clone();
            tokio::spawn(async move {
                match api.fetch_asset(&asset_id).await {
                    Ok(asset) => {
                        let _ = tx.send(WizardDataEvent::SeedAssetResolved(Box::new(asset)));
                    }
                    Err(e) => {
                        log::warn!("Seed asset {asset_id} resolution failed: {e}");
                        let _ = tx.send(WizardDataEvent::SeedAssetFailed(format!("{e}")));
                    }
                }
            });
        }

        if self.draft.location_id().is_some() {
            self.ensure_assets_loaded();
        }
    }

    /// Fetch assets for the draft's current location unless already cached
    /// or in flight for that same key.
    fn ensure_assets_loaded(&mut self) {
        let Some(location_id) = self.draft.location_id().map(str::to_string) else {
            return;
        };
        if self.assets_by_location.contains_key(&location_id)
            || self.assets_loading_for.as_deref() == Some(&location_id)
        {
            return;
        }
        self.assets_loading_for = Some(location_id.clone());
        self.assets_error = None;
        let api = self.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            match api.fetch_assets(Some(&location_id)).await {
                Ok(assets) => {
                    let _ = tx.send(WizardDataEvent::AssetsLoaded {
                        location_id,
                        assets,
                    });
                }
                Err(e) => {
                    log::warn!("Asset fetch for {location_id} failed: {e}");
                    let _ = tx.send(WizardDataEvent::AssetsFailed {
                        location_id,
                        message: format!("{e}"),
                    });
                }
            }
        });
    }

    /// Cached assets for the draft's current location, if any.
    fn current_assets(&self) -> Option<&[AssetSummary]> {
        let location_id = self.draft.location_id()?;
        self.assets_by_location
            .get(location_id)
            .map(Vec::as_slice)
    }

    fn location_name(&self, id: &str) -> String {
        self.flat
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    // ── Polling ────────────────────────────────────────────────────────────

    /// Drain async data events. Returns `Created` once a submission lands.
    pub fn poll(&mut self) -> Option<WizardResult> {
        while let Ok(event) = self.data_rx.try_recv() {
            match event {
                WizardDataEvent::LocationsLoaded(roots) => {
                    self.flat = flatten_locations(&roots);
                    self.locations_loading = false;
                    self.locations_error = None;
                    self.clamp_location_cursor();
                }
                WizardDataEvent::LocationsFailed(message) => {
                    self.locations_loading = false;
                    self.locations_error = Some(message);
                }
                WizardDataEvent::SeedAssetResolved(asset) => {
                    self.resolving_seed = None;
                    match asset.location_id.as_deref() {
                        Some(location_id) => {
                            // Resolution complete: location and asset are
                            // known, skip straight to the category step.
                            self.draft.select_location(location_id);
                            self.draft.choose_asset(&asset.id, &asset.name);
                            if self.draft.step() == WizardStep::Location {
                                self.draft.advance();
                            }
                            self.ensure_assets_loaded();
                        }
                        None => {
                            // A real state, not a failure: the asset has no
                            // location and the user must pick one manually.
                            self.seed_note = Some(format!(
                                "{} has no location on record; choose one manually",
                                asset.name
                            ));
                        }
                    }
                }
                WizardDataEvent::SeedAssetFailed(message) => {
                    self.resolving_seed = None;
                    let name = self
                        .seed_asset_name
                        .clone()
                        .unwrap_or_else(|| "the asset".to_string());
                    self.seed_note = Some(format!(
                        "Could not resolve the location of {name}; choose one manually"
                    ));
                    log::debug!("Seed resolution fallback: {message}");
                }
                WizardDataEvent::AssetsLoaded {
                    location_id,
                    assets,
                } => {
                    // Keyed insert: a stale location's response lands under
                    // its own key and never touches the current view.
                    if self.assets_loading_for.as_deref() == Some(&location_id) {
                        self.assets_loading_for = None;
                    }
                    self.assets_by_location.insert(location_id, assets);
                    self.clamp_asset_cursor();
                }
                WizardDataEvent::AssetsFailed {
                    location_id,
                    message,
                } => {
                    if self.assets_loading_for.as_deref() == Some(&location_id) {
                        self.assets_loading_for = None;
                    }
                    if self.draft.location_id() == Some(location_id.as_str()) {
                        self.assets_error = Some(message);
                    }
                }
                WizardDataEvent::CategoriesLoaded(categories) => {
                    self.categories = categories;
                    self.categories_loading = false;
                    self.categories_error = None;
                    self.category_cursor = 0;
                    self.open_parent = None;
                }
                WizardDataEvent::CategoriesFailed(message) => {
                    self.categories_loading = false;
                    self.categories_error = Some(message);
                }
                WizardDataEvent::Submitted(request) => {
                    self.submitting = false;
                    // Success: the draft is done for; previews go with it.
                    self.draft.discard();
                    return Some(WizardResult::Created(*request));
                }
                WizardDataEvent::SubmitFailed(message) => {
                    // Draft stays exactly as it was; user retries manually.
                    self.submitting = false;
                    self.submit_error = Some(message);
                }
            }
        }
        None
    }

    fn clamp_location_cursor(&mut self) {
        let len = filter_locations(&self.flat, self.search.text()).len();
        self.location_cursor = if len == 0 {
            0
        } else {
            self.location_cursor.min(len - 1)
        };
    }

    fn clamp_asset_cursor(&mut self) {
        // Row 0 is the explicit "no asset" entry.
        let len = self.current_assets().map(|a| a.len()).unwrap_or(0) + 1;
        self.asset_cursor = self.asset_cursor.min(len - 1);
    }

    // ── Input handling ─────────────────────────────────────────────────────

    /// The wizard consumes all input while open. `Some` means the flow
    /// ended (closed or created).
    pub fn handle_input(&mut self, event: &Event) -> Option<WizardResult> {
        let Event::Key(key) = event else {
            return None;
        };
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let key = *key;

        // While a seeded asset is being resolved the wizard is held on
        // step 1: no advancing, only bailing out.
        if self.resolving_seed.is_some() {
            if key.code == KeyCode::Esc {
                return Some(self.close());
            }
            return None;
        }

        match self.draft.step() {
            WizardStep::Location => self.handle_location_input(key),
            WizardStep::Category => self.handle_category_input(key),
            WizardStep::Details => self.handle_details_input(key),
        }
    }

    fn close(&mut self) -> WizardResult {
        self.draft.discard();
        WizardResult::Closed
    }

    fn handle_location_input(&mut self, key: KeyEvent) -> Option<WizardResult> {
        match self.phase {
            LocationPhase::Search => self.handle_location_search(key),
            LocationPhase::AssetPick => self.handle_asset_pick(key),
        }
    }

    fn handle_location_search(&mut self, key: KeyEvent) -> Option<WizardResult> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => return Some(self.close()),
            (KeyModifiers::NONE, KeyCode::Down) => {
                let len = filter_locations(&self.flat, self.search.text()).len();
                if len > 0 {
                    self.location_cursor = (self.location_cursor + 1).min(len - 1);
                }
            }
            (KeyModifiers::NONE, KeyCode::Up) => {
                self.location_cursor = self.location_cursor.saturating_sub(1);
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                let selected_id = filter_locations(&self.flat, self.search.text())
                    .get(self.location_cursor)
                    .map(|l| l.id.clone());
                if let Some(id) = selected_id {
                    self.draft.select_location(&id);
                    self.asset_cursor = 0;
                    self.phase = LocationPhase::AssetPick;
                    self.ensure_assets_loaded();
                }
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => {
                self.search.backspace();
                self.location_cursor = 0;
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.search.insert_char(c);
                self.location_cursor = 0;
            }
            _ => {}
        }
        None
    }

    fn handle_asset_pick(&mut self, key: KeyEvent) -> Option<WizardResult> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                // Back to location search; a half-made asset choice does
                // not survive leaving the picker.
                self.phase = LocationPhase::Search;
                self.draft.reset_asset();
            }
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                let len = self.current_assets().map(|a| a.len()).unwrap_or(0) + 1;
                self.asset_cursor = (self.asset_cursor + 1).min(len - 1);
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.asset_cursor = self.asset_cursor.saturating_sub(1);
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                if let Some(id) = self.draft.location_id().map(str::to_string) {
                    self.assets_by_location.remove(&id);
                }
                self.ensure_assets_loaded();
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                if self.asset_cursor == 0 {
                    self.draft.choose_no_asset();
                } else if let Some(assets) = self.current_assets() {
                    if let Some(asset) = assets.get(self.asset_cursor - 1) {
                        let (id, name) = (asset.id.clone(), asset.name.clone());
                        self.draft.choose_asset(&id, &name);
                    }
                }
                self.draft.advance();
            }
            _ => {}
        }
        None
    }

    fn handle_category_input(&mut self, key: KeyEvent) -> Option<WizardResult> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => match self.open_parent {
                Some(_) => {
                    // Leaving the child list resets the whole step.
                    self.open_parent = None;
                    self.category_cursor = 0;
                    self.draft.reset_category();
                }
                None => {
                    self.draft.retreat();
                    self.phase = if self.draft.location_id().is_some() {
                        LocationPhase::AssetPick
                    } else {
                        LocationPhase::Search
                    };
                }
            },
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                let len = self.category_list_len();
                if len > 0 {
                    self.category_cursor = (self.category_cursor + 1).min(len - 1);
                }
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.category_cursor = self.category_cursor.saturating_sub(1);
            }
            (KeyModifiers::NONE, KeyCode::Enter) => match self.open_parent {
                None => {
                    let Some(parent) = self.categories.get(self.category_cursor) else {
                        return None;
                    };
                    if parent.is_terminal() {
                        // No children: the parent is the category. Straight
                        // to details, no empty child screen.
                        let choice = CategoryChoice {
                            id: parent.id.clone(),
                            label: parent.label(self.locale).to_string(),
                        };
                        self.draft.choose_terminal_parent(choice);
                        self.draft.advance();
                    } else {
                        self.open_parent = Some(self.category_cursor);
                        self.category_cursor = 0;
                    }
                }
                Some(parent_idx) => {
                    let Some(parent) = self.categories.get(parent_idx) else {
                        return None;
                    };
                    if let Some(child) = parent.children.get(self.category_cursor) {
                        let parent_choice = CategoryChoice {
                            id: parent.id.clone(),
                            label: parent.label(self.locale).to_string(),
                        };
                        let child_choice = CategoryChoice {
                            id: child.id.clone(),
                            label: child.label(self.locale).to_string(),
                        };
                        self.draft.choose_child_category(parent_choice, child_choice);
                        self.draft.advance();
                    }
                }
            },
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.reload_categories();
            }
            _ => {}
        }
        None
    }

    fn category_list_len(&self) -> usize {
        match self.open_parent {
            None => self.categories.len(),
            Some(idx) => self
                .categories
                .get(idx)
                .map(|c| c.children.len())
                .unwrap_or(0),
        }
    }

    fn reload_categories(&mut self) {
        self.categories_loading = true;
        let api = self.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            match api.fetch_issue_categories().await {
                Ok(categories) => {
                    let _ = tx.send(WizardDataEvent::CategoriesLoaded(categories));
                }
                Err(e) => {
                    let _ = tx.send(WizardDataEvent::CategoriesFailed(format!("{e}")));
                }
            }
        });
    }

    fn handle_details_input(&mut self, key: KeyEvent) -> Option<WizardResult> {
        // Ctrl+Enter submits from any field.
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Enter {
            self.trigger_submit();
            return None;
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                if self.submit_error.is_some() {
                    // First Esc dismisses the inline error.
                    self.submit_error = None;
                } else {
                    self.draft.retreat();
                    self.open_parent = None;
                    self.category_cursor = 0;
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                self.details_focus = self.next_details_field(self.details_focus);
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                // Cycling three fields twice lands on the previous one.
                self.details_focus = self.next_details_field(self.next_details_field(self.details_focus));
            }
            _ => match self.details_focus {
                DetailsField::Description => {
                    match key.code {
                        KeyCode::Enter => self.details_focus = DetailsField::AttachPath,
                        KeyCode::Backspace => {
                            self.description.backspace();
                            self.draft.set_description(self.description.text().to_string());
                        }
                        KeyCode::Left => self.description.move_left(),
                        KeyCode::Right => self.description.move_right(),
                        KeyCode::Home => self.description.move_home(),
                        KeyCode::End => self.description.move_end(),
                        KeyCode::Char(c)
                            if !key.modifiers.intersects(KeyModifiers::CONTROL) =>
                        {
                            self.description.insert_char(c);
                            self.draft.set_description(self.description.text().to_string());
                        }
                        _ => {}
                    }
                }
                DetailsField::AttachPath => match key.code {
                    KeyCode::Enter => self.attach_from_path(),
                    KeyCode::Backspace => self.attach_path.backspace(),
                    KeyCode::Left => self.attach_path.move_left(),
                    KeyCode::Right => self.attach_path.move_right(),
                    KeyCode::Char(c)
                        if !key.modifiers.intersects(KeyModifiers::CONTROL) =>
                    {
                        self.attach_path.insert_char(c)
                    }
                    _ => {}
                },
                DetailsField::Images => match key.code {
                    KeyCode::Char('j') | KeyCode::Down => {
                        let len = self.draft.images().len();
                        if len > 0 {
                            self.image_cursor = (self.image_cursor + 1).min(len - 1);
                        }
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        self.image_cursor = self.image_cursor.saturating_sub(1);
                    }
                    KeyCode::Char('x') | KeyCode::Delete => {
                        self.draft.remove_image(self.image_cursor);
                        let len = self.draft.images().len();
                        if len == 0 {
                            self.image_cursor = 0;
                            self.details_focus = DetailsField::Description;
                        } else {
                            self.image_cursor = self.image_cursor.min(len - 1);
                        }
                    }
                    _ => {}
                },
            },
        }
        None
    }

    fn next_details_field(&self, current: DetailsField) -> DetailsField {
        let has_images = !self.draft.images().is_empty();
        match current {
            DetailsField::Description => DetailsField::AttachPath,
            DetailsField::AttachPath if has_images => DetailsField::Images,
            DetailsField::AttachPath => DetailsField::Description,
            DetailsField::Images => DetailsField::Description,
        }
    }

    fn attach_from_path(&mut self) {
        let path_text = self.attach_path.text().trim().to_string();
        if path_text.is_empty() {
            return;
        }
        if self.draft.images().len() >= MAX_IMAGES {
            // The cap drops excess silently by contract; a full list just
            // stops accepting input here.
            self.attach_path.clear();
            return;
        }
        match PendingImage::attach(Path::new(&path_text), &self.preview_dir) {
            Ok(image) => {
                self.draft.attach_image(image);
                self.attach_path.clear();
                self.attach_error = None;
            }
            Err(e) => {
                self.attach_error = Some(format!("{path_text}: {e}"));
            }
        }
    }

    /// Gate a submission attempt. Returns the payload only when the draft
    /// is complete and nothing is in flight, and flips the in-flight flag
    /// in the same call, so a second trigger is a no-op.
    fn begin_submit(&mut self) -> Option<crate::api::models::NewServiceRequest> {
        if self.submitting {
            return None;
        }
        let submission = self.draft.build_submission()?;
        self.submitting = true;
        self.submit_error = None;
        Some(submission)
    }

    fn trigger_submit(&mut self) {
        let Some(submission) = self.begin_submit() else {
            return;
        };
        let api = self.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            match api.submit_service_request(&submission).await {
                Ok(created) => {
                    log::info!("Service request created: {}", created.id);
                    let _ = tx.send(WizardDataEvent::Submitted(Box::new(created)));
                }
                Err(e) => {
                    log::warn!("Submission failed: {e}");
                    let _ = tx.send(WizardDataEvent::SubmitFailed(format!("{e}")));
                }
            }
        });
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let step = self.draft.step();
        let title = format!(
            "New Service Request · {}/3 {}",
            step.position(),
            step.title()
        );
        let block = theme::block_focused(&title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(2), // context line
            Constraint::Min(3),    // step body
            Constraint::Length(1), // hints
        ])
        .split(inner);

        self.render_context(frame, chunks[0]);
        match step {
            WizardStep::Location => self.render_location_step(frame, chunks[1]),
            WizardStep::Category => self.render_category_step(frame, chunks[1]),
            WizardStep::Details => self.render_details_step(frame, chunks[1]),
        }
        self.render_hints(frame, chunks[2]);
    }

    /// One line summarizing what has been resolved so far.
    fn render_context(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw("  ")];
        match self.draft.location_id() {
            Some(id) => {
                spans.push(Span::styled("⌂ ", theme::muted()));
                spans.push(Span::styled(self.location_name(id), theme::highlight()));
            }
            None => spans.push(Span::styled("⌂ (no location)", theme::dim())),
        }
        match self.draft.asset() {
            AssetChoice::Selected { name, .. } => {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(format!("⚙ {name}"), theme::muted()));
            }
            AssetChoice::None => {
                spans.push(Span::raw("  "));
                spans.push(Span::styled("⚙ no asset", theme::dim()));
            }
            AssetChoice::Undecided => {}
        }
        if let Some(breadcrumb) = self.draft.category_breadcrumb() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(format!("▸ {breadcrumb}"), theme::muted()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_location_step(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line<'static>> = Vec::new();

        if let Some(asset_id) = &self.resolving_seed {
            let name = self
                .seed_asset_name
                .clone()
                .unwrap_or_else(|| asset_id.clone());
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("◌ ", Style::default().fg(theme::INFO)),
                Span::styled(format!("Resolving location of {name}…"), theme::muted()),
            ]));
            frame.render_widget(Paragraph::new(lines), area);
            return;
        }

        if let Some(ref note) = self.seed_note {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("ℹ {note}"), Style::default().fg(theme::INFO)),
            ]));
        }

        match self.phase {
            LocationPhase::Search => {
                lines.push(Line::from(vec![
                    Span::raw("  Search: "),
                    Span::styled(
                        format!("{}▎", self.search.text()),
                        Style::default().fg(theme::TEXT),
                    ),
                ]));
                lines.push(Line::raw(""));

                if self.locations_loading && self.flat.is_empty() {
                    lines.push(Line::from(Span::styled("  Loading locations…", theme::muted())));
                } else if let Some(ref err) = self.locations_error {
                    lines.push(Line::from(Span::styled(
                        format!("  ✗ {err}"),
                        Style::default().fg(theme::ERROR),
                    )));
                } else {
                    let visible = filter_locations(&self.flat, self.search.text());
                    if visible.is_empty() {
                        lines.push(Line::from(Span::styled(
                            "  Nothing matches the search.",
                            theme::muted(),
                        )));
                    }
                    let max_rows = area.height.saturating_sub(3) as usize;
                    let offset = scroll_offset(self.location_cursor, visible.len(), max_rows);
                    for (i, location) in visible.iter().enumerate().skip(offset).take(max_rows) {
                        let is_selected = i == self.location_cursor;
                        let cursor = if is_selected { "▸ " } else { "  " };
                        lines.push(Line::from(vec![
                            Span::styled(
                                cursor.to_string(),
                                if is_selected {
                                    Style::default().fg(theme::ACCENT)
                                } else {
                                    Style::default()
                                },
                            ),
                            Span::raw("  ".repeat(location.depth)),
                            Span::styled(
                                location.name.clone(),
                                if is_selected {
                                    Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
                                } else {
                                    Style::default()
                                },
                            ),
                            Span::raw("  "),
                            Span::styled(location.kind.label().to_string(), theme::dim()),
                        ]));
                    }
                }
            }
            LocationPhase::AssetPick => {
                lines.push(Line::from(Span::styled(
                    "  Narrow down to an asset (optional):",
                    theme::muted(),
                )));
                lines.push(Line::raw(""));

                let loading = self
                    .assets_loading_for
                    .as_deref()
                    .is_some_and(|id| self.draft.location_id() == Some(id));

                let assets = self.current_assets();
                match (assets, loading) {
                    (None, true) => {
                        lines.push(Line::from(Span::styled("  Loading assets…", theme::muted())));
                    }
                    _ => {
                        let assets = assets.unwrap_or(&[]);
                        let no_asset_selected = self.asset_cursor == 0;
                        lines.push(Line::from(vec![
                            Span::styled(
                                if no_asset_selected { "▸ " } else { "  " }.to_string(),
                                Style::default().fg(theme::ACCENT),
                            ),
                            Span::styled(
                                "No asset (issue concerns the location itself)",
                                if no_asset_selected {
                                    Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
                                } else {
                                    theme::muted()
                                },
                            ),
                        ]));
                        if assets.is_empty() {
                            lines.push(Line::from(Span::styled(
                                "  (no assets registered at this location)",
                                theme::dim(),
                            )));
                        }
                        for (i, asset) in assets.iter().enumerate() {
                            let is_selected = self.asset_cursor == i + 1;
                            lines.push(Line::from(vec![
                                Span::styled(
                                    if is_selected { "▸ " } else { "  " }.to_string(),
                                    Style::default().fg(theme::ACCENT),
                                ),
                                Span::styled(
                                    asset.name.clone(),
                                    if is_selected {
                                        Style::default()
                                            .fg(theme::TEXT)
                                            .add_modifier(Modifier::BOLD)
                                    } else {
                                        Style::default()
                                    },
                                ),
                                Span::raw("  "),
                                Span::styled(
                                    asset.code.clone().unwrap_or_default(),
                                    theme::dim(),
                                ),
                            ]));
                        }
                        if let Some(ref err) = self.assets_error {
                            lines.push(Line::from(Span::styled(
                                format!("  ✗ {err}"),
                                Style::default().fg(theme::ERROR),
                            )));
                        }
                    }
                }
            }
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_category_step(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line<'static>> = vec![Line::raw("")];

        if self.categories_loading && self.categories.is_empty() {
            lines.push(Line::from(Span::styled("  Loading categories…", theme::muted())));
        } else if let Some(ref err) = self.categories_error {
            lines.push(Line::from(Span::styled(
                format!("  ✗ {err}"),
                Style::default().fg(theme::ERROR),
            )));
        } else {
            let list: Vec<&IssueCategory> = match self.open_parent {
                None => self.categories.iter().collect(),
                Some(idx) => self
                    .categories
                    .get(idx)
                    .map(|p| p.children.iter().collect())
                    .unwrap_or_default(),
            };

            if let Some(idx) = self.open_parent {
                if let Some(parent) = self.categories.get(idx) {
                    lines.insert(
                        0,
                        Line::from(vec![
                            Span::raw("  "),
                            Span::styled(
                                format!("{} ▸", parent.label(self.locale)),
                                theme::heading(),
                            ),
                        ]),
                    );
                }
            }

            if list.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  No categories available.",
                    theme::muted(),
                )));
            }
            for (i, category) in list.iter().enumerate() {
                let is_selected = i == self.category_cursor;
                let icon = CategoryIcon::from_tag(category.icon.as_deref());
                let suffix = if !category.is_terminal() && self.open_parent.is_none() {
                    format!("  ({} subcategories)", category.children.len())
                } else {
                    String::new()
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        if is_selected { "▸ " } else { "  " }.to_string(),
                        Style::default().fg(theme::ACCENT),
                    ),
                    Span::styled(format!("{} ", icon.glyph()), theme::muted()),
                    Span::styled(
                        category.label(self.locale).to_string(),
                        if is_selected {
                            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        },
                    ),
                    Span::styled(suffix, theme::dim()),
                ]));
            }
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_details_step(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line<'static>> = vec![Line::raw("")];

        let focus_marker = |focused: bool| if focused { "▸" } else { " " };

        let description_focused = self.details_focus == DetailsField::Description;
        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", focus_marker(description_focused))),
            Span::styled(
                "Description: ",
                if description_focused {
                    theme::highlight()
                } else {
                    theme::muted()
                },
            ),
            Span::styled(
                if description_focused {
                    format!("{}▎", self.description.text())
                } else if self.description.text().is_empty() {
                    "(optional)".to_string()
                } else {
                    self.description.text().to_string()
                },
                Style::default().fg(theme::TEXT),
            ),
        ]));
        lines.push(Line::raw(""));

        let attach_focused = self.details_focus == DetailsField::AttachPath;
        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", focus_marker(attach_focused))),
            Span::styled(
                "Attach photo: ",
                if attach_focused {
                    theme::highlight()
                } else {
                    theme::muted()
                },
            ),
            Span::styled(
                if attach_focused {
                    format!("{}▎", self.attach_path.text())
                } else {
                    "(path to image file, Enter to add)".to_string()
                },
                Style::default().fg(theme::TEXT),
            ),
        ]));
        if let Some(ref err) = self.attach_error {
            lines.push(Line::from(Span::styled(
                format!("    ✗ {err}"),
                Style::default().fg(theme::ERROR),
            )));
        }
        lines.push(Line::raw(""));

        let images_focused = self.details_focus == DetailsField::Images;
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("Photos {}/{MAX_IMAGES}", self.draft.images().len()),
                theme::heading(),
            ),
        ]));
        for (i, image) in self.draft.images().iter().enumerate() {
            let is_selected = images_focused && i == self.image_cursor;
            lines.push(Line::from(vec![
                Span::styled(
                    if is_selected { "  ▸ " } else { "    " }.to_string(),
                    Style::default().fg(theme::ACCENT),
                ),
                Span::styled(
                    image.file_name().to_string(),
                    if is_selected {
                        Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
            ]));
        }
        lines.push(Line::raw(""));

        if self.submitting {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("◌ Submitting…", Style::default().fg(theme::INFO)),
            ]));
        } else if let Some(ref err) = self.submit_error {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("✗ Submission failed: {err} (Esc to dismiss)"),
                    Style::default().fg(theme::ERROR),
                ),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let hints: Vec<(&str, &str)> = if self.resolving_seed.is_some() {
            vec![("Esc", "cancel")]
        } else {
            match self.draft.step() {
                WizardStep::Location => match self.phase {
                    LocationPhase::Search => vec![
                        ("type", "search"),
                        ("↑/↓", "move"),
                        ("Enter", "select"),
                        ("Esc", "cancel"),
                    ],
                    LocationPhase::AssetPick => vec![
                        ("j/k", "move"),
                        ("Enter", "choose"),
                        ("r", "reload"),
                        ("Esc", "back"),
                    ],
                },
                WizardStep::Category => vec![
                    ("j/k", "move"),
                    ("Enter", "select"),
                    ("Esc", "back"),
                ],
                WizardStep::Details => vec![
                    ("Tab", "field"),
                    ("Ctrl+Enter", "submit"),
                    ("x", "remove photo"),
                    ("Esc", "back"),
                ],
            }
        };

        let mut spans = vec![Span::raw(" ")];
        for (key, action) in hints {
            spans.push(Span::styled(key.to_string(), theme::key_hint()));
            spans.push(Span::raw(format!(":{action} ")));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    // ── Test access ────────────────────────────────────────────────────────

    #[cfg(test)]
    fn draft_mut(&mut self) -> &mut WizardDraft {
        &mut self.draft
    }

    #[cfg(test)]
    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }
}

/// First visible row so the cursor stays in the viewport.
fn scroll_offset(cursor: usize, len: usize, viewport: usize) -> usize {
    if viewport == 0 || len <= viewport {
        0
    } else if cursor >= viewport {
        (cursor + 1 - viewport).min(len - viewport)
    } else {
        0
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
