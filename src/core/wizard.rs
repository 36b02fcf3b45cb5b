//! Draft state for the service-request creation wizard.
//!
//! One draft lives for one creation flow. The wizard view owns it
//! exclusively and mutates it only through the transition methods here;
//! step renderers get read access. The draft is never persisted: leaving
//! the flow discards it.

use crate::api::models::{ImagePayload, NewServiceRequest};
use crate::core::images::PendingImage;

/// Attachment cap. Adds beyond this are dropped silently.
pub const MAX_IMAGES: usize = 5;

/// The three wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Location,
    Category,
    Details,
}

impl WizardStep {
    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Location => "Location & Asset",
            WizardStep::Category => "Issue Category",
            WizardStep::Details => "Details & Submit",
        }
    }

    /// 1-based position for the "step x/3" header.
    pub fn position(self) -> usize {
        match self {
            WizardStep::Location => 1,
            WizardStep::Category => 2,
            WizardStep::Details => 3,
        }
    }
}

/// Asset selection is tri-state: not yet decided, explicitly "no asset",
/// or a concrete asset. The explicit none is a completed choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetChoice {
    Undecided,
    None,
    Selected { id: String, name: String },
}

impl AssetChoice {
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            AssetChoice::Selected { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// A resolved taxonomy pick carrying the display label for breadcrumbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChoice {
    pub id: String,
    pub label: String,
}

/// Entry parameters read once when the flow opens, never re-read.
#[derive(Debug, Clone, Default)]
pub struct WizardSeed {
    pub location_id: Option<String>,
    pub asset_id: Option<String>,
    /// Display name shown while the asset record is still being fetched.
    pub asset_name: Option<String>,
}

#[derive(Debug)]
pub struct WizardDraft {
    step: WizardStep,
    location_id: Option<String>,
    asset: AssetChoice,
    parent_category: Option<CategoryChoice>,
    category: Option<CategoryChoice>,
    description: String,
    images: Vec<PendingImage>,
}

impl WizardDraft {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Location,
            location_id: None,
            asset: AssetChoice::Undecided,
            parent_category: None,
            category: None,
            description: String::new(),
            images: Vec::new(),
        }
    }

    /// Seed a fresh draft from entry parameters. A directly supplied
    /// location id is authoritative: the flow starts on the category step.
    /// An asset-only seed leaves the draft on step 1; the owning location
    /// is resolved asynchronously by the view.
    pub fn from_seed(seed: &WizardSeed) -> Self {
        let mut draft = Self::new();
        if let Some(location_id) = &seed.location_id {
            draft.location_id = Some(location_id.clone());
            draft.step = WizardStep::Category;
        }
        draft
    }

    // ── Read access ────────────────────────────────────────────────────

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn location_id(&self) -> Option<&str> {
        self.location_id.as_deref()
    }

    pub fn asset(&self) -> &AssetChoice {
        &self.asset
    }

    pub fn parent_category(&self) -> Option<&CategoryChoice> {
        self.parent_category.as_ref()
    }

    pub fn category(&self) -> Option<&CategoryChoice> {
        self.category.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn images(&self) -> &[PendingImage] {
        &self.images
    }

    /// Parent and child labels joined, the parent omitted when it is the
    /// terminal pick itself.
    pub fn category_breadcrumb(&self) -> Option<String> {
        let category = self.category.as_ref()?;
        match &self.parent_category {
            Some(parent) if parent.id != category.id => {
                Some(format!("{} / {}", parent.label, category.label))
            }
            _ => Some(category.label.clone()),
        }
    }

    // ── Location & asset transitions ───────────────────────────────────

    /// Select a location. Switching to a different location clears any
    /// asset choice in the same transition: an asset cannot outlive its
    /// location context.
    pub fn select_location(&mut self, location_id: &str) {
        if self.location_id.as_deref() != Some(location_id) {
            self.location_id = Some(location_id.to_string());
            self.asset = AssetChoice::Undecided;
        }
    }

    pub fn clear_location(&mut self) {
        self.location_id = None;
        self.asset = AssetChoice::Undecided;
    }

    /// Pick a concrete asset. Meaningless without a location; ignored then.
    pub fn choose_asset(&mut self, id: &str, name: &str) {
        if self.location_id.is_some() {
            self.asset = AssetChoice::Selected {
                id: id.to_string(),
                name: name.to_string(),
            };
        }
    }

    /// Explicitly proceed without an asset.
    pub fn choose_no_asset(&mut self) {
        self.asset = AssetChoice::None;
    }

    pub fn reset_asset(&mut self) {
        self.asset = AssetChoice::Undecided;
    }

    // ── Category transitions ───────────────────────────────────────────

    /// A terminal parent is its own category: both slots point at it.
    pub fn choose_terminal_parent(&mut self, choice: CategoryChoice) {
        self.parent_category = Some(choice.clone());
        self.category = Some(choice);
    }

    pub fn choose_child_category(&mut self, parent: CategoryChoice, child: CategoryChoice) {
        self.parent_category = Some(parent);
        self.category = Some(child);
    }

    /// Back-navigation from the child list resets the whole step, not just
    /// the view: partial category state is never retained.
    pub fn reset_category(&mut self) {
        self.parent_category = None;
        self.category = None;
    }

    // ── Details transitions ────────────────────────────────────────────

    pub fn set_description(&mut self, text: String) {
        self.description = text;
    }

    /// Stage an image. The list is truncated to [`MAX_IMAGES`] on every
    /// add; dropped excess has its preview released before it goes.
    pub fn attach_image(&mut self, image: PendingImage) {
        self.images.push(image);
        while self.images.len() > MAX_IMAGES {
            if let Some(mut dropped) = self.images.pop() {
                dropped.release_preview();
            }
        }
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            let mut removed = self.images.remove(index);
            removed.release_preview();
        }
    }

    // ── Step movement ──────────────────────────────────────────────────

    /// Whether the current step's completion contract is met.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Location => self.location_id.is_some(),
            WizardStep::Category => self.category.is_some(),
            WizardStep::Details => self.is_submittable(),
        }
    }

    /// Move forward one step if the current step is complete.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.step = match self.step {
            WizardStep::Location => WizardStep::Category,
            WizardStep::Category => WizardStep::Details,
            WizardStep::Details => return false,
        };
        true
    }

    /// Move backward one step. Entered data is kept; only the child
    /// category reset of [`reset_category`](Self::reset_category) is
    /// destructive, and that is driven by the view's drill-down.
    pub fn retreat(&mut self) -> bool {
        self.step = match self.step {
            WizardStep::Location => return false,
            WizardStep::Category => WizardStep::Location,
            WizardStep::Details => WizardStep::Category,
        };
        true
    }

    // ── Submission ─────────────────────────────────────────────────────

    pub fn is_submittable(&self) -> bool {
        self.location_id.is_some() && self.category.is_some()
    }

    /// Description with surrounding whitespace trimmed; `None` when blank
    /// so the field is omitted from the payload entirely.
    pub fn description_payload(&self) -> Option<String> {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Assemble the one-shot submission. `None` until the draft satisfies
    /// the completion contract. Image bytes are copied so a failed submit
    /// leaves the draft (and its previews) untouched.
    pub fn build_submission(&self) -> Option<NewServiceRequest> {
        let location_id = self.location_id.clone()?;
        let category_id = self.category.as_ref()?.id.clone();
        Some(NewServiceRequest {
            location_id,
            asset_id: self.asset.selected_id().map(str::to_string),
            category_id,
            description: self.description_payload(),
            images: self
                .images
                .iter()
                .map(|image| ImagePayload {
                    file_name: image.file_name().to_string(),
                    bytes: image.bytes().to_vec(),
                })
                .collect(),
        })
    }

    /// Drop all draft state, releasing every staged preview. Called on
    /// successful submission and on navigation away.
    pub fn discard(&mut self) {
        for image in &mut self.images {
            image.release_preview();
        }
        self.images.clear();
        self.location_id = None;
        self.asset = AssetChoice::Undecided;
        self.parent_category = None;
        self.category = None;
        self.description.clear();
        self.step = WizardStep::Location;
    }
}

impl Default for WizardDraft {
    fn default() -> Self {
        Self::new()
    }
}
