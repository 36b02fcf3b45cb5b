//! End-to-end exercises of the wizard draft across a whole creation flow,
//! at the state-machine level (no network, no terminal).

use cafmdesk::core::images::PendingImage;
use cafmdesk::core::wizard::{
    AssetChoice, CategoryChoice, WizardDraft, WizardSeed, WizardStep, MAX_IMAGES,
};

fn staged(dir: &std::path::Path, name: &str) -> PendingImage {
    PendingImage::from_bytes(name.to_string(), vec![0u8; 16], dir).unwrap()
}

#[test]
fn full_flow_from_blank_draft() {
    let dir = tempfile::tempdir().unwrap();
    let mut draft = WizardDraft::new();

    // Step 1: pick a location, then an asset inside it.
    assert_eq!(draft.step(), WizardStep::Location);
    draft.select_location("floor-2");
    draft.choose_asset("ahu-7", "AHU 7");
    assert!(draft.advance());

    // Step 2: drill into a child category.
    assert_eq!(draft.step(), WizardStep::Category);
    draft.choose_child_category(
        CategoryChoice {
            id: "hvac".into(),
            label: "HVAC".into(),
        },
        CategoryChoice {
            id: "hvac-noise".into(),
            label: "Unusual noise".into(),
        },
    );
    assert!(draft.advance());

    // Step 3: details and payload.
    assert_eq!(draft.step(), WizardStep::Details);
    draft.set_description("  grinding noise on startup ".into());
    draft.attach_image(staged(dir.path(), "noise.jpg"));

    let submission = draft.build_submission().unwrap();
    assert_eq!(submission.location_id, "floor-2");
    assert_eq!(submission.asset_id.as_deref(), Some("ahu-7"));
    assert_eq!(submission.category_id, "hvac-noise");
    assert_eq!(
        submission.description.as_deref(),
        Some("grinding noise on startup")
    );
    assert_eq!(submission.images.len(), 1);
    assert_eq!(submission.images[0].file_name, "noise.jpg");
}

#[test]
fn changing_location_on_the_way_back_clears_the_asset() {
    // Scenario: user selected L1 + A1, went forward, came back, picked L2.
    let mut draft = WizardDraft::new();
    draft.select_location("L1");
    draft.choose_asset("A1", "Pump A1");
    draft.advance();
    draft.choose_terminal_parent(CategoryChoice {
        id: "P1".into(),
        label: "Electrical".into(),
    });
    draft.advance();

    draft.retreat();
    draft.retreat();
    assert_eq!(draft.step(), WizardStep::Location);

    draft.select_location("L2");
    assert_eq!(draft.location_id(), Some("L2"));
    assert_eq!(*draft.asset(), AssetChoice::Undecided);

    // The category survives backward navigation; only the asset is tied
    // to the location context.
    assert_eq!(draft.category().unwrap().id, "P1");
}

#[test]
fn terminal_parent_and_child_paths_satisfy_completion() {
    // Taxonomy: P1 (no children), P2 -> C1.
    let mut draft = WizardDraft::new();
    draft.select_location("L1");
    draft.advance();

    // Terminal parent: both slots equal, step complete at once.
    draft.choose_terminal_parent(CategoryChoice {
        id: "P1".into(),
        label: "General".into(),
    });
    assert!(draft.can_advance());
    assert_eq!(draft.parent_category().unwrap().id, "P1");
    assert_eq!(draft.category().unwrap().id, "P1");
    assert_eq!(draft.category_breadcrumb().unwrap(), "General");

    // Re-selection through the child path replaces the pick wholesale.
    draft.choose_child_category(
        CategoryChoice {
            id: "P2".into(),
            label: "Plumbing".into(),
        },
        CategoryChoice {
            id: "C1".into(),
            label: "Leak".into(),
        },
    );
    assert_eq!(draft.category().unwrap().id, "C1");
    assert_eq!(draft.category_breadcrumb().unwrap(), "Plumbing / Leak");
}

#[test]
fn seeded_location_flow_starts_at_category_and_can_still_go_back() {
    let seed = WizardSeed {
        location_id: Some("room-12".into()),
        ..WizardSeed::default()
    };
    let mut draft = WizardDraft::from_seed(&seed);
    assert_eq!(draft.step(), WizardStep::Category);

    // Backward navigation into step 1 still works and keeps the seed.
    assert!(draft.retreat());
    assert_eq!(draft.step(), WizardStep::Location);
    assert_eq!(draft.location_id(), Some("room-12"));
    assert!(draft.can_advance());
}

#[test]
fn image_cap_is_exact_and_leak_free_across_the_flow() {
    let dir = tempfile::tempdir().unwrap();
    let mut draft = WizardDraft::new();
    draft.select_location("L1");

    let mut previews = Vec::new();
    for i in 0..(MAX_IMAGES + 3) {
        let image = staged(dir.path(), &format!("photo-{i}.png"));
        previews.push(image.preview_path().to_path_buf());
        draft.attach_image(image);
    }

    assert_eq!(draft.images().len(), MAX_IMAGES);
    let kept: Vec<_> = draft
        .images()
        .iter()
        .map(|i| i.file_name().to_string())
        .collect();
    assert_eq!(
        kept,
        (0..MAX_IMAGES)
            .map(|i| format!("photo-{i}.png"))
            .collect::<Vec<_>>()
    );
    for preview in &previews[..MAX_IMAGES] {
        assert!(preview.exists(), "kept preview must stay alive");
    }
    for preview in &previews[MAX_IMAGES..] {
        assert!(!preview.exists(), "dropped excess must release its preview");
    }

    // Removing from the middle keeps order and releases exactly that one.
    draft.remove_image(1);
    assert_eq!(draft.images().len(), MAX_IMAGES - 1);
    assert!(!previews[1].exists());
    assert!(previews[0].exists());

    // Discard at the end releases the rest.
    draft.discard();
    for preview in &previews[..MAX_IMAGES] {
        assert!(!preview.exists());
    }
}

#[test]
fn discard_resets_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let mut draft = WizardDraft::new();
    draft.select_location("L1");
    draft.choose_asset("A1", "Pump");
    draft.advance();
    draft.choose_terminal_parent(CategoryChoice {
        id: "P1".into(),
        label: "Electrical".into(),
    });
    draft.advance();
    draft.set_description("something".into());
    draft.attach_image(staged(dir.path(), "x.png"));

    draft.discard();

    assert_eq!(draft.step(), WizardStep::Location);
    assert!(draft.location_id().is_none());
    assert_eq!(*draft.asset(), AssetChoice::Undecided);
    assert!(draft.category().is_none());
    assert!(draft.description().is_empty());
    assert!(draft.images().is_empty());
    assert!(draft.build_submission().is_none());
}
