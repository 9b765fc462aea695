//! End-to-end claim flow: capture → crop → board → summary → export

use swiftclaim::ai_provider::AiProvider;
use swiftclaim::analyzer::{build_entries, build_entry, classify_folder};
use swiftclaim::export::pdf;
use swiftclaim::scanner::ImageInfo;
use swiftclaim_common::board::{BoardSession, ManipulationMode};
use swiftclaim_common::crop::CropSession;
use swiftclaim_common::export::pdf_core::{build_display_rows, DisplayRow};
use swiftclaim_common::{
    summarize, ClaimState, ClassifySuggestion, Layout, Orientation, DEFAULT_CATEGORIES,
    FALLBACK_CATEGORY,
};
use tempfile::tempdir;

fn default_universe() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

fn write_receipt(dir: &std::path::Path, name: &str, w: u32, h: u32) -> ImageInfo {
    let path = dir.join(name);
    image::DynamicImage::ImageRgb8(image::RgbImage::new(w, h))
        .save(&path)
        .unwrap();
    ImageInfo {
        file_name: name.to_string(),
        path,
        date: Some("2026-08-03".to_string()),
    }
}

#[test]
fn test_capture_to_export_flow() {
    let dir = tempdir().unwrap();

    // Capture: two classified receipts plus one manual entry
    let petrol = write_receipt(dir.path(), "petrol.jpg", 120, 90);
    let misc = write_receipt(dir.path(), "misc.jpg", 60, 60);

    let mut entry1 = build_entry(
        &petrol,
        &ClassifySuggestion {
            amount: 80.0,
            category_suggestion: "Petrol".to_string(),
        },
        0,
        &default_universe(),
        1568,
    )
    .unwrap();
    let entry2 = build_entry(
        &misc,
        &ClassifySuggestion {
            amount: 10.0,
            category_suggestion: "Misc".to_string(),
        },
        1,
        &default_universe(),
        1568,
    )
    .unwrap();

    // Crop: drag the top-right corner in, commit the bounding-box crop
    let source = swiftclaim_common::crop::decode_base64_image(&entry1.original_image).unwrap();
    let mut crop = CropSession::new();
    crop.begin_drag(1);
    crop.update_drag((90.0, 0.0), (0.0, 0.0), (120.0, 90.0));
    crop.end_drag();
    let output = crop.compute_crop(&source).unwrap();
    assert_eq!(output.width, 90); // 0.75 of 120
    entry1.cropped_image = Some(output.to_base64());

    let mut state = ClaimState {
        name: "Alice Tan".to_string(),
        month: "2026-08".to_string(),
        entries: vec![entry1, entry2],
        custom_categories: Vec::new(),
    };

    // Board: drag the first attachment right by 40% from x=40; it clamps
    // at the canvas edge
    let id = state.entries[0].id.clone();
    state.entries[0].layout = Layout::new(40.0, 10.0, 30.0, 30.0);

    let mut board = BoardSession::new();
    board.begin(&id, ManipulationMode::Move, (0.0, 0.0), state.entries[0].layout);
    let (moved_id, layout) = board.update((400.0, 0.0), (1000.0, 1000.0)).unwrap();
    board.end();
    assert_eq!(moved_id, id);
    assert_eq!(layout.x, 70.0);
    state.entry_mut(&moved_id).unwrap().layout = layout;

    // Summary: Petrol 80 + Misc 10, grand total 90
    let (rows, grand_total) = summarize(&state);
    assert_eq!(grand_total, 90.0);
    let petrol_row = rows.iter().find(|r| r.name == "Petrol").unwrap();
    assert_eq!(petrol_row.total_amount, 80.0);

    let display = build_display_rows(&state, Orientation::Portrait);
    match display.last().unwrap() {
        DisplayRow::Total { amount_text } => assert_eq!(amount_text, "90.00"),
        other => panic!("expected total row, got {:?}", other),
    }

    // Export: the full two-page PDF renders
    let pdf_path = dir.path().join("claim.pdf");
    pdf::generate_pdf(&state, &pdf_path, Orientation::Portrait, "Expenses Claim Form").unwrap();
    assert!(std::fs::metadata(&pdf_path).unwrap().len() > 0);
}

#[test]
fn test_claim_state_json_roundtrip_preserves_flow_results() {
    let dir = tempdir().unwrap();
    let receipt = write_receipt(dir.path(), "r.jpg", 30, 30);

    let entry = build_entry(
        &receipt,
        &ClassifySuggestion {
            amount: 12.5,
            category_suggestion: "Parking Fee".to_string(),
        },
        0,
        &default_universe(),
        1568,
    )
    .unwrap();

    let mut state = ClaimState {
        name: "Bob".to_string(),
        month: "2026-08".to_string(),
        entries: vec![entry],
        custom_categories: Vec::new(),
    };
    state.add_custom_category("Printing");

    let path = dir.path().join("claim.json");
    std::fs::write(&path, serde_json::to_string_pretty(&state).unwrap()).unwrap();

    let restored: ClaimState =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(restored.name, "Bob");
    assert_eq!(restored.entries.len(), 1);
    assert_eq!(restored.entries[0].category, "Parking Fee");
    assert_eq!(restored.custom_categories, vec!["Printing".to_string()]);

    // The stored image survives the roundtrip intact
    let decoded =
        swiftclaim_common::crop::decode_base64_image(&restored.entries[0].original_image).unwrap();
    assert_eq!(decoded.width(), 30);
}

#[tokio::test]
async fn test_failed_classification_still_yields_one_entry_per_receipt() {
    let dir = tempdir().unwrap();
    let first = write_receipt(dir.path(), "lunch.jpg", 50, 40);
    let second = write_receipt(dir.path(), "toll.jpg", 60, 45);

    // Classification runs against paths that no longer resolve, so every
    // image degrades to the fallback suggestion instead of erroring out
    let ghosts: Vec<ImageInfo> = [&first, &second]
        .iter()
        .map(|img| ImageInfo {
            path: img.path.with_extension("gone"),
            file_name: img.file_name.clone(),
            date: img.date.clone(),
        })
        .collect();

    let suggestions = classify_folder(&ghosts, &default_universe(), AiProvider::Claude, 5, false).await;
    assert_eq!(suggestions.len(), 2);
    for suggestion in &suggestions {
        assert_eq!(suggestion.amount, 0.0);
        assert_eq!(suggestion.category_suggestion, FALLBACK_CATEGORY);
    }

    // The pipeline still appends exactly one entry per receipt
    let entries = build_entries(&[first, second], &suggestions, &default_universe(), 1568).unwrap();
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert_eq!(entry.amount, 0.0);
        assert_eq!(entry.category, FALLBACK_CATEGORY);
        assert!(!entry.is_manual);
    }
}

#[test]
fn test_resize_keeps_entry_on_summary() {
    // Oversized attachments change the collage only, never the numbers
    let dir = tempdir().unwrap();
    let receipt = write_receipt(dir.path(), "big.jpg", 40, 40);

    let mut entry = build_entry(
        &receipt,
        &ClassifySuggestion {
            amount: 55.0,
            category_suggestion: "Medical".to_string(),
        },
        0,
        &default_universe(),
        1568,
    )
    .unwrap();
    entry.layout = Layout::new(10.0, 10.0, 30.0, 30.0);
    let id = entry.id.clone();

    let mut state = ClaimState {
        entries: vec![entry],
        ..Default::default()
    };

    let mut board = BoardSession::new();
    board.begin(&id, ManipulationMode::Resize, (0.0, 0.0), state.entries[0].layout);
    let (_, layout) = board.update((1500.0, 1500.0), (1000.0, 1000.0)).unwrap();
    board.end();
    assert_eq!(layout.width, 180.0); // grows past 100, accepted
    state.entry_mut(&id).unwrap().layout = layout;

    let (_, grand_total) = summarize(&state);
    assert_eq!(grand_total, 55.0);
}
