//! PDF/Excel export integration tests

use swiftclaim::export::pdf;
use swiftclaim_common::crop::{compute_crop, CropShape};
use swiftclaim_common::{ClaimState, Entry, Layout, Orientation};
use tempfile::tempdir;

fn cropped_base64() -> String {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(80, 60));
    compute_crop(&CropShape::default(), &img)
        .expect("crop failed")
        .to_base64()
}

fn test_state() -> ClaimState {
    ClaimState {
        name: "Alice Tan".to_string(),
        month: "2026-08".to_string(),
        entries: vec![
            Entry {
                id: "e1".to_string(),
                amount: 86.4,
                category: "Petrol".to_string(),
                remark: "site visit".to_string(),
                date: "2026-08-03".to_string(),
                cropped_image: Some(cropped_base64()),
                layout: Layout::new(0.0, 0.0, 40.0, 30.0),
                ..Default::default()
            },
            Entry {
                id: "e2".to_string(),
                amount: 12.0,
                category: "Parking Fee".to_string(),
                is_manual: true,
                ..Default::default()
            },
        ],
        custom_categories: Vec::new(),
    }
}

#[test]
fn test_pdf_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("claim.pdf");

    let result = pdf::generate_pdf(
        &test_state(),
        &output_path,
        Orientation::Portrait,
        "Expenses Claim Form",
    );

    assert!(result.is_ok(), "PDF generation failed: {:?}", result.err());
    assert!(output_path.exists(), "PDF file was not created");

    let metadata = std::fs::metadata(&output_path).expect("metadata failed");
    assert!(metadata.len() > 0, "PDF file is empty");
}

#[test]
fn test_pdf_generation_empty_state() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("empty.pdf");

    let result = pdf::generate_pdf(
        &ClaimState::default(),
        &output_path,
        Orientation::Portrait,
        "Empty Claim",
    );

    // An empty claim still prints the padded table and a collage page
    assert!(result.is_ok(), "empty PDF generation failed: {:?}", result.err());
    assert!(output_path.exists());
}

#[test]
fn test_pdf_generation_both_orientations() {
    let dir = tempdir().expect("Failed to create temp dir");
    let state = test_state();

    for orientation in [Orientation::Portrait, Orientation::Landscape] {
        let output_path = dir.path().join(format!("claim-{}.pdf", orientation));
        let result = pdf::generate_pdf(&state, &output_path, orientation, "Expenses Claim Form");
        assert!(
            result.is_ok(),
            "PDF generation ({}) failed: {:?}",
            orientation,
            result.err()
        );
        assert!(output_path.exists());
    }
}

#[test]
fn test_pdf_embeds_attachment_image() {
    let dir = tempdir().expect("Failed to create temp dir");
    let with_path = dir.path().join("with.pdf");
    let without_path = dir.path().join("without.pdf");

    let with_attachment = test_state();
    let mut without_attachment = test_state();
    for entry in &mut without_attachment.entries {
        entry.cropped_image = None;
    }

    pdf::generate_pdf(&with_attachment, &with_path, Orientation::Portrait, "Claim")
        .expect("PDF generation failed");
    pdf::generate_pdf(&without_attachment, &without_path, Orientation::Portrait, "Claim")
        .expect("PDF generation failed");

    // The collage page carries the JPEG as an embedded object, so the
    // document grows well beyond the attachment-free rendition
    let with_len = std::fs::metadata(&with_path).expect("metadata failed").len();
    let without_len = std::fs::metadata(&without_path).expect("metadata failed").len();
    assert!(
        with_len > without_len,
        "attachment not embedded: {} <= {}",
        with_len,
        without_len
    );
}

#[test]
fn test_pdf_generation_skips_bad_attachment() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("bad.pdf");

    let mut state = test_state();
    state.entries[0].cropped_image = Some("not-valid-base64!!!".to_string());

    // A corrupt attachment is skipped, not fatal
    let result = pdf::generate_pdf(&state, &output_path, Orientation::Portrait, "Claim");
    assert!(result.is_ok(), "PDF generation failed: {:?}", result.err());
}

#[cfg(feature = "excel")]
mod excel_tests {
    use super::*;
    use swiftclaim::export::excel;

    #[test]
    fn test_excel_generation() {
        let dir = tempdir().expect("Failed to create temp dir");
        let output_path = dir.path().join("claim.xlsx");

        let result = excel::generate_excel(&test_state(), &output_path, Orientation::Portrait);

        assert!(result.is_ok(), "Excel generation failed: {:?}", result.err());
        assert!(output_path.exists(), "Excel file was not created");

        let metadata = std::fs::metadata(&output_path).expect("metadata failed");
        assert!(metadata.len() > 0, "Excel file is empty");
    }

    #[test]
    fn test_excel_generation_empty_state() {
        let dir = tempdir().expect("Failed to create temp dir");
        let output_path = dir.path().join("empty.xlsx");

        let result = excel::generate_excel(&ClaimState::default(), &output_path, Orientation::Landscape);
        assert!(result.is_ok(), "empty Excel generation failed: {:?}", result.err());
    }
}
