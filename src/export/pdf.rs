//! Claim form PDF
//!
//! Two pages: the summary table with signature blocks, then the receipt
//! collage laid out from the attachment board percentages. All geometry
//! comes from the shared layout/export cores; this module only draws.

use crate::error::{Result, SwiftClaimError};
// printpdf bundles its own image crate for embedding; attachments are
// decoded through it, not the workspace's image dependency.
use printpdf::image_crate::GenericImageView as _;
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use swiftclaim_common::crop::decode_base64_bytes;
use swiftclaim_common::export::pdf_core::{build_display_rows, collage_items, DisplayRow, TableGeometry};
use swiftclaim_common::layout::{AMOUNT_COL_MM, MARGIN_MM, SIGNATURE_BLOCK_MM};
use swiftclaim_common::{ClaimState, Orientation};

const TITLE_PT: f32 = 14.0;
const BODY_PT: f32 = 10.0;
const GRID_PT: f32 = 0.5;

/// Baseline offset inside a row so text sits visually centered.
const TEXT_BASELINE_MM: f32 = 5.5;

pub fn generate_pdf(
    state: &ClaimState,
    output_path: &Path,
    orientation: Orientation,
    title: &str,
) -> Result<()> {
    let (page_w, page_h) = orientation.page_mm();

    let (doc, page1, layer1) = PdfDocument::new(title, Mm(page_w), Mm(page_h), "Layer 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| SwiftClaimError::PdfGeneration(format!("font error: {:?}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| SwiftClaimError::PdfGeneration(format!("font error: {:?}", e)))?;

    let summary_layer = doc.get_page(page1).get_layer(layer1);
    draw_summary_page(&summary_layer, state, orientation, title, &font, &bold);

    let (page2, layer2) = doc.add_page(Mm(page_w), Mm(page_h), "Layer 1");
    let collage_layer = doc.get_page(page2).get_layer(layer2);
    draw_collage_page(&collage_layer, state, orientation, &font)?;

    let file = File::create(output_path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| SwiftClaimError::PdfGeneration(format!("PDF save error: {:?}", e)))?;

    Ok(())
}

/// Converts a top-origin y (mm) to the PDF's bottom-origin coordinate.
fn from_top(page_h: f32, y_top: f32) -> Mm {
    Mm(page_h - y_top)
}

fn draw_summary_page(
    layer: &PdfLayerReference,
    state: &ClaimState,
    orientation: Orientation,
    title: &str,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    let (_, page_h) = orientation.page_mm();
    let geo = TableGeometry::for_orientation(orientation);
    let rows = build_display_rows(state, orientation);

    // Header block: title, claimant, month
    layer.use_text(
        title,
        TITLE_PT,
        Mm(geo.table_x),
        from_top(page_h, MARGIN_MM + 6.0),
        bold,
    );
    layer.use_text(
        format!("Name: {}", state.name),
        BODY_PT,
        Mm(geo.table_x),
        from_top(page_h, MARGIN_MM + 16.0),
        font,
    );
    layer.use_text(
        format!("Month: {}", state.month),
        BODY_PT,
        Mm(geo.amount_col_x),
        from_top(page_h, MARGIN_MM + 16.0),
        font,
    );

    layer.set_outline_thickness(GRID_PT);

    // Column header row
    layer.use_text(
        "Items",
        BODY_PT,
        Mm(geo.item_col_x + 2.0),
        from_top(page_h, geo.table_y + TEXT_BASELINE_MM + 0.5),
        bold,
    );
    layer.use_text(
        "Descriptions",
        BODY_PT,
        Mm(geo.desc_col_x + 2.0),
        from_top(page_h, geo.table_y + TEXT_BASELINE_MM + 0.5),
        bold,
    );
    layer.use_text(
        "Amount (RM)",
        BODY_PT,
        Mm(geo.amount_col_x + 2.0),
        from_top(page_h, geo.table_y + TEXT_BASELINE_MM + 0.5),
        bold,
    );

    // Row text
    for (i, row) in rows.iter().enumerate() {
        let y_text = from_top(page_h, geo.row_y(i) + TEXT_BASELINE_MM);
        match row {
            DisplayRow::Category {
                index,
                description,
                amount_text,
            } => {
                layer.use_text(index.to_string(), BODY_PT, Mm(geo.item_col_x + 2.0), y_text, font);
                layer.use_text(description, BODY_PT, Mm(geo.desc_col_x + 2.0), y_text, font);
                if !amount_text.is_empty() {
                    layer.use_text(amount_text, BODY_PT, Mm(geo.amount_col_x + 2.0), y_text, font);
                }
            }
            DisplayRow::Filler { index } => {
                layer.use_text(index.to_string(), BODY_PT, Mm(geo.item_col_x + 2.0), y_text, font);
            }
            DisplayRow::Total { amount_text } => {
                layer.use_text("Total", BODY_PT, Mm(geo.amount_col_x - AMOUNT_COL_MM / 2.0), y_text, bold);
                layer.use_text(amount_text, BODY_PT, Mm(geo.amount_col_x + 2.0), y_text, bold);
            }
        }
    }

    // Grid: horizontal rules (header top, every row boundary, bottom)
    let table_bottom = geo.row_y(rows.len());
    draw_line(
        layer,
        (geo.table_x, geo.table_y),
        (geo.table_x + geo.table_width, geo.table_y),
        page_h,
    );
    for i in 0..=rows.len() {
        let y = geo.row_y(i);
        draw_line(layer, (geo.table_x, y), (geo.table_x + geo.table_width, y), page_h);
    }

    // Grid: vertical rules
    for x in [
        geo.table_x,
        geo.desc_col_x,
        geo.amount_col_x,
        geo.table_x + geo.table_width,
    ] {
        draw_line(layer, (x, geo.table_y), (x, table_bottom), page_h);
    }

    // Signature blocks
    let sig_y = table_bottom + SIGNATURE_BLOCK_MM / 2.0;
    layer.use_text(
        "Prepared by:",
        BODY_PT,
        Mm(geo.table_x),
        from_top(page_h, sig_y),
        font,
    );
    layer.use_text(
        "Approved by:",
        BODY_PT,
        Mm(geo.amount_col_x - AMOUNT_COL_MM),
        from_top(page_h, sig_y),
        font,
    );
    draw_line(
        layer,
        (geo.table_x, sig_y + 10.0),
        (geo.table_x + 55.0, sig_y + 10.0),
        page_h,
    );
    draw_line(
        layer,
        (geo.amount_col_x - AMOUNT_COL_MM, sig_y + 10.0),
        (geo.amount_col_x - AMOUNT_COL_MM + 55.0, sig_y + 10.0),
        page_h,
    );
}

fn draw_collage_page(
    layer: &PdfLayerReference,
    state: &ClaimState,
    orientation: Orientation,
    font: &IndirectFontRef,
) -> Result<()> {
    let (_, page_h) = orientation.page_mm();
    let items = collage_items(state, orientation);

    if items.is_empty() {
        layer.use_text(
            "No receipt attachments",
            BODY_PT,
            Mm(MARGIN_MM),
            from_top(page_h, MARGIN_MM + 6.0),
            font,
        );
        return Ok(());
    }

    for item in items {
        let Some(cropped) = item.entry.cropped_image.as_deref() else {
            continue;
        };
        let jpeg = match decode_base64_bytes(cropped) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("  ⚠ skipping attachment {}: {}", item.entry.id, e);
                continue;
            }
        };
        let decoded = match printpdf::image_crate::load_from_memory(&jpeg) {
            Ok(img) => img,
            Err(e) => {
                eprintln!("  ⚠ skipping attachment {}: {}", item.entry.id, e);
                continue;
            }
        };

        let (x, y, w, h) = item.rect_mm;

        // Natural size in mm at the default 300 dpi placement
        let natural_w_mm = decoded.width() as f32 * 25.4 / 300.0;
        let natural_h_mm = decoded.height() as f32 * 25.4 / 300.0;
        if natural_w_mm <= 0.0 || natural_h_mm <= 0.0 {
            continue;
        }

        // Fit inside the board rectangle, preserving aspect ratio
        let scale = (w / natural_w_mm).min(h / natural_h_mm);
        let draw_w = natural_w_mm * scale;
        let draw_h = natural_h_mm * scale;
        let offset_x = x + (w - draw_w) / 2.0;
        let offset_y = y + (h - draw_h) / 2.0;

        let image = Image::from_dynamic_image(&decoded);
        image.add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(offset_x)),
                translate_y: Some(from_top(page_h, offset_y + draw_h)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                ..Default::default()
            },
        );
    }

    Ok(())
}

fn draw_line(layer: &PdfLayerReference, from: (f32, f32), to: (f32, f32), page_h: f32) {
    // Stroked with the layer's current outline settings
    let line = Line {
        points: vec![
            (Point::new(Mm(from.0), from_top(page_h, from.1)), false),
            (Point::new(Mm(to.0), from_top(page_h, to.1)), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}
