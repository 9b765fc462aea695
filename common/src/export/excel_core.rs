//! Excel export core
//!
//! Generates the claim summary worksheet from the same display rows the
//! PDF uses, so both formats always print the same numbers.

use rust_xlsxwriter::*;

use crate::export::pdf_core::{build_display_rows, DisplayRow};
use crate::layout::Orientation;
use crate::types::ClaimState;

const ITEM_COL_CHARS: f64 = 8.0;
const DESC_COL_CHARS: f64 = 58.0;
const AMOUNT_COL_CHARS: f64 = 16.0;

/// Generates the claim form workbook into a buffer.
pub fn generate_excel_buffer(state: &ClaimState, orientation: Orientation) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let title_format = Format::new()
        .set_bold()
        .set_font_size(14.0)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_background_color(Color::RGB(0xF0F0F0))
        .set_border(FormatBorder::Thin);

    let item_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    let desc_format = Format::new()
        .set_align(FormatAlign::Left)
        .set_border(FormatBorder::Thin);

    let amount_format = Format::new()
        .set_align(FormatAlign::Right)
        .set_num_format("0.00")
        .set_border(FormatBorder::Thin);

    let total_label_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Right)
        .set_border(FormatBorder::Thin);

    let total_amount_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Right)
        .set_num_format("0.00")
        .set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Claim Form")
        .map_err(|e| format!("worksheet name error: {}", e))?;

    worksheet
        .set_column_width(0, ITEM_COL_CHARS)
        .map_err(|e| format!("column width error: {}", e))?;
    worksheet
        .set_column_width(1, DESC_COL_CHARS)
        .map_err(|e| format!("column width error: {}", e))?;
    worksheet
        .set_column_width(2, AMOUNT_COL_CHARS)
        .map_err(|e| format!("column width error: {}", e))?;

    // Title and claimant lines
    worksheet
        .merge_range(0, 0, 0, 2, "STAFF MONTHLY EXPENSES CLAIM FORM", &title_format)
        .map_err(|e| format!("title merge error: {}", e))?;
    worksheet
        .write_string(2, 0, &format!("Name: {}", state.name))
        .map_err(|e| format!("name write error: {}", e))?;
    worksheet
        .write_string(2, 2, &format!("Month: {}", state.month))
        .map_err(|e| format!("month write error: {}", e))?;

    // Column headers
    let header_row: u32 = 4;
    worksheet
        .write_string_with_format(header_row, 0, "Items", &header_format)
        .map_err(|e| format!("header write error: {}", e))?;
    worksheet
        .write_string_with_format(header_row, 1, "Descriptions", &header_format)
        .map_err(|e| format!("header write error: {}", e))?;
    worksheet
        .write_string_with_format(header_row, 2, "Amount (RM)", &header_format)
        .map_err(|e| format!("header write error: {}", e))?;

    // Data rows
    let mut row = header_row + 1;
    for display in build_display_rows(state, orientation) {
        match display {
            DisplayRow::Category {
                index,
                description,
                amount_text,
            } => {
                worksheet
                    .write_string_with_format(row, 0, &index.to_string(), &item_format)
                    .map_err(|e| format!("row write error: {}", e))?;
                worksheet
                    .write_string_with_format(row, 1, &description, &desc_format)
                    .map_err(|e| format!("row write error: {}", e))?;
                if amount_text.is_empty() {
                    worksheet
                        .write_string_with_format(row, 2, "", &amount_format)
                        .map_err(|e| format!("row write error: {}", e))?;
                } else {
                    let amount: f64 = amount_text.parse().unwrap_or(0.0);
                    worksheet
                        .write_number_with_format(row, 2, amount, &amount_format)
                        .map_err(|e| format!("row write error: {}", e))?;
                }
            }
            DisplayRow::Filler { index } => {
                worksheet
                    .write_string_with_format(row, 0, &index.to_string(), &item_format)
                    .map_err(|e| format!("row write error: {}", e))?;
                worksheet
                    .write_string_with_format(row, 1, "", &desc_format)
                    .map_err(|e| format!("row write error: {}", e))?;
                worksheet
                    .write_string_with_format(row, 2, "", &amount_format)
                    .map_err(|e| format!("row write error: {}", e))?;
            }
            DisplayRow::Total { amount_text } => {
                worksheet
                    .merge_range(row, 0, row, 1, "Total", &total_label_format)
                    .map_err(|e| format!("total merge error: {}", e))?;
                let amount: f64 = amount_text.parse().unwrap_or(0.0);
                worksheet
                    .write_number_with_format(row, 2, amount, &total_amount_format)
                    .map_err(|e| format!("total write error: {}", e))?;
            }
        }
        row += 1;
    }

    // Signature blocks
    row += 2;
    worksheet
        .write_string(row, 0, "Prepared by:")
        .map_err(|e| format!("signature write error: {}", e))?;
    worksheet
        .write_string(row, 2, "Approved by:")
        .map_err(|e| format!("signature write error: {}", e))?;

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel save error: {}", e))
}
