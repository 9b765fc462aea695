//! PDF export core
//!
//! Pure layout computation for the two printed pages. The root crate
//! renders these results with printpdf; keeping the math here keeps it
//! unit-testable without a PDF backend.

use crate::layout::{
    board_rect_mm, Orientation, AMOUNT_COL_MM, FORM_HEADER_MM, HEADER_ROW_MM, ITEM_COL_MM,
    MARGIN_MM, ROW_HEIGHT_MM,
};
use crate::summary::{summarize, SummaryRow};
use crate::types::{ClaimState, Entry};

/// One printable table line. Filler rows carry a running index but no
/// text; the total row closes the table.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayRow {
    Category {
        index: usize,
        /// "Name (remark, remark)" as printed in the Descriptions column
        description: String,
        /// Empty when the category total is zero
        amount_text: String,
    },
    Filler {
        index: usize,
    },
    Total {
        amount_text: String,
    },
}

/// Builds the full row list for the summary table: category rows in
/// universe order, blank filler rows up to the orientation's target, and
/// the grand-total row. Never truncates an oversized universe.
pub fn build_display_rows(state: &ClaimState, orientation: Orientation) -> Vec<DisplayRow> {
    let (rows, grand_total) = summarize(state);
    let target = orientation.target_rows();
    let filler = target.saturating_sub(rows.len());

    let mut out: Vec<DisplayRow> = rows.iter().map(category_row).collect();
    for i in 0..filler {
        out.push(DisplayRow::Filler {
            index: rows.len() + i + 1,
        });
    }
    out.push(DisplayRow::Total {
        amount_text: format!("{:.2}", grand_total),
    });
    out
}

fn category_row(row: &SummaryRow) -> DisplayRow {
    let description = if row.remarks.is_empty() {
        row.name.clone()
    } else {
        format!("{} ({})", row.name, row.remarks)
    };
    let amount_text = if row.total_amount > 0.0 {
        format!("{:.2}", row.total_amount)
    } else {
        String::new()
    };
    DisplayRow::Category {
        index: row.index,
        description,
        amount_text,
    }
}

/// Column x-positions and row geometry of the summary table, in mm with
/// the origin at the top-left of the page.
#[derive(Debug, Clone)]
pub struct TableGeometry {
    pub table_x: f32,
    pub table_y: f32,
    pub table_width: f32,
    pub item_col_x: f32,
    pub desc_col_x: f32,
    pub amount_col_x: f32,
    pub header_height: f32,
    pub row_height: f32,
}

impl TableGeometry {
    pub fn for_orientation(orientation: Orientation) -> Self {
        let (page_w, _) = orientation.page_mm();
        let table_width = page_w - MARGIN_MM * 2.0;
        Self {
            table_x: MARGIN_MM,
            table_y: MARGIN_MM + FORM_HEADER_MM,
            table_width,
            item_col_x: MARGIN_MM,
            desc_col_x: MARGIN_MM + ITEM_COL_MM,
            amount_col_x: MARGIN_MM + table_width - AMOUNT_COL_MM,
            header_height: HEADER_ROW_MM,
            row_height: ROW_HEIGHT_MM,
        }
    }

    /// Top edge of the n-th data row (0-based), below the header row.
    pub fn row_y(&self, row: usize) -> f32 {
        self.table_y + self.header_height + row as f32 * self.row_height
    }

    /// Total table height for `rows` data rows (header included).
    pub fn height(&self, rows: usize) -> f32 {
        self.header_height + rows as f32 * self.row_height
    }
}

/// An entry placed on the collage page: id plus its rectangle in mm.
#[derive(Debug, Clone)]
pub struct CollageItem<'a> {
    pub entry: &'a Entry,
    /// (x, y, width, height), top-left origin
    pub rect_mm: (f32, f32, f32, f32),
}

/// Entries that appear on the attachment page (those with a cropped
/// image), each mapped from board percentage space onto the page.
pub fn collage_items(state: &ClaimState, orientation: Orientation) -> Vec<CollageItem<'_>> {
    state
        .entries
        .iter()
        .filter(|e| e.cropped_image.is_some())
        .map(|entry| CollageItem {
            entry,
            rect_mm: board_rect_mm(&entry.layout, orientation),
        })
        .collect()
}
