//! Page layout configuration
//!
//! mm-based definitions (source of truth) for the printed claim document.
//! The percentage coordinate space of the attachment board maps onto the
//! usable area of whatever page the collage is printed on.

use crate::types::Layout;

// ============================================
// A4 page (mm)
// ============================================

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Page padding used by the claim form (mm)
pub const MARGIN_MM: f32 = 15.0;

// ============================================
// Conversion factors
// ============================================

/// mm → pt (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

// ============================================
// Summary table geometry (mm)
// ============================================

/// "Items" (row number) column width
pub const ITEM_COL_MM: f32 = 14.0;
/// "Amount (RM)" column width
pub const AMOUNT_COL_MM: f32 = 34.0;
/// Data row height
pub const ROW_HEIGHT_MM: f32 = 8.0;
/// Header and total rows are slightly taller
pub const HEADER_ROW_MM: f32 = 9.0;
/// Vertical space reserved above the table (title + name/month line)
pub const FORM_HEADER_MM: f32 = 32.0;
/// Vertical space reserved below the table (signature blocks)
pub const SIGNATURE_BLOCK_MM: f32 = 28.0;

// ============================================
// Page orientation
// ============================================

/// Orientation of the summary page. The attachment collage page always
/// uses the same orientation so both pages bind together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Page size in mm as (width, height).
    pub fn page_mm(&self) -> (f32, f32) {
        match self {
            Orientation::Portrait => (A4_WIDTH_MM, A4_HEIGHT_MM),
            Orientation::Landscape => (A4_HEIGHT_MM, A4_WIDTH_MM),
        }
    }

    /// Minimum number of table rows printed; shorter category universes
    /// are padded with blank filler rows up to this target. Longer ones
    /// are never truncated.
    pub fn target_rows(&self) -> usize {
        match self {
            Orientation::Portrait => 10,
            Orientation::Landscape => 8,
        }
    }

    /// Usable area inside the margins, in mm as (x, y, width, height)
    /// with the origin at the top-left of the page.
    pub fn usable_area_mm(&self) -> (f32, f32, f32, f32) {
        let (w, h) = self.page_mm();
        (
            MARGIN_MM,
            MARGIN_MM,
            w - MARGIN_MM * 2.0,
            h - MARGIN_MM * 2.0,
        )
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            _ => Err(format!("Unknown orientation: {}. Use portrait or landscape", s)),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
        }
    }
}

/// Maps a board percentage rectangle onto the collage page, in mm with
/// the origin at the top-left. Oversized layouts (resize has no upper
/// cap) may extend past the usable area; that is accepted and will clip
/// at print time.
pub fn board_rect_mm(layout: &Layout, orientation: Orientation) -> (f32, f32, f32, f32) {
    let (ux, uy, uw, uh) = orientation.usable_area_mm();
    (
        ux + layout.x / 100.0 * uw,
        uy + layout.y / 100.0 * uh,
        layout.width / 100.0 * uw,
        layout.height / 100.0 * uh,
    )
}
