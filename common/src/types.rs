//! Claim data model
//!
//! Types shared between the CLI and the desktop app:
//! - Entry: one receipt/claim line item
//! - ClaimState: the whole-application root state
//! - Layout: percentage-based rectangle on the attachment board

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default claim categories, in the order they appear on the printed form.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Handphone",
    "Petrol",
    "Toll",
    "Parking Fee",
    "Car Maintenance",
    "Outstation Allowance",
    "Travelling & Accomodation",
    "Transportation",
    "Staff Welfare",
    "Entertainment",
    "OT Claim",
    "Medical",
    "Misc",
];

/// Category used whenever classification fails or nothing better is known.
pub const FALLBACK_CATEGORY: &str = "Misc";

/// Position and size of an entry on the attachment board, as percentages
/// of the board area. `x`/`y` are clamped into the page during moves;
/// `width`/`height` have a floor of 10 but no ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// One receipt/claim line item.
///
/// Images are stored inline as base64-encoded JPEG. `cropped_image` is
/// `None` for manual entries, which keeps them off the attachment board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    pub id: String,

    /// Source image as uploaded (base64 JPEG), empty for manual entries
    pub original_image: String,

    /// Cropped image (base64 JPEG); entries without one never appear
    /// on the attachment board
    pub cropped_image: Option<String>,

    pub amount: f64,
    pub category: String,
    pub remark: String,

    /// Receipt date as "YYYY-MM-DD"
    pub date: String,

    /// True for entries added without a photo
    pub is_manual: bool,

    pub layout: Layout,
}

/// Whole-application root state. The crop and board engines operate on
/// borrowed views of this and report mutations back by entry id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimState {
    pub name: String,
    pub month: String,
    pub entries: Vec<Entry>,
    pub custom_categories: Vec<String>,
}

impl ClaimState {
    pub fn entry_mut(&mut self, id: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn remove_entry(&mut self, id: &str) {
        self.entries.retain(|e| e.id != id);
    }

    /// Adds a custom category unless it already exists in the universe.
    /// Returns false when rejected as a duplicate or empty.
    pub fn add_custom_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty()
            || DEFAULT_CATEGORIES.contains(&name)
            || self.custom_categories.iter().any(|c| c == name)
        {
            return false;
        }
        self.custom_categories.push(name.to_string());
        true
    }

    pub fn total_amount(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

/// The ordered category universe: defaults first, then custom categories
/// in creation order. Duplicates are the caller's responsibility.
pub fn category_universe(state: &ClaimState) -> Vec<String> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|c| c.to_string())
        .chain(state.custom_categories.iter().cloned())
        .collect()
}

static ENTRY_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Generates a locally-unique opaque entry id (base36, never reused).
pub fn new_entry_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let count = ENTRY_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}{}", to_base36(nanos), to_base36(count as u64))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
