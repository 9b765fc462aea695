//! SwiftClaim Common Library
//!
//! Types and core engines shared between the CLI and the desktop app:
//! - types: Entry / ClaimState / Layout and the category universe
//! - crop: four-corner crop tool state machine and raster crop
//! - board: attachment board move/resize state machine
//! - summary: claim aggregation into the printable table

pub mod board;
pub mod crop;
pub mod error;
pub mod export;
pub mod geometry;
pub mod layout;
pub mod parser;
pub mod prompts;
pub mod summary;
pub mod types;

pub use board::{BoardSession, ManipulationMode};
pub use crop::{CropOutput, CropSession, CropShape};
pub use error::{Error, Result};
pub use geometry::{bounding_box, clamp, Point};
pub use layout::Orientation;
pub use parser::{extract_json, parse_classify_response, ClassifySuggestion};
pub use prompts::build_classify_prompt;
pub use summary::{summarize, SummaryRow};
pub use types::{category_universe, ClaimState, Entry, Layout, DEFAULT_CATEGORIES, FALLBACK_CATEGORY};
