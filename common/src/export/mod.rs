//! Export core modules shared across the CLI and the desktop app.

pub mod pdf_core;

#[cfg(feature = "excel")]
pub mod excel_core;
