use crate::error::{Result, SwiftClaimError};
use std::path::Path;
use swiftclaim_common::export::excel_core;
use swiftclaim_common::{ClaimState, Orientation};

pub fn generate_excel(state: &ClaimState, output_path: &Path, orientation: Orientation) -> Result<()> {
    let buffer = excel_core::generate_excel_buffer(state, orientation)
        .map_err(SwiftClaimError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
