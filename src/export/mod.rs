pub mod pdf;

#[cfg(feature = "excel")]
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use std::path::Path;
use swiftclaim_common::{ClaimState, Orientation};

fn output_path_for_format(output: &Path, title: &str, extension: &str) -> std::path::PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, title: &str) -> (std::path::PathBuf, std::path::PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        let pdf_path = output.join(format!("{}.pdf", title));
        let excel_path = output.join(format!("{}.xlsx", title));
        (pdf_path, excel_path)
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(title);
        let pdf_path = parent.join(format!("{}.pdf", stem));
        let excel_path = parent.join(format!("{}.xlsx", stem));
        (pdf_path, excel_path)
    }
}

pub fn export_claim(
    state: &ClaimState,
    format: &ExportFormat,
    output_dir: &Path,
    orientation: Orientation,
    title: &str,
) -> Result<()> {
    match format {
        ExportFormat::Pdf => {
            let output_path = output_path_for_format(output_dir, title, "pdf");
            println!("- Generating PDF... ({})", orientation);
            pdf::generate_pdf(state, &output_path, orientation, title)?;
            println!("✔ PDF written: {}", output_path.display());
        }
        ExportFormat::Excel => {
            let output_path = output_path_for_format(output_dir, title, "xlsx");
            println!("- Generating Excel...");
            write_excel(state, &output_path, orientation)?;
            println!("✔ Excel written: {}", output_path.display());
        }
        ExportFormat::Both => {
            let (pdf_path, excel_path) = output_paths_for_both(output_dir, title);

            println!("- Generating PDF... ({})", orientation);
            pdf::generate_pdf(state, &pdf_path, orientation, title)?;
            println!("✔ PDF written: {}", pdf_path.display());

            println!("- Generating Excel...");
            write_excel(state, &excel_path, orientation)?;
            println!("✔ Excel written: {}", excel_path.display());
        }
    }

    Ok(())
}

#[cfg(feature = "excel")]
fn write_excel(state: &ClaimState, output_path: &Path, orientation: Orientation) -> Result<()> {
    excel::generate_excel(state, output_path, orientation)
}

#[cfg(not(feature = "excel"))]
fn write_excel(state: &ClaimState, _output_path: &Path, _orientation: Orientation) -> Result<()> {
    let _ = state;
    Err(crate::error::SwiftClaimError::ExcelGeneration(
        "built without the excel feature".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_output_path_for_directory() {
        let path = output_path_for_format(Path::new("/tmp"), "Claim", "pdf");
        assert_eq!(path, PathBuf::from("/tmp/Claim.pdf"));
    }

    #[test]
    fn test_output_path_keeps_explicit_file() {
        let path = output_path_for_format(Path::new("/tmp/august.pdf"), "Claim", "pdf");
        assert_eq!(path, PathBuf::from("/tmp/august.pdf"));
    }

    #[test]
    fn test_output_paths_for_both_from_stem() {
        let (pdf, xlsx) = output_paths_for_both(Path::new("/tmp/august.pdf"), "Claim");
        assert_eq!(pdf, PathBuf::from("/tmp/august.pdf"));
        assert_eq!(xlsx, PathBuf::from("/tmp/august.xlsx"));
    }
}
