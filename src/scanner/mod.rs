//! Receipt folder scan
//!
//! Collects receipt photos from a single folder and orders them by
//! capture date so the claim table reads chronologically even when the
//! camera's file names do not.

mod exif;

use crate::error::{Result, SwiftClaimError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    /// Capture date from EXIF ("YYYY-MM-DD"), if the photo carries one.
    pub date: Option<String>,
}

const RECEIPT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

fn is_receipt_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            RECEIPT_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

/// Capture order: EXIF date first, file name as the tiebreak. Photos
/// without a date sort ahead of dated ones as a name-ordered group.
fn capture_order_key(info: &ImageInfo) -> (&str, &str) {
    (info.date.as_deref().unwrap_or(""), &info.file_name)
}

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.exists() {
        return Err(SwiftClaimError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1) // receipts only, no recursion
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_receipt_image(path) {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let date = exif::extract_date(path).ok();

        images.push(ImageInfo {
            path: path.to_path_buf(),
            file_name,
            date,
        });
    }

    images.sort_by(|a, b| capture_order_key(a).cmp(&capture_order_key(b)));

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_is_receipt_image() {
        assert!(is_receipt_image(Path::new("r.jpg")));
        assert!(is_receipt_image(Path::new("r.JPG")));
        assert!(is_receipt_image(Path::new("r.Jpeg")));
        assert!(is_receipt_image(Path::new("r.png")));
        assert!(!is_receipt_image(Path::new("r.txt")));
        assert!(!is_receipt_image(Path::new("r.pdf")));
        assert!(!is_receipt_image(Path::new("r.heic")));
        assert!(!is_receipt_image(Path::new("no_extension")));
    }

    #[test]
    fn test_capture_order_prefers_exif_date() {
        let info = |name: &str, date: Option<&str>| ImageInfo {
            path: PathBuf::from(name),
            file_name: name.to_string(),
            date: date.map(|d| d.to_string()),
        };

        let mut images = vec![
            info("z-first-shot.jpg", Some("2026-08-01")),
            info("a-late-shot.jpg", Some("2026-08-15")),
            info("undated-b.jpg", None),
            info("undated-a.jpg", None),
        ];
        images.sort_by(|a, b| capture_order_key(a).cmp(&capture_order_key(b)));

        let order: Vec<&str> = images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "undated-a.jpg",
                "undated-b.jpg",
                "z-first-shot.jpg",
                "a-late-shot.jpg"
            ]
        );
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_folder_empty() {
        let dir = tempdir().unwrap();
        let result = scan_folder(dir.path()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_scan_folder_with_images() {
        let dir = tempdir().unwrap();

        File::create(dir.path().join("receipt1.jpg"))
            .unwrap()
            .write_all(b"dummy")
            .unwrap();
        File::create(dir.path().join("receipt2.JPG"))
            .unwrap()
            .write_all(b"dummy")
            .unwrap();
        File::create(dir.path().join("receipt3.png"))
            .unwrap()
            .write_all(b"dummy")
            .unwrap();
        File::create(dir.path().join("notes.txt"))
            .unwrap()
            .write_all(b"text")
            .unwrap();

        let result = scan_folder(dir.path()).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].file_name, "receipt1.jpg");
        assert_eq!(result[1].file_name, "receipt2.JPG");
        assert_eq!(result[2].file_name, "receipt3.png");
    }

    #[test]
    fn test_images_without_dates_sorted_by_filename() {
        let dir = tempdir().unwrap();

        File::create(dir.path().join("c.jpg")).unwrap();
        File::create(dir.path().join("a.jpg")).unwrap();
        File::create(dir.path().join("b.jpg")).unwrap();

        let result = scan_folder(dir.path()).unwrap();
        assert_eq!(result[0].file_name, "a.jpg");
        assert_eq!(result[1].file_name, "b.jpg");
        assert_eq!(result[2].file_name, "c.jpg");
    }

    #[test]
    fn test_scan_folder_skips_subfolders() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        File::create(dir.path().join("nested").join("deep.jpg")).unwrap();
        File::create(dir.path().join("top.jpg")).unwrap();

        let result = scan_folder(dir.path()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].file_name, "top.jpg");
    }
}
