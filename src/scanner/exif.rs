//! EXIF capture date for receipt photos.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads the capture date of a receipt photo, preferring the moment the
/// shutter fired over the file's modification stamp. Returns the date
/// only ("2026-08-03"); the time of day is irrelevant to a claim row.
pub fn extract_date(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut bufreader)?;

    for tag in [exif::Tag::DateTimeOriginal, exif::Tag::DateTime] {
        if let Some(field) = exif.get_field(tag, exif::In::PRIMARY) {
            return Ok(date_portion(&field.display_value().to_string()));
        }
    }

    Err("No date found in EXIF".into())
}

/// "2026-08-03 14:05:00" -> "2026-08-03"
fn date_portion(display: &str) -> String {
    display
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_date_portion_strips_time() {
        assert_eq!(date_portion("2026-08-03 14:05:00"), "2026-08-03");
        assert_eq!(date_portion("2026-08-03"), "2026-08-03");
        assert_eq!(date_portion(""), "");
    }

    #[test]
    fn test_extract_date_plain_jpeg_has_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.jpg");
        image::DynamicImage::ImageRgb8(image::RgbImage::new(8, 8))
            .save(&path)
            .unwrap();

        // An encoder-fresh JPEG carries no EXIF block
        assert!(extract_date(&path).is_err());
    }
}
