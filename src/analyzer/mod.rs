pub mod cache;
mod provider_cli;

pub use cache::{compute_file_hash, filter_cached_images, CacheFile};
pub use provider_cli::classify_image;

use crate::ai_provider::AiProvider;
use crate::error::{Result, SwiftClaimError};
use crate::scanner::ImageInfo;
use image::codecs::jpeg::JpegEncoder;
use std::collections::HashMap;
use std::path::Path;
use swiftclaim_common::board::initial_layout;
use swiftclaim_common::crop::{encode_image_base64, CROP_JPEG_QUALITY};
use swiftclaim_common::{ClassifySuggestion, Entry, FALLBACK_CATEGORY};

/// Classifies every image, in scan order. A failed classification logs a
/// warning and falls back to amount 0 / "Misc" instead of aborting the
/// batch.
pub async fn classify_folder(
    images: &[ImageInfo],
    categories: &[String],
    provider: AiProvider,
    timeout_seconds: u64,
    verbose: bool,
) -> Vec<ClassifySuggestion> {
    let mut suggestions = Vec::with_capacity(images.len());

    for (i, img) in images.iter().enumerate() {
        if verbose {
            println!("  [{}/{}] {}", i + 1, images.len(), img.file_name);
        }

        let suggestion =
            match classify_image(&img.path, categories, provider, timeout_seconds, verbose).await {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("  ⚠ {}: {} (using fallback)", img.file_name, e);
                    ClassifySuggestion::fallback()
                }
            };
        suggestions.push(suggestion);
    }

    suggestions
}

/// Same as [`classify_folder`] but consults the per-folder cache first
/// and records fresh classifications into it. Fallback results are not
/// cached so a transient CLI failure does not stick.
pub async fn classify_folder_with_cache(
    images: &[ImageInfo],
    folder: &Path,
    categories: &[String],
    provider: AiProvider,
    timeout_seconds: u64,
    verbose: bool,
) -> Result<Vec<ClassifySuggestion>> {
    let mut cache = CacheFile::load(folder);
    let (cached, uncached) = filter_cached_images(images, &cache);

    if verbose {
        println!("  cache: {} hit, {} to classify", cached.len(), uncached.len());
    }

    let mut by_name: HashMap<String, ClassifySuggestion> = cached
        .into_iter()
        .map(|(img, suggestion)| (img.file_name, suggestion))
        .collect();

    for (img, hash) in uncached {
        let suggestion =
            match classify_image(&img.path, categories, provider, timeout_seconds, verbose).await {
                Ok(s) => {
                    if !hash.is_empty() {
                        let size = std::fs::metadata(&img.path).map(|m| m.len()).unwrap_or(0);
                        cache.insert(hash, img.file_name.clone(), size, s.clone());
                    }
                    s
                }
                Err(e) => {
                    eprintln!("  ⚠ {}: {} (using fallback)", img.file_name, e);
                    ClassifySuggestion::fallback()
                }
            };
        by_name.insert(img.file_name, suggestion);
    }

    cache.save(folder)?;

    // Re-emit in scan order
    Ok(images
        .iter()
        .map(|img| {
            by_name
                .remove(&img.file_name)
                .unwrap_or_else(ClassifySuggestion::fallback)
        })
        .collect())
}

/// Builds a claim entry from a scanned receipt and its classification.
///
/// The image is stored inline as base64; anything larger than
/// `max_image_size` on its longest edge is downscaled and re-encoded as
/// JPEG first. The board layout cascades by entry index. A suggested
/// category outside the universe is normalized to "Misc".
pub fn build_entry(
    img: &ImageInfo,
    suggestion: &ClassifySuggestion,
    index: usize,
    categories: &[String],
    max_image_size: u32,
) -> Result<Entry> {
    let bytes = std::fs::read(&img.path)?;

    let original_image = if needs_downscale(&bytes, max_image_size) {
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| SwiftClaimError::ImageLoad(format!("{}: {}", img.file_name, e)))?;
        let resized = decoded.resize(
            max_image_size,
            max_image_size,
            image::imageops::FilterType::Triangle,
        );
        let mut jpeg = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut jpeg, CROP_JPEG_QUALITY);
        resized
            .to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| SwiftClaimError::ImageLoad(format!("{}: {}", img.file_name, e)))?;
        encode_image_base64(&jpeg)
    } else {
        encode_image_base64(&bytes)
    };

    let category = if categories.iter().any(|c| c == &suggestion.category_suggestion) {
        suggestion.category_suggestion.clone()
    } else {
        FALLBACK_CATEGORY.to_string()
    };

    Ok(Entry {
        id: swiftclaim_common::types::new_entry_id(),
        original_image,
        cropped_image: None,
        amount: suggestion.amount,
        category,
        remark: String::new(),
        date: img.date.clone().unwrap_or_default(),
        is_manual: false,
        layout: initial_layout(index),
    })
}

fn needs_downscale(bytes: &[u8], max_image_size: u32) -> bool {
    match image::load_from_memory(bytes) {
        Ok(img) => img.width().max(img.height()) > max_image_size,
        // Let undecodable bytes through unchanged; export will skip them
        Err(_) => false,
    }
}

/// Builds all entries for a scanned folder.
pub fn build_entries(
    images: &[ImageInfo],
    suggestions: &[ClassifySuggestion],
    categories: &[String],
    max_image_size: u32,
) -> Result<Vec<Entry>> {
    images
        .iter()
        .zip(suggestions)
        .enumerate()
        .map(|(index, (img, suggestion))| {
            build_entry(img, suggestion, index, categories, max_image_size)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::path::PathBuf;
    use swiftclaim_common::crop::decode_base64_image;
    use swiftclaim_common::DEFAULT_CATEGORIES;
    use tempfile::tempdir;

    fn default_universe() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    fn write_test_jpeg(path: &PathBuf, w: u32, h: u32) {
        DynamicImage::ImageRgb8(RgbImage::new(w, h))
            .save(path)
            .unwrap();
    }

    fn image_info(path: PathBuf, date: Option<&str>) -> ImageInfo {
        ImageInfo {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            path,
            date: date.map(|d| d.to_string()),
        }
    }

    #[test]
    fn test_build_entry_basics() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("receipt.jpg");
        write_test_jpeg(&path, 40, 30);

        let suggestion = ClassifySuggestion {
            amount: 86.4,
            category_suggestion: "Petrol".to_string(),
        };

        let entry = build_entry(
            &image_info(path, Some("2026-08-01")),
            &suggestion,
            0,
            &default_universe(),
            1568,
        )
        .unwrap();

        assert!(!entry.id.is_empty());
        assert_eq!(entry.amount, 86.4);
        assert_eq!(entry.category, "Petrol");
        assert_eq!(entry.date, "2026-08-01");
        assert!(!entry.is_manual);
        assert!(entry.cropped_image.is_none());

        let decoded = decode_base64_image(&entry.original_image).unwrap();
        assert_eq!(decoded.width(), 40);
        assert_eq!(decoded.height(), 30);
    }

    #[test]
    fn test_build_entry_downscales_large_images() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.jpg");
        write_test_jpeg(&path, 200, 100);

        let entry = build_entry(
            &image_info(path, None),
            &ClassifySuggestion::fallback(),
            0,
            &default_universe(),
            50,
        )
        .unwrap();

        let decoded = decode_base64_image(&entry.original_image).unwrap();
        assert!(decoded.width() <= 50);
        assert!(decoded.height() <= 50);
    }

    #[test]
    fn test_build_entry_unknown_category_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("r.jpg");
        write_test_jpeg(&path, 10, 10);

        let suggestion = ClassifySuggestion {
            amount: 3.0,
            category_suggestion: "Helicopter Rental".to_string(),
        };

        let entry = build_entry(
            &image_info(path, None),
            &suggestion,
            0,
            &default_universe(),
            1568,
        )
        .unwrap();
        assert_eq!(entry.category, "Misc");
        assert_eq!(entry.amount, 3.0);
    }

    #[test]
    fn test_build_entries_cascade_layouts() {
        let dir = tempdir().unwrap();
        let mut images = Vec::new();
        for i in 0..3 {
            let path = dir.path().join(format!("r{}.jpg", i));
            write_test_jpeg(&path, 10, 10);
            images.push(image_info(path, None));
        }
        let suggestions = vec![ClassifySuggestion::fallback(); 3];

        let entries = build_entries(&images, &suggestions, &default_universe(), 1568).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!((entries[0].layout.x, entries[0].layout.y), (0.0, 0.0));
        assert_eq!((entries[1].layout.x, entries[1].layout.y), (5.0, 10.0));
        assert_eq!((entries[2].layout.x, entries[2].layout.y), (10.0, 20.0));
    }
}
