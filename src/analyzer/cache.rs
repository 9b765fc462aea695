//! Classification cache
//!
//! Keyed by the SHA-256 of the image bytes so renamed files still hit and
//! edited files (recrops, rescans) miss.

use crate::error::Result;
use crate::scanner::ImageInfo;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use swiftclaim_common::ClassifySuggestion;

const CACHE_FILE_NAME: &str = ".classify-cache.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// Compatibility check; a mismatch discards the whole cache
    version: u32,
    /// image hash → cached suggestion
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    pub suggestion: ClassifySuggestion,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, CacheFile>(reader) {
            Ok(cache) => {
                if cache.version != Self::CURRENT_VERSION {
                    eprintln!("Cache version mismatch, rebuilding");
                    return Self::default();
                }
                cache
            }
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let cache_path = Self::cache_path(folder);
        let file = File::create(cache_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deletes the cache file. Returns whether one existed.
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn get(&self, hash: &str) -> Option<&ClassifySuggestion> {
        self.entries.get(hash).map(|e| &e.suggestion)
    }

    pub fn insert(
        &mut self,
        hash: String,
        file_name: String,
        file_size: u64,
        suggestion: ClassifySuggestion,
    ) {
        self.entries.insert(
            hash,
            CacheEntry {
                file_name,
                file_size,
                suggestion,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

pub fn compute_file_hash(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(hex::encode(digest))
}

/// Splits images into cached results and (image, hash) pairs that still
/// need a classifier call. A hash failure counts as uncached.
pub fn filter_cached_images(
    images: &[ImageInfo],
    cache: &CacheFile,
) -> (
    Vec<(ImageInfo, ClassifySuggestion)>,
    Vec<(ImageInfo, String)>,
) {
    let mut cached = Vec::new();
    let mut uncached = Vec::new();

    for img in images {
        let hash = match compute_file_hash(&img.path) {
            Ok(h) => h,
            Err(_) => {
                uncached.push((img.clone(), String::new()));
                continue;
            }
        };

        if let Some(suggestion) = cache.get(&hash) {
            cached.push((img.clone(), suggestion.clone()));
        } else {
            uncached.push((img.clone(), hash));
        }
    }

    (cached, uncached)
}
