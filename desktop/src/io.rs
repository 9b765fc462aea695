use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use swiftclaim_common::ClaimState;

/// Where the working claim autosaves between sessions.
pub fn state_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("swiftclaim")
        .join("state.json")
}

/// Loads the autosaved claim. Any failure (missing file, corrupt JSON)
/// starts a fresh claim instead of blocking the app.
pub fn load_state(path: &Path) -> ClaimState {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

pub fn save_state(path: &Path, state: &ClaimState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(state)?;
    fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Imports a claim file, rejecting documents without an array-valued
/// `entries` field before touching the current state.
pub fn import_claim(path: &Path) -> Result<ClaimState> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))?;

    if !value.get("entries").map(|e| e.is_array()).unwrap_or(false) {
        bail!("not a claim file: missing array-valued \"entries\" field");
    }

    serde_json::from_value(value).with_context(|| format!("parse {}", path.display()))
}

pub fn export_claim_json(path: &Path, state: &ClaimState) -> Result<()> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
