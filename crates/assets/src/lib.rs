//! Illustration catalog: a plain, queryable collection of SVG assets.
//!
//! Libraries and categories are fields, not types. Catalogs are validated on load: version,
//! unique ids, markup hygiene and optional per-entry SHA-256 digests.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use storyboard_engine::{AssetLookup, SceneAsset};
use thiserror::Error;
use tracing::{debug, info};

pub const CATALOG_VERSION: u16 = 1;

const BUILTIN_CATALOG: &str = include_str!("../catalog/builtin.json");
/// Suggestions returned for an empty keyword list.
const DEFAULT_SAMPLE: usize = 3;
const SUGGESTION_LIMIT: usize = 4;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog parse error: {0}")]
    Parse(String),
    #[error("unsupported catalog version {0}")]
    UnsupportedVersion(u16),
    #[error("duplicate asset id '{0}'")]
    DuplicateId(String),
    #[error("sha256 mismatch for asset '{0}'")]
    DigestMismatch(String),
    #[error("asset '{id}' contains unsafe markup ({reason})")]
    UnsafeMarkup { id: String, reason: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub library: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub palette: Vec<String>,
    pub svg: String,
    /// Lower-case hex digest of `svg`; verified on load when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl CatalogEntry {
    /// Builds an entry from raw markup, recording its digest.
    pub fn from_svg(
        id: impl Into<String>,
        name: impl Into<String>,
        library: impl Into<String>,
        category: impl Into<String>,
        svg: String,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            library: library.into(),
            category: category.into(),
            keywords: Vec::new(),
            palette: Vec::new(),
            sha256: Some(sha256_hex(svg.as_bytes())),
            svg,
        }
    }

    /// Value copy handed to scenes.
    pub fn to_scene_asset(&self) -> SceneAsset {
        SceneAsset {
            id: self.id.clone(),
            name: self.name.clone(),
            svg: self.svg.clone(),
            library: self.library.clone(),
            category: self.category.clone(),
            keywords: self.keywords.clone(),
            palette: self.palette.clone(),
        }
    }

    fn matches_any(&self, normalized: &[String]) -> bool {
        self.keywords
            .iter()
            .any(|keyword| normalized.contains(&keyword.to_lowercase()))
    }

    fn haystack(&self) -> String {
        format!("{} {}", self.name, self.keywords.join(" ")).to_lowercase()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    pub catalog_version: u16,
    pub assets: Vec<CatalogEntry>,
}

/// Optional narrowing for [`AssetCatalog::search`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub library: Option<String>,
    pub category: Option<String>,
}

impl SearchFilter {
    pub fn library(library: impl Into<String>) -> Self {
        Self {
            library: Some(library.into()),
            category: None,
        }
    }

    fn admits(&self, entry: &CatalogEntry) -> bool {
        self.library
            .as_deref()
            .map_or(true, |library| entry.library == library)
            && self
                .category
                .as_deref()
                .map_or(true, |category| entry.category == category)
    }
}

#[derive(Clone, Debug)]
pub struct AssetCatalog {
    entries: Vec<CatalogEntry>,
}

impl AssetCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(input: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(input).map_err(|err| CatalogError::Parse(err.to_string()))?;
        if file.catalog_version != CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion(file.catalog_version));
        }
        Self::from_entries(file.assets)
    }

    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), assets = catalog.len(), "asset catalog loaded");
        Ok(catalog)
    }

    /// Validates `entries` and keeps their order.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
            if let Some(reason) = unsafe_markup(&entry.svg) {
                return Err(CatalogError::UnsafeMarkup {
                    id: entry.id.clone(),
                    reason,
                });
            }
            if let Some(expected) = &entry.sha256 {
                if !expected.eq_ignore_ascii_case(&sha256_hex(entry.svg.as_bytes())) {
                    return Err(CatalogError::DigestMismatch(entry.id.clone()));
                }
            }
        }
        debug!(assets = entries.len(), "asset catalog validated");
        Ok(Self { entries })
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        let file = CatalogFile {
            catalog_version: CATALOG_VERSION,
            assets: self.entries.clone(),
        };
        serde_json::to_string_pretty(&file).map_err(|err| CatalogError::Parse(err.to_string()))
    }

    pub fn all(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct library names in first-seen order.
    pub fn libraries(&self) -> Vec<&str> {
        distinct(self.entries.iter().map(|entry| entry.library.as_str()))
    }

    /// Distinct category names in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        distinct(self.entries.iter().map(|entry| entry.category.as_str()))
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries whose name and keywords contain every `[a-z0-9]+` token of `query`.
    pub fn search(&self, query: &str, filter: &SearchFilter) -> Vec<&CatalogEntry> {
        let lowered = query.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|ch: char| !(ch.is_ascii_lowercase() || ch.is_ascii_digit()))
            .filter(|token| !token.is_empty())
            .collect();
        self.entries
            .iter()
            .filter(|entry| filter.admits(entry))
            .filter(|entry| {
                if tokens.is_empty() {
                    return true;
                }
                let haystack = entry.haystack();
                tokens.iter().all(|token| haystack.contains(token))
            })
            .collect()
    }

    /// Suggestions for `keywords`; never empty unless the catalog is.
    pub fn suggest_entries(&self, keywords: &[String]) -> Vec<&CatalogEntry> {
        if keywords.is_empty() {
            return self.entries.iter().take(DEFAULT_SAMPLE).collect();
        }
        let normalized: Vec<String> = keywords.iter().map(|word| word.to_lowercase()).collect();
        let matches: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.matches_any(&normalized))
            .take(SUGGESTION_LIMIT)
            .collect();
        if matches.is_empty() {
            self.entries.iter().take(SUGGESTION_LIMIT).collect()
        } else {
            matches
        }
    }
}

impl AssetLookup for AssetCatalog {
    fn find_by_id(&self, id: &str) -> Option<SceneAsset> {
        self.get(id).map(CatalogEntry::to_scene_asset)
    }

    fn suggest(&self, keywords: &[String]) -> Vec<SceneAsset> {
        self.suggest_entries(keywords)
            .into_iter()
            .map(CatalogEntry::to_scene_asset)
            .collect()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|value| seen.insert(*value)).collect()
}

/// Returns why `svg` cannot be embedded verbatim, if it cannot.
pub fn unsafe_markup(svg: &str) -> Option<&'static str> {
    let lowered = svg.to_ascii_lowercase();
    if lowered.contains("<script") {
        return Some("script element");
    }
    if lowered.contains("javascript:") {
        return Some("javascript url");
    }
    if has_inline_handler(lowered.as_bytes()) {
        return Some("inline event handler");
    }
    None
}

// matches `on<letters><ws>*=` where the preceding byte cannot continue an attribute name
fn has_inline_handler(bytes: &[u8]) -> bool {
    for start in 0..bytes.len() {
        if !bytes[start..].starts_with(b"on") {
            continue;
        }
        if start > 0 && continues_name(bytes[start - 1]) {
            continue;
        }
        let mut idx = start + 2;
        let name_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
            idx += 1;
        }
        if idx == name_start {
            continue;
        }
        while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
            idx += 1;
        }
        if bytes.get(idx) == Some(&b'=') {
            return true;
        }
    }
    false
}

fn continues_name(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b':')
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
