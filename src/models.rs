use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::FileSearchError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Local,
    Cloud,
    External,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    pub name: String,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub accessible: bool,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SearchRequest {
    pub roots: Vec<PathBuf>,
    pub terms: Vec<String>,
    #[serde(default = "default_include_content")]
    pub include_content: bool,
    #[serde(default)]
    pub deep: bool,
}

fn default_include_content() -> bool {
    true
}

impl SearchRequest {
    pub fn new<P, T>(roots: impl IntoIterator<Item = P>, terms: impl IntoIterator<Item = T>) -> Self
    where
        P: Into<PathBuf>,
        T: Into<String>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            terms: terms.into_iter().map(Into::into).collect(),
            include_content: true,
            deep: false,
        }
    }

    pub fn with_content(mut self, include_content: bool) -> Self {
        self.include_content = include_content;
        self
    }

    pub fn with_deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    /// Boundary check for adapters: there must be at least one root and one
    /// non-blank term before a search is started.
    pub fn validate(&self) -> Result<(), FileSearchError> {
        if self.roots.is_empty() {
            return Err(FileSearchError::InvalidRequest(
                "No search paths provided".to_string(),
            ));
        }
        if self.terms.iter().all(|term| term.trim().is_empty()) {
            return Err(FileSearchError::InvalidRequest(
                "No search terms provided".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FileRecord {
    pub path: String,
    pub name: String,
    pub extension: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub modified: DateTime<Local>,
    #[serde(rename = "type")]
    pub file_type: String,
    pub matches: Vec<String>,
    pub content_preview: String,
    pub full_content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub files_scanned: usize,
    pub directories_scanned: usize,
    pub matching_files: usize,
    pub skipped_files: usize,
    pub terms_used: Vec<String>,
    pub deep_search_enabled: bool,
    pub cancelled: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SearchOutcome {
    pub records: Vec<FileRecord>,
    pub stats: SearchStats,
}

/// Single-file inspection result, bypassing the match filter.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FileContent {
    pub path: String,
    pub name: String,
    pub size_bytes: u64,
    #[serde(rename = "type")]
    pub file_type: String,
    pub content: String,
}
