use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::config::{extension_of, file_type_label};
use crate::extract::TextExtractor;
use crate::models::FileRecord;

const PREVIEW_ELLIPSIS: &str = "...";

/// Decides whether a candidate file matches and builds its record.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    extractor: TextExtractor,
}

impl Matcher {
    pub fn new(extractor: TextExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    /// Record for `path` if any term hits its name or (optionally) its text.
    /// Stat failures count as "no match".
    pub fn analyze(
        &self,
        path: &Path,
        terms: &[String],
        include_content: bool,
        deep: bool,
        cancel: &CancellationToken,
    ) -> Option<FileRecord> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                trace!(path = %path.display(), error = %err, "Cannot stat candidate");
                return None;
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut matches = Vec::new();
        let name_lower = name.to_lowercase();
        for term in terms {
            if name_lower.contains(&term.to_lowercase()) {
                push_unique(&mut matches, term);
            }
        }

        let mut full_content = String::new();
        let mut content_preview = String::new();
        if include_content || deep {
            let content = self.extractor.extract(path, deep, cancel);
            if !content.is_empty() {
                let content_lower = content.to_lowercase();
                for term in terms {
                    if content_lower.contains(&term.to_lowercase()) {
                        push_unique(&mut matches, term);
                    }
                }
                content_preview = preview(&content, self.extractor.limits().preview_chars);
                full_content = content;
            }
        }

        if matches.is_empty() {
            return None;
        }

        let modified = metadata
            .modified()
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| Local::now());

        Some(FileRecord {
            path: path.to_string_lossy().to_string(),
            name,
            extension: extension_of(path),
            mime_type: mime_guess::from_path(path).first().map(|m| m.to_string()),
            size_bytes: metadata.len(),
            modified,
            file_type: file_type_label(path),
            matches,
            content_preview,
            full_content,
        })
    }
}

fn push_unique(matches: &mut Vec<String>, term: &str) {
    if !matches.iter().any(|existing| existing == term) {
        matches.push(term.to_string());
    }
}

/// First `max_chars` characters, with an ellipsis when anything was cut.
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &content[..cut], PREVIEW_ELLIPSIS),
        None => content.to_string(),
    }
}
