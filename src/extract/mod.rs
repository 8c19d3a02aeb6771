//! Format-specific conversion of documents into plain text.
//!
//! Every strategy returns `Result<String, ExtractError>`, but the error never
//! leaves this module: [`TextExtractor::extract`] logs it and answers with an
//! empty string, which callers read as "no content available".

mod delimited;
mod docx;
mod pdf;
mod spreadsheet;
mod text;

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::{extension_of, ExtractLimits};
use crate::error::ExtractError;

/// Shared knobs for one extraction call.
pub(crate) struct ExtractContext<'a> {
    pub deep: bool,
    pub limits: &'a ExtractLimits,
    pub cancel: &'a CancellationToken,
}

impl ExtractContext<'_> {
    /// `cap` unless deep search lifts it.
    fn cap(&self, cap: usize) -> usize {
        if self.deep {
            usize::MAX
        } else {
            cap
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    limits: ExtractLimits,
}

impl TextExtractor {
    pub fn new(limits: ExtractLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ExtractLimits {
        &self.limits
    }

    /// Best-effort text of `path`. Empty when the format is unsupported or
    /// the file cannot be read or decoded.
    pub fn extract(&self, path: &Path, deep: bool, cancel: &CancellationToken) -> String {
        let ctx = ExtractContext {
            deep,
            limits: &self.limits,
            cancel,
        };

        // Parsers for binary formats can panic on malformed input.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_extract(path, &ctx)))
            .unwrap_or(Err(ExtractError::Panicked));

        match outcome {
            Ok(text) => text,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "Extraction yielded no content");
                String::new()
            }
        }
    }

    fn try_extract(&self, path: &Path, ctx: &ExtractContext<'_>) -> Result<String, ExtractError> {
        let extension = extension_of(path).unwrap_or_default();
        match extension.as_str() {
            "txt" | "md" | "py" | "js" | "html" | "css" | "json" | "xml" | "yaml" | "yml" => {
                text::read_text_file(path)
            }
            "pdf" => pdf::extract(path, ctx),
            "docx" => docx::extract(path, ctx),
            "xlsx" | "xls" => spreadsheet::extract(path, ctx),
            "csv" => delimited::extract(path),
            _ => Err(ExtractError::Unsupported(extension)),
        }
    }
}

/// Non-deep extraction with the default limits and no cancellation.
pub fn extract_text(path: &Path, deep: bool) -> String {
    TextExtractor::default().extract(path, deep, &CancellationToken::new())
}

#[cfg(test)]
pub(crate) mod fixtures;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_corrupt_documents_yield_empty_text() -> Result<()> {
        let dir = TempDir::new()?;
        for name in ["broken.pdf", "broken.docx", "broken.xlsx"] {
            let path = dir.path().join(name);
            fs::write(&path, b"this is not the format you are looking for")?;
            assert_eq!(extract_text(&path, false), "", "{name}");
            assert_eq!(extract_text(&path, true), "", "{name}");
        }
        Ok(())
    }

    #[test]
    fn test_formats_without_strategy_are_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("slides.pptx");
        fs::write(&path, "hello")?;
        assert_eq!(extract_text(&path, true), "");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_empty() {
        assert_eq!(extract_text(Path::new("/no/such/file.txt"), false), "");
    }

    #[test]
    fn test_csv_rows_are_tab_joined() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("people.csv");
        fs::write(&path, "name,city\n\"Doe, Jane\",Oslo\n")?;
        assert_eq!(extract_text(&path, false), "name\tcity\nDoe, Jane\tOslo\n");
        Ok(())
    }
}
