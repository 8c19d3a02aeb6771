use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, trace};

use super::ExtractContext;
use crate::error::ExtractError;

/// Page text via `lopdf`, falling back to `pdf-extract` when the document
/// cannot be loaded or no page decodes.
pub(super) fn extract(path: &Path, ctx: &ExtractContext<'_>) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;
    let max_pages = ctx.cap(ctx.limits.pdf_pages);

    let primary = panic::catch_unwind(AssertUnwindSafe(|| extract_pages(&bytes, max_pages, ctx)))
        .unwrap_or(Err(ExtractError::Panicked));

    match primary {
        Ok(text) => Ok(text),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Primary PDF parser failed, falling back");
            extract_with_fallback(&bytes, max_pages, ctx)
        }
    }
}

fn extract_pages(
    bytes: &[u8],
    max_pages: usize,
    ctx: &ExtractContext<'_>,
) -> Result<String, ExtractError> {
    let document =
        lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut text = String::new();
    let mut attempted = 0;
    let mut failed = 0;

    for page_number in document.get_pages().into_keys().take(max_pages) {
        if ctx.cancel.is_cancelled() {
            break;
        }
        attempted += 1;
        match document.extract_text(&[page_number]) {
            Ok(page_text) => {
                if !page_text.is_empty() {
                    text.push_str(&page_text);
                    text.push('\n');
                }
            }
            Err(err) => {
                failed += 1;
                trace!(page = page_number, error = %err, "Skipping unreadable PDF page");
            }
        }
    }

    if attempted > 0 && failed == attempted {
        return Err(ExtractError::Pdf(format!(
            "none of {} pages could be decoded",
            attempted
        )));
    }
    Ok(text)
}

fn extract_with_fallback(
    bytes: &[u8],
    max_pages: usize,
    ctx: &ExtractContext<'_>,
) -> Result<String, ExtractError> {
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ExtractError::Panicked)?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut text = String::new();
    for page_text in pages.into_iter().take(max_pages) {
        if ctx.cancel.is_cancelled() {
            break;
        }
        text.push_str(&page_text);
        text.push('\n');
    }
    Ok(text)
}
