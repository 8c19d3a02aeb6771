use calamine::{open_workbook_auto, Reader};
use std::path::Path;
use tracing::trace;

use super::ExtractContext;
use crate::error::ExtractError;

/// Cached cell values, one `Sheet: <name>` block per sheet. Cells are laid
/// out from column A and the row cap counts from row 1, whatever the used
/// range of the sheet is.
pub(super) fn extract(path: &Path, ctx: &ExtractContext<'_>) -> Result<String, ExtractError> {
    let mut workbook = open_workbook_auto(path)?;
    let max_sheets = ctx.cap(ctx.limits.sheets);
    let max_rows = ctx.cap(ctx.limits.rows_per_sheet);

    let mut text = String::new();
    for sheet_name in workbook.sheet_names().into_iter().take(max_sheets) {
        if ctx.cancel.is_cancelled() {
            break;
        }

        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(err) => {
                trace!(sheet = %sheet_name, error = %err, "Skipping unreadable sheet");
                continue;
            }
        };

        // calamine ranges start at the first used cell, not at A1.
        let (first_row, first_col) = range.start().unwrap_or((0, 0));
        let leading = vec![String::new(); first_col as usize];

        text.push_str(&format!("Sheet: {}\n", sheet_name));
        for row in range.rows().take(max_rows.saturating_sub(first_row as usize)) {
            if ctx.cancel.is_cancelled() {
                break;
            }
            let row_text = leading
                .iter()
                .cloned()
                .chain(row.iter().map(|cell| cell.to_string()))
                .collect::<Vec<_>>()
                .join("\t");
            if !row_text.trim().is_empty() {
                text.push_str(&row_text);
                text.push('\n');
            }
        }
        text.push('\n');
    }

    Ok(text)
}
