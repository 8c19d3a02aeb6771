use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::trace;
use zip::ZipArchive;

use super::ExtractContext;
use crate::error::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Body paragraphs in document order. Deep mode adds table rows (cells
/// tab-joined) and then header and footer paragraphs.
pub(super) fn extract(path: &Path, ctx: &ExtractContext<'_>) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let document = parse_part(&read_part(&mut archive, DOCUMENT_PART)?)?;

    let mut text = String::new();
    for paragraph in &document.paragraphs {
        text.push_str(paragraph);
        text.push('\n');
    }

    if !ctx.deep {
        return Ok(text);
    }

    for row in document.tables.iter().flatten() {
        text.push_str(&row.join("\t"));
        text.push('\n');
    }

    // A broken header must not cost us the body text gathered above.
    for name in header_footer_parts(&archive) {
        if ctx.cancel.is_cancelled() {
            break;
        }
        match read_part(&mut archive, &name).and_then(|xml| parse_part(&xml)) {
            Ok(part) => {
                for paragraph in &part.paragraphs {
                    text.push_str(paragraph);
                    text.push('\n');
                }
            }
            Err(err) => trace!(part = %name, error = %err, "Skipping unreadable DOCX part"),
        }
    }

    Ok(text)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, ExtractError> {
    let mut xml = String::new();
    archive.by_name(name)?.read_to_string(&mut xml)?;
    Ok(xml)
}

/// `word/header*.xml` then `word/footer*.xml`, each group in name order.
fn header_footer_parts<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    let mut headers = Vec::new();
    let mut footers = Vec::new();
    for name in archive.file_names() {
        if !name.ends_with(".xml") {
            continue;
        }
        if name.starts_with("word/header") {
            headers.push(name.to_string());
        } else if name.starts_with("word/footer") {
            footers.push(name.to_string());
        }
    }
    headers.sort();
    footers.sort();
    headers.extend(footers);
    headers
}

/// Text structure of one WordprocessingML part.
#[derive(Debug, Default)]
struct WordPart {
    /// Paragraphs outside any table.
    paragraphs: Vec<String>,
    /// Top-level tables as rows of cell text.
    tables: Vec<Vec<Vec<String>>>,
}

#[derive(Default)]
struct PartBuilder {
    part: WordPart,
    table_depth: usize,
    in_text: bool,
    /// Open paragraphs, innermost last. Text boxes nest a paragraph inside
    /// the run of another.
    open_paragraphs: Vec<String>,
    cell_paragraphs: Vec<String>,
    row: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl PartBuilder {
    fn start(&mut self, element: &BytesStart<'_>) {
        match element.local_name().as_ref() {
            b"tbl" => self.table_depth += 1,
            b"p" => self.open_paragraphs.push(String::new()),
            b"t" => self.in_text = true,
            _ => {}
        }
    }

    fn end(&mut self, local_name: &[u8]) {
        match local_name {
            b"t" => self.in_text = false,
            b"p" => {
                if let Some(paragraph) = self.open_paragraphs.pop() {
                    self.finish_paragraph(paragraph);
                }
            }
            b"tc" if self.table_depth == 1 => {
                let cell = std::mem::take(&mut self.cell_paragraphs).join("\n");
                self.row.push(cell);
            }
            b"tr" if self.table_depth == 1 => {
                let row = std::mem::take(&mut self.row);
                self.rows.push(row);
            }
            b"tbl" => {
                if self.table_depth == 1 {
                    let rows = std::mem::take(&mut self.rows);
                    self.part.tables.push(rows);
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn empty(&mut self, element: &BytesStart<'_>) {
        match element.local_name().as_ref() {
            b"p" => self.finish_paragraph(String::new()),
            b"tab" => self.push_to_paragraph("\t"),
            b"br" | b"cr" => self.push_to_paragraph("\n"),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text {
            self.push_to_paragraph(text);
        }
    }

    fn push_to_paragraph(&mut self, text: &str) {
        if let Some(paragraph) = self.open_paragraphs.last_mut() {
            paragraph.push_str(text);
        }
    }

    /// A nested (text box) paragraph lands before the paragraph anchoring it.
    fn finish_paragraph(&mut self, paragraph: String) {
        if self.table_depth == 0 {
            self.part.paragraphs.push(paragraph);
        } else {
            self.cell_paragraphs.push(paragraph);
        }
    }
}

fn parse_part(xml: &str) -> Result<WordPart, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut builder = PartBuilder::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => builder.start(e),
            Event::End(ref e) => builder.end(e.local_name().as_ref()),
            Event::Empty(ref e) => builder.empty(e),
            Event::Text(e) => builder.text(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(builder.part)
}
