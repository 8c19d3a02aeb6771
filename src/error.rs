use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileSearchError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a document yielded no text. Never leaves the extractor; callers
/// only ever see the empty string that replaces it.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF extraction error: {0}")]
    Pdf(String),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("CSV error: {0}")]
    Delimited(#[from] csv::Error),
    #[error("No supported encoding could decode the file")]
    Undecodable,
    #[error("Unsupported file type: {0}")]
    Unsupported(String),
    #[error("Extractor panicked")]
    Panicked,
}
