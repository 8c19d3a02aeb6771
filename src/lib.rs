//! Finds files under chosen roots whose name or extracted text contains any
//! of a set of terms, and renders the hits as a single report.

pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod models;
pub mod report;
pub mod search;
pub mod walker;

pub use config::{ExtractLimits, SearchConfig, SUPPORTED_EXTENSIONS};
pub use discovery::{LocationDiscoverer, PlatformProber};
pub use error::{ExtractError, FileSearchError};
pub use extract::{extract_text, TextExtractor};
pub use matcher::Matcher;
pub use models::{
    FileContent, FileRecord, LocationKind, SearchOutcome, SearchRequest, SearchStats,
    StorageLocation,
};
pub use report::format_for_llm;
pub use search::FileSearchSystem;
