use std::path::Path;
use std::time::Duration;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "txt", "md", "rtf", "pdf", "docx", "doc", "odt", "xlsx", "xls", "csv", "pptx", "ppt", "py",
    "js", "html", "css", "json", "xml", "yaml", "yml",
];

/// Mount names on macOS that belong to the system, not to the user.
pub const SYSTEM_VOLUMES: &[&str] = &["Macintosh HD", "Preboot", "Recovery", "VM", "Data"];

pub const LINUX_MOUNT_ROOTS: &[&str] = &["/media", "/mnt", "/run/media"];

pub const MACOS_VOLUMES_ROOT: &str = "/Volumes";

/// Lowercased extension without the dot.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

pub fn is_supported(path: &Path) -> bool {
    extension_of(path).map_or(false, |ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

pub fn file_type_label(path: &Path) -> String {
    let extension = extension_of(path).unwrap_or_default();
    let label = match extension.as_str() {
        "pdf" => "PDF Document",
        "docx" => "Word Document",
        "doc" => "Word Document (Legacy)",
        "txt" => "Text File",
        "md" => "Markdown File",
        "xlsx" => "Excel Spreadsheet",
        "xls" => "Excel Spreadsheet (Legacy)",
        "csv" => "CSV File",
        "py" => "Python Script",
        "js" => "JavaScript File",
        "html" => "HTML File",
        "css" => "CSS File",
        "json" => "JSON File",
        "" => return " File".to_string(),
        other => return format!(".{} File", other.to_uppercase()),
    };
    label.to_string()
}

/// Caps applied to extraction unless a deep search lifts them. Searches
/// always run with the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    pub pdf_pages: usize,
    pub sheets: usize,
    pub rows_per_sheet: usize,
    pub preview_chars: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            pdf_pages: 10,
            sheets: 3,
            rows_per_sheet: 100,
            preview_chars: 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub workers: usize,
    pub deadline: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            deadline: None,
        }
    }
}

impl SearchConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}
