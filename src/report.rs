use chrono::{DateTime, Local};
use std::fmt::Write;

use crate::models::FileRecord;

const MODIFIED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Renders matched files as one text block for an LLM prompt, stamped now.
pub fn format_for_llm(records: &[FileRecord], terms: &[String]) -> String {
    format_for_llm_at(records, terms, Local::now())
}

/// Same as [`format_for_llm`] with an explicit collection timestamp. Records
/// are rendered in the order given.
pub fn format_for_llm_at(
    records: &[FileRecord],
    terms: &[String],
    collected_at: DateTime<Local>,
) -> String {
    let mut output = String::from("=== DOCUMENT COLLECTION ===\n");
    // Writing to a String cannot fail.
    let _ = writeln!(output, "Search Terms: {:?}", terms);
    let _ = writeln!(output, "Total Files: {}", records.len());
    let _ = writeln!(output, "Collection Date: {}\n", collected_at.to_rfc3339());

    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(output, "--- FILE {} ---", i + 1);
        let _ = writeln!(output, "Path: {}", record.path);
        let _ = writeln!(output, "Name: {}", record.name);
        let _ = writeln!(output, "Type: {}", record.file_type);
        let _ = writeln!(output, "Size: {} bytes", record.size_bytes);
        let _ = writeln!(output, "Modified: {}", record.modified.format(MODIFIED_FORMAT));
        let _ = writeln!(output, "Matches: {:?}\n", record.matches);

        if record.full_content.is_empty() {
            output.push_str("Content: [Unable to extract text content]\n\n");
        } else {
            output.push_str("Content:\n");
            output.push_str(&record.full_content);
            output.push_str("\n\n");
        }
    }

    output.push_str("=== END COLLECTION ===\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(name: &str, content: &str) -> FileRecord {
        FileRecord {
            path: format!("/docs/{name}"),
            name: name.to_string(),
            extension: Some("txt".to_string()),
            mime_type: Some("text/plain".to_string()),
            size_bytes: content.len() as u64,
            modified: Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            file_type: "Text File".to_string(),
            matches: vec!["hello".to_string()],
            content_preview: content.to_string(),
            full_content: content.to_string(),
        }
    }

    fn without_timestamp(report: &str) -> Vec<&str> {
        report
            .lines()
            .filter(|line| !line.starts_with("Collection Date:"))
            .collect()
    }

    #[test]
    fn test_sections_follow_record_order() {
        let records = vec![record("b.txt", "hello b"), record("a.txt", "")];
        let terms = vec!["hello".to_string()];
        let report = format_for_llm(&records, &terms);

        assert!(report.starts_with("=== DOCUMENT COLLECTION ===\nSearch Terms: [\"hello\"]\nTotal Files: 2\n"));
        let first = report.find("--- FILE 1 ---\nPath: /docs/b.txt").unwrap();
        let second = report.find("--- FILE 2 ---\nPath: /docs/a.txt").unwrap();
        assert!(first < second);
        assert!(report.contains("Modified: 2024-03-01T09:30:00\n"));
        assert!(report.contains("Content:\nhello b\n\n"));
        assert!(report.contains("Content: [Unable to extract text content]\n"));
        assert!(report.ends_with("=== END COLLECTION ===\n"));
    }

    #[test]
    fn test_output_is_stable_apart_from_timestamp() {
        let records = vec![record("a.txt", "hello a")];
        let terms = vec!["hello".to_string()];
        let first = format_for_llm(&records, &terms);
        let earlier = Local.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let second = format_for_llm_at(&records, &terms, earlier);

        assert_eq!(without_timestamp(&first), without_timestamp(&second));
        assert_ne!(first, second);
    }
}
