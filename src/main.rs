use anyhow::Result;
use file_discovery::{FileSearchSystem, SearchConfig, SearchRequest};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Usage: file-discovery [--deep] [--json] <term>... [-- <root>...]
    let mut deep = false;
    let mut json = false;
    let mut terms = Vec::new();
    let mut roots = Vec::new();
    let mut in_roots = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--deep" => deep = true,
            "--json" => json = true,
            "--" => in_roots = true,
            _ if in_roots => roots.push(PathBuf::from(arg)),
            _ => terms.push(arg),
        }
    }

    let system = FileSearchSystem::new(SearchConfig::default().with_deadline(Duration::from_secs(300)));

    let locations = system.discover_locations();
    println!("Storage locations:");
    for location in &locations {
        println!(
            "  [{:?}] {} -> {}{}",
            location.kind,
            location.name,
            location.path.display(),
            if location.accessible { "" } else { " (inaccessible)" }
        );
    }

    if roots.is_empty() {
        if let Some(documents) = dirs::document_dir() {
            roots.push(documents);
        }
    }

    let request = SearchRequest::new(roots, terms).with_deep(deep);
    request.validate()?;

    let outcome = system.search(&request).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", system.format_for_llm(&outcome.records, &request.terms));
    }

    Ok(())
}
