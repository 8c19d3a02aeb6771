use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{file_type_label, is_supported, ExtractLimits, SearchConfig};
use crate::discovery::LocationDiscoverer;
use crate::error::FileSearchError;
use crate::extract::TextExtractor;
use crate::matcher::Matcher;
use crate::models::{FileContent, FileRecord, SearchOutcome, SearchRequest, SearchStats, StorageLocation};
use crate::report;
use crate::walker::Walk;

/// Candidates buffered between the walker thread and the analysis pool.
const CANDIDATE_BUFFER: usize = 256;

#[derive(Debug, Default)]
struct WalkTally {
    files_scanned: usize,
    directories_scanned: usize,
    skipped_files: usize,
}

pub struct FileSearchSystem {
    config: SearchConfig,
    matcher: Arc<Matcher>,
    discoverer: LocationDiscoverer,
}

impl FileSearchSystem {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_discoverer(config, LocationDiscoverer::native())
    }

    pub fn with_discoverer(config: SearchConfig, discoverer: LocationDiscoverer) -> Self {
        let matcher = Arc::new(Matcher::new(TextExtractor::new(ExtractLimits::default())));
        Self {
            config,
            matcher,
            discoverer,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn discover_locations(&self) -> Vec<StorageLocation> {
        self.discoverer.discover()
    }

    /// Walks every root, analyses candidates on a bounded blocking pool and
    /// returns matching records in walk order. Missing roots contribute nothing.
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        self.search_with_cancel(request, CancellationToken::new()).await
    }

    /// [`search`](Self::search) that stops early once `cancel` fires, either
    /// from the caller or from the configured deadline. Files already analysed
    /// are kept and `cancelled` is set in the stats.
    pub async fn search_with_cancel(
        &self,
        request: &SearchRequest,
        cancel: CancellationToken,
    ) -> SearchOutcome {
        let deadline = self.config.deadline.map(|deadline| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                cancel.cancel();
            })
        });

        let (tx, mut rx) = mpsc::channel::<(usize, PathBuf)>(CANDIDATE_BUFFER);
        let roots = request.roots.clone();
        let walk_cancel = cancel.clone();
        let walker =
            tokio::task::spawn_blocking(move || walk_candidates(&roots, &walk_cancel, tx));

        let terms: Arc<[String]> = request.terms.clone().into();
        let semaphore = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut tasks = JoinSet::new();

        while let Some((index, path)) = rx.recv().await {
            if cancel.is_cancelled() {
                break;
            }
            let permit = tokio::select! {
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
                _ = cancel.cancelled() => break,
            };

            let matcher = Arc::clone(&self.matcher);
            let terms = Arc::clone(&terms);
            let cancel = cancel.clone();
            let include_content = request.include_content;
            let deep = request.deep;
            tasks.spawn_blocking(move || {
                let _permit = permit;
                let record = matcher.analyze(&path, &terms, include_content, deep, &cancel);
                (index, record)
            });
        }
        // Unblocks the walker if we stopped early.
        drop(rx);

        let mut indexed: Vec<(usize, FileRecord)> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(record))) => indexed.push((index, record)),
                Ok((_, None)) => {}
                Err(err) => warn!(error = %err, "File analysis task failed"),
            }
        }
        indexed.sort_by_key(|(index, _)| *index);
        let records: Vec<FileRecord> = indexed.into_iter().map(|(_, record)| record).collect();

        let tally = match walker.await {
            Ok(tally) => tally,
            Err(err) => {
                warn!(error = %err, "Directory walk task failed");
                WalkTally::default()
            }
        };

        let cancelled = cancel.is_cancelled();
        if let Some(handle) = deadline {
            handle.abort();
        }

        let stats = SearchStats {
            files_scanned: tally.files_scanned,
            directories_scanned: tally.directories_scanned,
            matching_files: records.len(),
            skipped_files: tally.skipped_files,
            terms_used: request.terms.clone(),
            deep_search_enabled: request.deep,
            cancelled,
        };
        info!(
            files = stats.files_scanned,
            matches = stats.matching_files,
            skipped = stats.skipped_files,
            cancelled,
            "Search finished"
        );

        SearchOutcome { records, stats }
    }

    pub fn format_for_llm(&self, records: &[FileRecord], terms: &[String]) -> String {
        report::format_for_llm(records, terms)
    }

    /// Non-deep text of a single regular file, without match filtering.
    pub async fn get_file_content(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<FileContent, FileSearchError> {
        let path = path.as_ref().to_path_buf();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Err(FileSearchError::NotFound(path)),
        };

        let matcher = Arc::clone(&self.matcher);
        let extract_path = path.clone();
        let content = tokio::task::spawn_blocking(move || {
            matcher
                .extractor()
                .extract(&extract_path, false, &CancellationToken::new())
        })
        .await
        .unwrap_or_default();

        Ok(FileContent {
            path: path.to_string_lossy().to_string(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            size_bytes: metadata.len(),
            file_type: file_type_label(&path),
            content,
        })
    }
}

/// Runs on a blocking thread; sends candidates with their walk index.
fn walk_candidates(
    roots: &[PathBuf],
    cancel: &CancellationToken,
    tx: mpsc::Sender<(usize, PathBuf)>,
) -> WalkTally {
    let mut tally = WalkTally::default();
    let mut next_index = 0;

    for root in roots {
        if !root.exists() {
            debug!(root = %root.display(), "Search root does not exist");
            continue;
        }
        let mut walk = Walk::new(root).with_cancel(cancel.clone());
        let mut stopped = false;
        for path in walk.by_ref() {
            if cancel.is_cancelled() {
                stopped = true;
                break;
            }
            tally.files_scanned += 1;
            if !is_supported(&path) {
                tally.skipped_files += 1;
                continue;
            }
            if tx.blocking_send((next_index, path)).is_err() {
                stopped = true;
                break;
            }
            next_index += 1;
        }
        tally.directories_scanned += walk.directories_scanned();
        if stopped || cancel.is_cancelled() {
            break;
        }
    }

    tally
}
