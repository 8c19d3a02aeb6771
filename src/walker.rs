use std::fs;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Lazy recursive listing of the regular files below a root.
///
/// Unreadable directories are logged and skipped; the walk carries on with
/// their siblings. A missing root simply yields nothing. Symlinks to files
/// are yielded, symlinked directories are not descended into.
pub struct Walk {
    inner: walkdir::IntoIter,
    directories: usize,
    cancel: Option<CancellationToken>,
}

impl Walk {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            inner: WalkDir::new(root).into_iter(),
            directories: 0,
            cancel: None,
        }
    }

    /// Ends the walk at the next entry once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Directories entered so far, the root included.
    pub fn directories_scanned(&self) -> usize {
        self.directories
    }
}

impl Iterator for Walk {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            if self.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
                return None;
            }
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(
                        path = ?err.path(),
                        error = %err,
                        "Skipping inaccessible entry"
                    );
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                self.directories += 1;
            } else if file_type.is_file() || is_file_link(&entry) {
                return Some(entry.into_path());
            }
        }
    }
}

fn is_file_link(entry: &DirEntry) -> bool {
    entry.path_is_symlink()
        && fs::metadata(entry.path())
            .map(|meta| meta.is_file())
            .unwrap_or(false)
}

pub fn walk(root: impl AsRef<Path>) -> Walk {
    Walk::new(root)
}
