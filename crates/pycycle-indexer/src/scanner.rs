//! Source file discovery

use crate::config::IgnoreSet;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Files found by [`collect_sources`], in walk order.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub files: Vec<PathBuf>,
    /// The deadline passed before the walk finished.
    pub truncated: bool,
    /// Entries the walker could not read.
    pub skipped: usize,
}

/// Walk `root` for files with `extension`, skipping ignored names.
///
/// Within a directory, files come before subdirectories and both are sorted
/// by name, so the first file of the top directory is always first.
pub fn collect_sources(
    root: &Path,
    ignores: &IgnoreSet,
    extension: &str,
    deadline: Option<Duration>,
) -> ScanOutcome {
    let started = Instant::now();
    let filter = ignores.clone();

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_path(|a, b| (a.is_dir(), a.file_name()).cmp(&(b.is_dir(), b.file_name())))
        .filter_entry(move |entry| entry.depth() == 0 || !filter.is_ignored(entry.file_name()))
        .build();

    let mut outcome = ScanOutcome::default();
    for entry in walker {
        if let Some(limit) = deadline {
            if started.elapsed() > limit {
                tracing::warn!(
                    "Scan deadline of {:?} exceeded after {} files; results are partial",
                    limit,
                    outcome.files.len()
                );
                outcome.truncated = true;
                break;
            }
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                outcome.skipped += 1;
                continue;
            }
        };

        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        let matches = entry.path().extension().is_some_and(|ext| ext == extension);
        if is_file && matches {
            outcome.files.push(entry.into_path());
        }
    }

    tracing::debug!(
        "Found {} source files under {} in {:?}",
        outcome.files.len(),
        root.display(),
        started.elapsed()
    );
    outcome
}
