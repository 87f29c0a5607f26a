//! Keeps the catalog consistent with the managed store directory.
//!
//! Files dropped into the store by hand (bypassing ingestion) become
//! searchable through reconciliation, which runs before every search or
//! match and can also be invoked on its own.

use std::path::{Path, PathBuf};
use timbra_core::{model, Catalog};
use walkdir::WalkDir;

use crate::error::Result;

/// Recursively collect supported audio files under a directory.
///
/// Paths are lexically absolutized, sorted, and deduplicated.
#[must_use]
pub fn scan_store(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| model::is_audio_file(path))
        .filter_map(|path| std::path::absolute(&path).ok())
        .collect();
    files.sort();
    files.dedup();
    files
}

/// Register every scanned audio file not yet present in the catalog.
///
/// The display name defaults to the file stem. Returns the number of
/// newly registered paths. Rows for files that have since disappeared
/// are left alone; they surface as absent fingerprints at comparison
/// time.
pub fn reconcile(catalog: &Catalog, store_dir: &Path) -> Result<usize> {
    let mut added = 0;
    for path in scan_store(store_dir) {
        let name = model::display_name(&path);
        if catalog.register(&name, &path)? {
            log::debug!("registered {}", path.display());
            added += 1;
        }
    }
    if added > 0 {
        log::info!("reconcile: {added} new files registered");
    }
    Ok(added)
}
