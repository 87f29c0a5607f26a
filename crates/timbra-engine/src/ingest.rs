//! Ingestion of uploaded audio files and zip archives into the store.

use std::io::Read;
use std::path::{Path, PathBuf};
use timbra_core::model;

use crate::error::{Error, Result};

/// macOS zip metadata folder; its entries are never audio.
const MACOS_METADATA_PREFIX: &str = "__MACOSX/";

/// Find a free path by appending `_1`, `_2`, ... before the extension.
///
/// Never overwrites: the counter increments until an unused name is
/// found.
#[must_use]
pub fn unique_path(target: &Path) -> PathBuf {
    if !target.exists() {
        return target.to_path_buf();
    }

    let parent = target.parent().unwrap_or_else(|| Path::new(""));
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = target.extension().map(|e| e.to_string_lossy().into_owned());

    let mut counter = 1;
    loop {
        let file_name = match &ext {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        let candidate = parent.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Writes uploaded content into the managed store directory.
#[derive(Debug)]
pub struct Ingestor {
    store_dir: PathBuf,
}

impl Ingestor {
    /// Create an ingestor, creating the store directory if needed.
    pub fn new(store_dir: impl Into<PathBuf>) -> Result<Self> {
        let store_dir = store_dir.into();
        std::fs::create_dir_all(&store_dir)?;
        Ok(Self { store_dir })
    }

    #[must_use]
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Write bytes into the store under the item's base name, with
    /// collision-safe renaming. Returns the absolute stored path.
    pub fn store_bytes(&self, original_name: &str, data: &[u8]) -> Result<PathBuf> {
        let base = Path::new(original_name)
            .file_name()
            .ok_or_else(|| Error::InvalidName(original_name.to_owned()))?;

        let dest = unique_path(&self.store_dir.join(base));
        std::fs::write(&dest, data)?;
        Ok(std::path::absolute(&dest)?)
    }

    /// Extract every supported audio entry of a zip archive into the
    /// store.
    ///
    /// Directory entries, macOS metadata entries, entries with empty
    /// base names, and non-audio entries are skipped silently. A
    /// corrupt entry is logged and skipped; it never aborts the rest of
    /// the archive.
    pub fn extract_archive(&self, zip_path: &Path) -> Result<Vec<PathBuf>> {
        let file = std::fs::File::open(zip_path)?;
        let mut archive = zip::ZipArchive::new(file)?;

        let mut stored = Vec::new();
        for i in 0..archive.len() {
            let mut entry = match archive.by_index(i) {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping archive entry {i}: {e}");
                    continue;
                }
            };

            let raw_name = entry.name().to_owned();
            if entry.is_dir() || raw_name.starts_with(MACOS_METADATA_PREFIX) {
                continue;
            }

            let Some(base) = Path::new(&raw_name)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };
            if !model::has_audio_extension(&base) {
                continue;
            }

            let mut data = Vec::new();
            if let Err(e) = entry.read_to_end(&mut data) {
                log::warn!("skipping archive entry {raw_name}: {e}");
                continue;
            }

            match self.store_bytes(&base, &data) {
                Ok(path) => stored.push(path),
                Err(e) => log::warn!("skipping archive entry {raw_name}: {e}"),
            }
        }

        Ok(stored)
    }

    /// Ingest one local item: a supported audio file is copied into the
    /// store, a zip archive has its audio entries extracted. Anything
    /// else is logged and yields no stored paths.
    pub fn ingest_path(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidName(path.display().to_string()))?;

        if name.to_lowercase().ends_with(".zip") {
            return self.extract_archive(path);
        }

        if model::has_audio_extension(name) {
            let data = std::fs::read(path)?;
            return Ok(vec![self.store_bytes(name, &data)?]);
        }

        log::warn!(
            "skipping {}: not a supported audio file or zip archive",
            path.display()
        );
        Ok(Vec::new())
    }
}
