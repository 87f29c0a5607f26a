use anyhow::Result;
use std::path::{Path, PathBuf};
use timbra_core::{model, Catalog};
use timbra_engine::{scan_store, Ingestor};

pub fn run_add(catalog: &Catalog, store_dir: &Path, paths: &[PathBuf]) -> Result<()> {
    let ingestor = Ingestor::new(store_dir)?;

    let mut stored_all: Vec<PathBuf> = Vec::new();
    for path in paths {
        match ingestor.ingest_path(path) {
            Ok(stored) => stored_all.extend(stored),
            // One bad input never discards the rest of the batch.
            Err(e) => log::warn!("failed to ingest {}: {e}", path.display()),
        }
    }

    let mut registered = 0;
    for path in &stored_all {
        if catalog.register(&model::display_name(path), path)? {
            registered += 1;
        }
    }

    println!(
        "Saved {} files. Registered {} new entries.",
        stored_all.len(),
        registered
    );
    println!(
        "Store now holds {} audio files.",
        scan_store(store_dir).len()
    );
    Ok(())
}
