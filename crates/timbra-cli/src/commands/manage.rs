use anyhow::Result;
use std::path::Path;
use timbra_core::Catalog;
use timbra_engine::scan_store;

pub fn run_clear_catalog(catalog: &Catalog, yes: bool) -> Result<()> {
    if !yes {
        println!("Refusing to clear the catalog without --yes.");
        return Ok(());
    }

    let removed = catalog.clear()?;
    println!("Removed {removed} catalog entries.");
    Ok(())
}

pub fn run_purge_store(store_dir: &Path, yes: bool) -> Result<()> {
    if !yes {
        println!("Refusing to delete store files without --yes.");
        return Ok(());
    }

    let mut deleted = 0;
    for path in scan_store(store_dir) {
        match std::fs::remove_file(&path) {
            Ok(()) => deleted += 1,
            Err(e) => log::warn!("could not delete {}: {e}", path.display()),
        }
    }
    println!("Deleted {deleted} audio files from the store.");
    Ok(())
}
