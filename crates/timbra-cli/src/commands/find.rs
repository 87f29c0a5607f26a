use anyhow::Result;
use std::path::Path;
use timbra_core::Catalog;
use timbra_engine::reconcile;

pub fn run_find(catalog: &Catalog, store_dir: &Path, name: &str) -> Result<()> {
    let fragment = name.trim();
    if fragment.is_empty() {
        println!("Enter a name to search.");
        return Ok(());
    }

    // Pick up files dropped into the store since the last run.
    reconcile(catalog, store_dir)?;

    let entries = catalog.search(fragment)?;
    if entries.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} matches:", entries.len());
    for entry in entries {
        println!("  [{}] {} — {}", entry.id, entry.name, entry.path.display());
    }
    Ok(())
}
