use anyhow::Result;
use std::path::Path;
use timbra_core::Catalog;
use timbra_engine::reconcile;

pub fn run_list(catalog: &Catalog, store_dir: &Path) -> Result<()> {
    reconcile(catalog, store_dir)?;

    let entries = catalog.list_all()?;
    if entries.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    for entry in entries {
        println!("  [{}] {} — {}", entry.id, entry.name, entry.path.display());
    }
    Ok(())
}
