use anyhow::Result;
use std::path::Path;
use timbra_core::Catalog;
use timbra_engine::reconcile;

pub fn run_sync(catalog: &Catalog, store_dir: &Path) -> Result<()> {
    let added = reconcile(catalog, store_dir)?;
    println!("Added {added} new files to the catalog.");
    Ok(())
}
