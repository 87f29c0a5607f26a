use anyhow::Result;
use std::path::Path;
use timbra_core::Catalog;
use timbra_engine::scan_store;

pub fn run_status(catalog: &Catalog, db_path: &Path, store_dir: &Path) -> Result<()> {
    println!("\nTimbra Status\n");
    println!("  Database: {}", db_path.display());
    println!("  Store:    {}", store_dir.display());
    println!("  Registered entries:    {}", catalog.count()?);
    println!("  Audio files in store:  {}", scan_store(store_dir).len());
    Ok(())
}
