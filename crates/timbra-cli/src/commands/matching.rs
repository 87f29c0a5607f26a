use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use timbra_core::{model, Catalog};
use timbra_engine::{rank, reconcile, scan_store, CandidateSet, FingerprintConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MatchSource {
    /// Catalog rows only
    Catalog,
    /// Live store scan only
    Store,
    /// Union of both, deduplicated by path
    Both,
}

#[derive(Debug)]
pub struct MatchOptions {
    pub against: MatchSource,
    pub top_k: usize,
    pub threshold: f64,
    pub json: bool,
}

pub fn run_match(
    catalog: &Catalog,
    store_dir: &Path,
    query: &Path,
    options: &MatchOptions,
) -> Result<()> {
    reconcile(catalog, store_dir)?;

    // A stdin query is spooled to a scoped temp file; the guard's drop
    // removes it on every exit path, including errors.
    let mut stdin_guard = None;
    let query_path: PathBuf = if query == Path::new("-") {
        let mut spool = tempfile::Builder::new()
            .prefix("timbra-query-")
            .tempfile()
            .context("Failed to create temporary query file")?;
        let mut bytes = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("Failed to read query audio from stdin")?;
        spool.write_all(&bytes)?;
        spool.flush()?;
        let path = spool.path().to_path_buf();
        stdin_guard = Some(spool);
        path
    } else {
        query.to_path_buf()
    };

    let mut candidates = CandidateSet::new();
    if matches!(options.against, MatchSource::Catalog | MatchSource::Both) {
        for entry in catalog.list_all()? {
            candidates.insert(entry.name, entry.path);
        }
    }
    if matches!(options.against, MatchSource::Store | MatchSource::Both) {
        // Added after the catalog rows: the store scan wins name
        // conflicts for paths known to both.
        for path in scan_store(store_dir) {
            let name = model::display_name(&path);
            candidates.insert(name, path);
        }
    }

    if candidates.is_empty() {
        println!("No candidate files found.");
        return Ok(());
    }

    let cfg = FingerprintConfig::default();
    let outcome = rank(
        &query_path,
        &candidates,
        options.threshold,
        options.top_k,
        &cfg,
    );
    drop(stdin_guard);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if outcome.no_valid_comparisons() {
        println!("No valid comparisons were possible.");
        return Ok(());
    }

    if !outcome.met_threshold {
        println!(
            "No matches within threshold {}; showing closest candidates.",
            options.threshold
        );
    }
    for (idx, result) in outcome.results.iter().enumerate() {
        println!(
            "#{} — {}\n   {}\n   distance = {:.2}",
            idx + 1,
            result.name,
            result.path.display(),
            result.distance
        );
    }
    Ok(())
}
