use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "timbra", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the catalog database (default: ~/.local/share/timbra/timbra.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Managed audio store directory (default: ~/.local/share/timbra/store)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Ingest audio files or zip archives into the store
    ///
    /// Each argument is either a supported audio file (wav, mp3, ogg,
    /// flac, m4a) or a zip archive. Audio files are copied into the
    /// managed store under their base name; name collisions get a
    /// numeric suffix rather than overwriting. Zip archives have their
    /// audio entries extracted with the same rule, while directory
    /// entries, macOS metadata, and non-audio entries are skipped.
    ///
    /// Every stored file is registered in the catalog under its file
    /// stem as the display label. A failure on one input never aborts
    /// the rest of the batch.
    Add {
        /// Audio files or zip archives to ingest
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Register store files missing from the catalog
    Sync,
    /// Search catalog entries by label substring
    Find {
        /// Label fragment (unanchored, ASCII case-insensitive)
        name: String,
    },
    /// Rank registered samples by acoustic distance to a query
    ///
    /// The query is fingerprinted as a fixed-length cepstral vector and
    /// compared against every candidate by Euclidean distance.
    /// Candidates that cannot be decoded are skipped silently; a stale
    /// catalog row whose file is gone simply drops out of the ranking.
    ///
    /// Results within the threshold are genuine hits. When nothing
    /// passes, the closest candidates are still shown, explicitly
    /// marked as best-effort fallback.
    Match {
        /// Query audio file, or `-` to read audio bytes from stdin
        query: PathBuf,

        /// Candidate sources to rank against
        #[arg(long, value_enum, default_value = "both")]
        against: commands::MatchSource,

        /// Number of results to show
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=10))]
        top_k: u8,

        /// Maximum distance for a genuine match (lower = stricter)
        #[arg(long, default_value_t = 100.0, value_parser = parse_threshold)]
        threshold: f64,

        /// Emit the outcome as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List every catalog entry
    List,
    /// Show catalog and store statistics
    Status,
    /// Delete every catalog entry (the store is untouched)
    ClearCatalog {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Delete every audio file in the store (the catalog is untouched)
    PurgeStore {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err("threshold must be a non-negative number".to_owned());
    }
    Ok(value)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timbra")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let data_dir = default_data_dir();
    let db_path = cli.db.unwrap_or_else(|| data_dir.join("timbra.db"));
    let store_dir = cli.store.unwrap_or_else(|| data_dir.join("store"));

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let catalog = timbra_core::Catalog::open(&db_path)?;

    match cli.command {
        Commands::Add { paths } => {
            commands::run_add(&catalog, &store_dir, &paths)?;
        }
        Commands::Sync => {
            commands::run_sync(&catalog, &store_dir)?;
        }
        Commands::Find { name } => {
            commands::run_find(&catalog, &store_dir, &name)?;
        }
        Commands::Match {
            query,
            against,
            top_k,
            threshold,
            json,
        } => {
            let options = commands::MatchOptions {
                against,
                top_k: usize::from(top_k),
                threshold,
                json,
            };
            commands::run_match(&catalog, &store_dir, &query, &options)?;
        }
        Commands::List => {
            commands::run_list(&catalog, &store_dir)?;
        }
        Commands::Status => {
            commands::run_status(&catalog, &db_path, &store_dir)?;
        }
        Commands::ClearCatalog { yes } => {
            commands::run_clear_catalog(&catalog, yes)?;
        }
        Commands::PurgeStore { yes } => {
            commands::run_purge_store(&store_dir, yes)?;
        }
    }

    Ok(())
}
