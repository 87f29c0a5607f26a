//! Error types for ingestion and reconciliation.
//!
//! Decode and fingerprint failures are deliberately not errors: they
//! surface as an absent fingerprint and the affected file is skipped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("catalog error: {0}")]
    Catalog(#[from] timbra_core::Error),

    #[error("invalid file name: {0}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
