use serde::Serialize;
use std::path::PathBuf;

/// A registered voice sample.
///
/// The path is the identity: the catalog holds at most one entry per
/// normalized absolute path. The name is a display label with no
/// uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceEntry {
    /// Surrogate catalog key.
    pub id: i64,

    /// Display label, usually the file stem at registration time.
    pub name: String,

    /// Absolute path to the audio file.
    pub path: PathBuf,
}

impl VoiceEntry {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Derive the default display label for a path: the base name without
/// its extension.
#[must_use]
pub fn display_name(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
