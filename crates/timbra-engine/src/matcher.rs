//! Candidate assembly and distance ranking.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::audio::FingerprintConfig;
use crate::fingerprint::extract;

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub name: String,
    pub path: PathBuf,
    pub distance: f64,
}

/// The outcome of ranking a query against a candidate set.
///
/// `met_threshold` distinguishes genuine hits from the best-effort
/// fallback shown when nothing passed the threshold; `comparisons`
/// distinguishes "compared but none passed" from "no comparison was
/// possible at all".
#[derive(Debug, Serialize)]
pub struct RankOutcome {
    pub results: Vec<MatchResult>,
    pub met_threshold: bool,
    pub comparisons: usize,
}

impl RankOutcome {
    fn empty() -> Self {
        Self {
            results: Vec::new(),
            met_threshold: false,
            comparisons: 0,
        }
    }

    /// True when not a single candidate could be fingerprinted.
    #[must_use]
    pub fn no_valid_comparisons(&self) -> bool {
        self.comparisons == 0
    }
}

/// A per-query pool of (name, path) pairs, deduplicated by normalized
/// absolute path.
///
/// Insertion order is preserved and is the tie-break order for equal
/// distances. Re-inserting a known path overwrites the name in place,
/// so the source added last wins name conflicts; callers add catalog
/// rows first and the store scan second, making the filesystem the
/// authority on display names.
#[derive(Debug, Default)]
pub struct CandidateSet {
    entries: Vec<(String, PathBuf)>,
    index: HashMap<PathBuf, usize>,
}

impl CandidateSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one candidate, deduplicating on the normalized path.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        let path = path.into();
        let path = std::path::absolute(&path).unwrap_or(path);
        let name = name.into();

        if let Some(&slot) = self.index.get(&path) {
            self.entries[slot].0 = name;
        } else {
            self.index.insert(path.clone(), self.entries.len());
            self.entries.push((name, path));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

/// Acoustic distance between two audio files.
///
/// Absent when either file yields no fingerprint. Symmetric; zero only
/// for identical fingerprint vectors.
#[must_use]
pub fn compare(path_a: &Path, path_b: &Path, cfg: &FingerprintConfig) -> Option<f64> {
    let a = extract(path_a, cfg)?;
    let b = extract(path_b, cfg)?;
    Some(a.distance(&b))
}

/// Rank every candidate by distance to the query.
///
/// Candidates that yield no fingerprint are skipped silently. Results
/// are sorted ascending by distance with ties kept in candidate-set
/// order. If any result is within the threshold, the first `top_k`
/// accepted results are returned; otherwise the first `top_k` of the
/// full list are returned as tagged best-effort guesses.
#[must_use]
pub fn rank(
    query: &Path,
    candidates: &CandidateSet,
    threshold: f64,
    top_k: usize,
    cfg: &FingerprintConfig,
) -> RankOutcome {
    let Some(query_fp) = extract(query, cfg) else {
        log::warn!("query {} yields no fingerprint", query.display());
        return RankOutcome::empty();
    };

    let mut results: Vec<MatchResult> = candidates
        .iter()
        .filter_map(|(name, path)| {
            let candidate_fp = extract(path, cfg)?;
            Some(MatchResult {
                name: name.to_owned(),
                path: path.to_path_buf(),
                distance: query_fp.distance(&candidate_fp),
            })
        })
        .collect();

    let comparisons = results.len();
    if comparisons == 0 {
        return RankOutcome::empty();
    }

    // Stable sort: equal distances keep candidate-set order.
    results.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let accepted = results.iter().take_while(|r| r.distance <= threshold).count();
    let met_threshold = accepted > 0;
    if met_threshold {
        results.truncate(accepted.min(top_k));
    } else {
        results.truncate(top_k);
    }

    RankOutcome {
        results,
        met_threshold,
        comparisons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sine_i16, write_wav};
    use tempfile::TempDir;

    fn tone_file(dir: &TempDir, name: &str, freq: f64) -> PathBuf {
        let path = dir.path().join(name);
        write_wav(&path, 22050, &sine_i16(22050, freq, 8000));
        path
    }

    #[test]
    fn test_candidate_set_dedups_by_path() {
        let mut set = CandidateSet::new();
        set.insert("from_catalog", "/store/alice.wav");
        set.insert("bob", "/store/bob.wav");
        set.insert("alice", "/store/alice.wav");

        assert_eq!(set.len(), 2);
        let entries: Vec<(&str, &Path)> = set.iter().collect();
        // Last insert wins the name but keeps the original position.
        assert_eq!(entries[0].0, "alice");
        assert_eq!(entries[1].0, "bob");
    }

    #[test]
    fn test_compare_same_file_is_zero() {
        let dir = TempDir::new().unwrap();
        let a = tone_file(&dir, "a.wav", 440.0);

        let cfg = FingerprintConfig::default();
        assert_eq!(compare(&a, &a, &cfg), Some(0.0));
    }

    #[test]
    fn test_compare_is_symmetric() {
        let dir = TempDir::new().unwrap();
        let a = tone_file(&dir, "a.wav", 440.0);
        let b = tone_file(&dir, "b.wav", 880.0);

        let cfg = FingerprintConfig::default();
        assert_eq!(compare(&a, &b, &cfg), compare(&b, &a, &cfg));
    }

    #[test]
    fn test_compare_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let a = tone_file(&dir, "a.wav", 440.0);

        let cfg = FingerprintConfig::default();
        assert!(compare(&a, Path::new("/nonexistent/b.wav"), &cfg).is_none());
        assert!(compare(Path::new("/nonexistent/b.wav"), &a, &cfg).is_none());
    }

    #[test]
    fn test_rank_empty_candidates() {
        let dir = TempDir::new().unwrap();
        let query = tone_file(&dir, "q.wav", 440.0);

        let cfg = FingerprintConfig::default();
        let outcome = rank(&query, &CandidateSet::new(), 100.0, 3, &cfg);
        assert!(outcome.results.is_empty());
        assert!(outcome.no_valid_comparisons());
        assert!(!outcome.met_threshold);
    }

    #[test]
    fn test_rank_returns_min_of_top_k_and_valid() {
        let dir = TempDir::new().unwrap();
        let query = tone_file(&dir, "q.wav", 440.0);

        let mut set = CandidateSet::new();
        for (i, freq) in [220.0, 440.0, 880.0, 1760.0].iter().enumerate() {
            set.insert(format!("c{i}"), tone_file(&dir, &format!("c{i}.wav"), *freq));
        }

        let cfg = FingerprintConfig::default();
        let outcome = rank(&query, &set, f64::INFINITY, 3, &cfg);
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.comparisons, 4);
        assert!(outcome.met_threshold);

        let outcome = rank(&query, &set, f64::INFINITY, 10, &cfg);
        assert_eq!(outcome.results.len(), 4);
        assert!(outcome
            .results
            .windows(2)
            .all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_rank_exact_copy_ranks_first() {
        let dir = TempDir::new().unwrap();
        let query = tone_file(&dir, "q.wav", 440.0);
        let copy = dir.path().join("copy.wav");
        std::fs::copy(&query, &copy).unwrap();

        let mut set = CandidateSet::new();
        set.insert("far", tone_file(&dir, "far.wav", 3520.0));
        set.insert("copy", copy);

        let cfg = FingerprintConfig::default();
        let outcome = rank(&query, &set, f64::INFINITY, 2, &cfg);
        assert_eq!(outcome.results[0].name, "copy");
        assert_eq!(outcome.results[0].distance, 0.0);
    }

    #[test]
    fn test_rank_threshold_zero_falls_back_tagged() {
        let dir = TempDir::new().unwrap();
        let query = tone_file(&dir, "q.wav", 440.0);

        let mut set = CandidateSet::new();
        set.insert("near", tone_file(&dir, "near.wav", 660.0));
        set.insert("far", tone_file(&dir, "far.wav", 3520.0));

        let cfg = FingerprintConfig::default();
        let outcome = rank(&query, &set, 0.0, 10, &cfg);

        // Nothing is within distance 0, so the full sorted list comes
        // back as best-effort results.
        assert!(!outcome.met_threshold);
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.comparisons, 2);
        assert!(outcome.results[0].distance <= outcome.results[1].distance);
    }

    #[test]
    fn test_rank_skips_unreadable_candidates() {
        let dir = TempDir::new().unwrap();
        let query = tone_file(&dir, "q.wav", 440.0);

        let mut set = CandidateSet::new();
        set.insert("gone", dir.path().join("deleted.wav"));
        set.insert("ok", tone_file(&dir, "ok.wav", 550.0));

        let cfg = FingerprintConfig::default();
        let outcome = rank(&query, &set, f64::INFINITY, 5, &cfg);
        assert_eq!(outcome.comparisons, 1);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].name, "ok");
    }

    #[test]
    fn test_rank_all_candidates_unreadable() {
        let dir = TempDir::new().unwrap();
        let query = tone_file(&dir, "q.wav", 440.0);

        let mut set = CandidateSet::new();
        set.insert("gone1", dir.path().join("gone1.wav"));
        set.insert("gone2", dir.path().join("gone2.wav"));

        let cfg = FingerprintConfig::default();
        let outcome = rank(&query, &set, 100.0, 3, &cfg);
        assert!(outcome.no_valid_comparisons());
        assert!(outcome.results.is_empty());
    }
}
