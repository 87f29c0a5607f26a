//! Fixed-length acoustic fingerprints.

use std::path::Path;

use crate::audio::{cepstral_matrix, decode, FingerprintConfig};

/// Decoded signals shorter than this yield no fingerprint.
pub const MIN_SAMPLES: usize = 10;

/// A fixed-length summary of one audio file's timbre.
///
/// Each component is the mean of one cepstral coefficient across all
/// analysis frames. The vector is deliberately left unnormalized, so
/// louder recordings produce different fingerprints than quiet ones;
/// distances are only meaningful between fingerprints computed with the
/// same [`FingerprintConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    coeffs: Vec<f32>,
}

impl Fingerprint {
    #[must_use]
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.coeffs
    }

    /// Euclidean (L2) distance to another fingerprint.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.coeffs.len(), other.coeffs.len());
        self.coeffs
            .iter()
            .zip(other.coeffs.iter())
            .map(|(&a, &b)| {
                let d = f64::from(a) - f64::from(b);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// Extract a fingerprint from an audio file.
///
/// Returns `None` when the file cannot be decoded or the decoded signal
/// is shorter than [`MIN_SAMPLES`]. That is an expected per-item
/// outcome, not a fault: callers skip the file and move on.
#[must_use]
pub fn extract(path: &Path, cfg: &FingerprintConfig) -> Option<Fingerprint> {
    let audio = match decode(path) {
        Ok(audio) => audio,
        Err(e) => {
            log::debug!("no fingerprint for {}: {e:#}", path.display());
            return None;
        }
    };

    if audio.samples.len() < MIN_SAMPLES {
        log::debug!(
            "no fingerprint for {}: only {} samples decoded",
            path.display(),
            audio.samples.len()
        );
        return None;
    }

    let frames = cepstral_matrix(&audio.samples, audio.sample_rate, cfg);
    if frames.is_empty() {
        return None;
    }

    // Column-wise mean over all frames. This is the whole model.
    let mut sums = vec![0.0f64; cfg.coefficients];
    for frame in &frames {
        for (sum, &v) in sums.iter_mut().zip(frame.iter()) {
            *sum += f64::from(v);
        }
    }
    let count = frames.len() as f64;
    let coeffs = sums.into_iter().map(|s| (s / count) as f32).collect();

    Some(Fingerprint { coeffs })
}
