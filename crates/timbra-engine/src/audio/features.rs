//! Short-time cepstral features.
//!
//! Each frame goes through Hann window, FFT, triangular mel filterbank,
//! log energies, and a DCT-II, yielding one row of cepstral
//! coefficients. The fingerprint layer reduces the matrix to a single
//! vector by averaging each coefficient across frames.

use std::f64::consts::PI;

/// Configures cepstral feature extraction.
///
/// The coefficient count is the fingerprint dimensionality; two
/// fingerprints are comparable only if computed with the same config.
#[derive(Debug, Clone)]
pub struct FingerprintConfig {
    /// Cepstral coefficients kept per frame (default: 20).
    pub coefficients: usize,
    /// Number of triangular mel filters (default: 40).
    pub mel_bands: usize,
    /// Analysis frame length in samples (default: 2048).
    pub frame_length: usize,
    /// Hop between frame starts in samples (default: 512).
    pub frame_shift: usize,
    /// Floor applied to mel energies before the log (default: 1e-10).
    pub energy_floor: f64,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            coefficients: 20,
            mel_bands: 40,
            frame_length: 2048,
            frame_shift: 512,
            energy_floor: 1e-10,
        }
    }
}

/// Compute the cepstral feature matrix for a mono signal.
///
/// Output shape is `[num_frames][coefficients]`. A signal shorter than
/// one frame is zero-padded into a single frame; an empty signal (or a
/// degenerate config) yields no frames. The frame count is
/// `(len - frame_length) / frame_shift + 1` for longer signals, so a
/// trailing partial hop is dropped.
#[must_use]
pub fn cepstral_matrix(samples: &[f32], sample_rate: u32, cfg: &FingerprintConfig) -> Vec<Vec<f32>> {
    if samples.is_empty()
        || cfg.coefficients == 0
        || cfg.mel_bands == 0
        || cfg.frame_length == 0
        || cfg.frame_shift == 0
    {
        return Vec::new();
    }

    let n = samples.len();
    let num_frames = if n <= cfg.frame_length {
        1
    } else {
        (n - cfg.frame_length) / cfg.frame_shift + 1
    };

    let fft_size = next_pow2(cfg.frame_length);
    let half_fft = fft_size / 2 + 1;

    let window = hann_window(cfg.frame_length);
    let filterbank = mel_filterbank(
        cfg.mel_bands,
        fft_size,
        sample_rate,
        0.0,
        f64::from(sample_rate) / 2.0,
    );
    let dct_basis = dct_ii_basis(cfg.coefficients, cfg.mel_bands);

    let mut frames = Vec::with_capacity(num_frames);
    let mut fft_buf = vec![(0.0f64, 0.0f64); fft_size];

    for f in 0..num_frames {
        let offset = f * cfg.frame_shift;
        let available = (n - offset).min(cfg.frame_length);

        // Window into the zero-padded FFT buffer.
        for v in &mut fft_buf {
            *v = (0.0, 0.0);
        }
        for i in 0..available {
            fft_buf[i] = (f64::from(samples[offset + i]) * window[i], 0.0);
        }

        fft(&mut fft_buf);

        let mut power_spec = vec![0.0f64; half_fft];
        for (k, p) in power_spec.iter_mut().enumerate() {
            let (re, im) = fft_buf[k];
            *p = re * re + im * im;
        }

        // Log mel energies.
        let mut log_energies = vec![0.0f64; cfg.mel_bands];
        for (m, log_energy) in log_energies.iter_mut().enumerate() {
            let mut energy: f64 = 0.0;
            for (k, &w) in filterbank[m].iter().enumerate() {
                energy += w * power_spec[k];
            }
            *log_energy = energy.max(cfg.energy_floor).ln();
        }

        // DCT-II projects the log energies onto cepstral coefficients.
        let mut frame = vec![0.0f32; cfg.coefficients];
        for (k, coeff) in frame.iter_mut().enumerate() {
            let val: f64 = log_energies
                .iter()
                .zip(dct_basis[k].iter())
                .map(|(&e, &b)| e * b)
                .sum();
            *coeff = val as f32;
        }
        frames.push(frame);
    }

    frames
}

fn next_pow2(n: usize) -> usize {
    let mut p = 1;
    while p < n {
        p <<= 1;
    }
    p
}

fn hann_window(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank weights, shaped `[mel_bands][half_fft]`.
fn mel_filterbank(
    mel_bands: usize,
    fft_size: usize,
    sample_rate: u32,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let mel_low = hz_to_mel(low_freq);
    let mel_high = hz_to_mel(high_freq);

    let mel_points: Vec<f64> = (0..mel_bands + 2)
        .map(|i| mel_low + i as f64 * (mel_high - mel_low) / (mel_bands + 1) as f64)
        .collect();

    let bin_indices: Vec<usize> = mel_points
        .iter()
        .map(|&m| {
            let hz = mel_to_hz(m);
            let bin = (hz * fft_size as f64 / f64::from(sample_rate)).floor() as isize;
            bin.clamp(0, half_fft as isize - 1) as usize
        })
        .collect();

    let mut fb = Vec::with_capacity(mel_bands);
    for m in 0..mel_bands {
        let mut filter = vec![0.0f64; half_fft];
        let left = bin_indices[m];
        let center = bin_indices[m + 1];
        let right = bin_indices[m + 2];

        if center > left {
            for k in left..=center {
                filter[k] = (k - left) as f64 / (center - left) as f64;
            }
        }
        if right > center {
            for k in center..=right {
                filter[k] = (right - k) as f64 / (right - center) as f64;
            }
        }
        fb.push(filter);
    }
    fb
}

/// DCT-II basis vectors, shaped `[coefficients][mel_bands]`.
fn dct_ii_basis(coefficients: usize, mel_bands: usize) -> Vec<Vec<f64>> {
    let mut basis = vec![vec![0.0f64; mel_bands]; coefficients];
    for (k, row) in basis.iter_mut().enumerate() {
        for (n, b) in row.iter_mut().enumerate() {
            *b = (PI * k as f64 * (n as f64 + 0.5) / mel_bands as f64).cos();
        }
    }
    basis
}

/// In-place Cooley-Tukey FFT over (real, imag) pairs.
///
/// Input length must be a power of 2.
fn fft(x: &mut [(f64, f64)]) {
    let n = x.len();
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation.
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            x.swap(i, j);
        }
    }

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle = -2.0 * PI / size as f64;
        let wn = (angle.cos(), angle.sin());
        let mut start = 0;
        while start < n {
            let mut w = (1.0, 0.0);
            for k in 0..half {
                let u = x[start + k];
                let t_re = w.0 * x[start + k + half].0 - w.1 * x[start + k + half].1;
                let t_im = w.0 * x[start + k + half].1 + w.1 * x[start + k + half].0;
                x[start + k] = (u.0 + t_re, u.1 + t_im);
                x[start + k + half] = (u.0 - t_re, u.1 - t_im);
                let next_re = w.0 * wn.0 - w.1 * wn.1;
                let next_im = w.0 * wn.1 + w.1 * wn.0;
                w = (next_re, next_im);
            }
            start += size;
        }
        size <<= 1;
    }
}
