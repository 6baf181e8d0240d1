//! # Spectral Estimation Module
//!
//! Computes magnitude-per-frequency over the configured analysis band.
//! Two interchangeable estimators produce the same `Spectrum` value:
//!
//! ## Features
//! - Swept single-frequency evaluation via the Goertzel recurrence, with a
//!   step chosen independently of the window length
//! - Radix-2 FFT via RustFFT, zero-padded to the next power of two, with
//!   only the in-band bins retained
//! - Magnitudes are Euclidean norms of the real/imaginary accumulators:
//!   non-negative and finite for finite input

use rustfft::{FftPlanner, num_complex::Complex};

use crate::config::{EngineConfig, SpectralEstimator};

/// A magnitude spectrum over a bounded band at a fixed frequency step.
///
/// Bin `i` is centered at `start_hz + i * step_hz`; frequencies are strictly
/// increasing by construction. Produced fresh per call and discarded after
/// the fundamental has been resolved.
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Center frequency of bin 0, in Hz.
    pub start_hz: f32,
    /// Spacing between adjacent bins, in Hz.
    pub step_hz: f32,
    /// One non-negative magnitude per bin.
    pub magnitudes: Vec<f32>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Center frequency of a bin.
    pub fn freq_at(&self, bin: usize) -> f32 {
        self.start_hz + bin as f32 * self.step_hz
    }

    /// Nearest bin to a frequency, or `None` if it falls outside the band.
    pub fn bin_of(&self, freq_hz: f32) -> Option<usize> {
        if !freq_hz.is_finite() || self.magnitudes.is_empty() {
            return None;
        }
        let idx = ((freq_hz - self.start_hz) / self.step_hz).round();
        if idx < 0.0 || idx >= self.magnitudes.len() as f32 {
            return None;
        }
        Some(idx as usize)
    }
}

/// Computes the band-limited magnitude spectrum of a prepared window.
///
/// # Arguments
/// * `window` - Windowed, DC-removed samples from the preprocessor
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Band edges, step, and estimator choice
pub fn estimate(window: &[f32], sample_rate: u32, config: &EngineConfig) -> Spectrum {
    match config.estimator {
        SpectralEstimator::Swept => sweep(window, sample_rate, config),
        SpectralEstimator::Fft => fft_band(window, sample_rate, config),
    }
}

/// Goertzel magnitude of a single frequency over the window.
///
/// Much cheaper than a full FFT when only a band of frequencies is needed,
/// and the frequency does not have to sit on an FFT bin grid.
fn goertzel_magnitude(window: &[f32], freq_hz: f32, sample_rate: u32) -> f32 {
    let w = 2.0 * std::f64::consts::PI * freq_hz as f64 / sample_rate as f64;
    let coeff = 2.0 * w.cos();
    let mut s1 = 0.0f64;
    let mut s2 = 0.0f64;
    for sample in window {
        let s0 = *sample as f64 + coeff * s1 - s2;
        s2 = s1;
        s1 = s0;
    }
    (s1 * s1 + s2 * s2 - coeff * s1 * s2).abs().sqrt() as f32
}

/// Swept estimator: one Goertzel evaluation per step across the band.
///
/// The last frequency sampled is `min + floor((max - min) / step) * step`,
/// so the sweep never reads past the nominal band edge.
fn sweep(window: &[f32], sample_rate: u32, config: &EngineConfig) -> Spectrum {
    let span = config.max_frequency_hz - config.min_frequency_hz;
    let bins = (span / config.frequency_step_hz).floor() as usize + 1;

    let magnitudes = (0..bins)
        .map(|i| {
            let f = config.min_frequency_hz + i as f32 * config.frequency_step_hz;
            goertzel_magnitude(window, f, sample_rate)
        })
        .collect();

    Spectrum {
        start_hz: config.min_frequency_hz,
        step_hz: config.frequency_step_hz,
        magnitudes,
    }
}

/// FFT estimator: zero-pad to the next power of two, transform, and keep
/// the bins whose center frequency falls inside the band.
///
/// The effective step becomes `sample_rate / fft_len` regardless of the
/// configured sweep step.
fn fft_band(window: &[f32], sample_rate: u32, config: &EngineConfig) -> Spectrum {
    let fft_len = window.len().next_power_of_two();
    let bin_hz = sample_rate as f32 / fft_len as f32;

    let mut buffer: Vec<Complex<f32>> = window
        .iter()
        .map(|&sample| Complex { re: sample, im: 0.0 })
        .chain(std::iter::repeat(Complex { re: 0.0, im: 0.0 }))
        .take(fft_len)
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_len);
    fft.process(&mut buffer);

    let first = (config.min_frequency_hz / bin_hz).ceil() as usize;
    let last = ((config.max_frequency_hz / bin_hz).floor() as usize).min(fft_len / 2);

    let magnitudes: Vec<f32> = if first > last {
        Vec::new()
    } else {
        buffer[first..=last].iter().map(|c| c.norm()).collect()
    };

    Spectrum {
        start_hz: first as f32 * bin_hz,
        step_hz: bin_hz,
        magnitudes,
    }
}
