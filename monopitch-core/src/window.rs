//! # Preprocessing Module
//!
//! Turns a raw sample buffer into an analysis window ready for spectral
//! estimation: DC offset removal, Hann windowing, and the RMS energy
//! measurement that drives silence gating and intensity reporting.
//!
//! ## Features
//! - DC offset removal for accurate low-frequency analysis
//! - Hann windowing for reduced spectral leakage
//! - RMS measured on the DC-removed samples *before* windowing, which is
//!   the reference the silence and intensity thresholds are calibrated to

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Removes the DC offset from a signal by making its average value zero.
///
/// DC offset shows up as a large 0 Hz component that leaks into the low
/// bins of the band; centering the signal keeps it out of the peak search.
fn remove_dc_offset(signal: &mut [f32]) {
    let len = signal.len();
    if len == 0 {
        return;
    }
    let avg = signal.iter().sum::<f32>() / len as f32;
    if avg.abs() > 1e-6 {
        for sample in signal.iter_mut() {
            *sample -= avg;
        }
    }
}

/// Applies a Hann window to the buffer to reduce spectral leakage.
fn apply_hann_window(buffer: &mut [f32]) {
    let n = buffer.len();
    if n < 2 {
        return;
    }
    let n_minus_1 = (n - 1) as f32;
    for (i, sample) in buffer.iter_mut().enumerate() {
        let multiplier = 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / n_minus_1).cos();
        *sample *= multiplier;
    }
}

/// Root mean square of a buffer. Zero for an empty buffer.
pub fn compute_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Prepares a raw buffer for spectral estimation.
///
/// Rejects buffers shorter than the configured minimum window, removes the
/// DC offset, measures RMS on the DC-removed samples, then applies the Hann
/// window. The caller owns the input read-only; a fresh windowed copy is
/// returned.
///
/// # Arguments
/// * `samples` - Raw amplitude buffer, full scale 1.0
/// * `config` - Engine configuration (minimum window length)
///
/// # Returns
/// * `Ok((window, rms))` - Windowed samples and the pre-window RMS
/// * `Err(EngineError::InsufficientSamples)` - Buffer too short
pub fn prepare(samples: &[f32], config: &EngineConfig) -> Result<(Vec<f32>, f32), EngineError> {
    if samples.len() < config.min_window_len {
        return Err(EngineError::InsufficientSamples {
            got: samples.len(),
            need: config.min_window_len,
        });
    }

    let mut window = samples.to_vec();
    remove_dc_offset(&mut window);
    let rms = compute_rms(&window);
    apply_hann_window(&mut window);

    Ok((window, rms))
}
