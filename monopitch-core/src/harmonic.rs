//! # Harmonic Resolution Module
//!
//! Locates the fundamental in a magnitude spectrum. A naive arg-max locks
//! onto whichever harmonic carries the most energy, which for many
//! instruments is not the fundamental; this module scores candidates with
//! harmonic awareness and then walks octave errors back down.
//!
//! ## Features
//! - Harmonic-penalized peak search (subtract weighted 2nd/3rd harmonics)
//! - Harmonic Product Spectrum in the log domain
//! - Sub-octave correction: descend to f/2 while it holds comparable energy
//! - Magnitude floor so a near-empty spectrum resolves to no pitch

use crate::config::{EngineConfig, HarmonicStrategy};
use crate::spectrum::Spectrum;

/// A resolved fundamental candidate, before sub-bin refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchCandidate {
    /// Index of the winning bin in the spectrum.
    pub bin: usize,
    /// Center frequency of the winning bin, in Hz.
    pub frequency_hz: f32,
    /// Raw magnitude at the winning bin.
    pub magnitude: f32,
}

/// Resolves the fundamental frequency bin of a spectrum.
///
/// Returns `None` when no stable fundamental stands above the magnitude
/// floor. That outcome is silence or noise, not a failure; the caller
/// reports it as a rest.
pub fn resolve_fundamental(spectrum: &Spectrum, config: &EngineConfig) -> Option<PitchCandidate> {
    if spectrum.is_empty() {
        return None;
    }

    let best_bin = match config.resolver {
        HarmonicStrategy::PenalizedPeaks { second, third } => {
            best_penalized_bin(spectrum, second, third)
        }
        HarmonicStrategy::HarmonicProduct { harmonics } => best_product_bin(spectrum, harmonics),
    }?;

    let corrected = correct_octave(spectrum, best_bin, config.octave_ratio_threshold);
    let magnitude = spectrum.magnitudes[corrected];

    // Reject a winner that barely rises above the spectrum's own noise.
    let mean = spectrum.magnitudes.iter().sum::<f32>() / spectrum.len() as f32;
    if magnitude <= 0.0 || magnitude < config.magnitude_floor_ratio * mean {
        return None;
    }

    Some(PitchCandidate {
        bin: corrected,
        frequency_hz: spectrum.freq_at(corrected),
        magnitude,
    })
}

/// Scores each bin as its magnitude minus weighted magnitudes at twice and
/// three times its frequency, looked up by nearest bin. A harmonic outside
/// the band contributes no penalty.
fn best_penalized_bin(spectrum: &Spectrum, second: f32, third: f32) -> Option<usize> {
    let mut best = None;
    let mut best_score = f32::NEG_INFINITY;

    for bin in 0..spectrum.len() {
        let f = spectrum.freq_at(bin);
        let mut score = spectrum.magnitudes[bin];
        if let Some(h2) = spectrum.bin_of(2.0 * f) {
            score -= second * spectrum.magnitudes[h2];
        }
        if let Some(h3) = spectrum.bin_of(3.0 * f) {
            score -= third * spectrum.magnitudes[h3];
        }
        if score > best_score {
            best_score = score;
            best = Some(bin);
        }
    }

    best
}

/// Harmonic Product Spectrum, evaluated as a mean of log magnitudes so the
/// product cannot overflow and bins with fewer in-band harmonics compete on
/// equal footing.
fn best_product_bin(spectrum: &Spectrum, harmonics: usize) -> Option<usize> {
    const LOG_EPSILON: f32 = 1e-12;

    let mut best = None;
    let mut best_score = f32::NEG_INFINITY;

    for bin in 0..spectrum.len() {
        let f = spectrum.freq_at(bin);
        let mut sum = 0.0f32;
        let mut terms = 0usize;
        for h in 1..=harmonics {
            match spectrum.bin_of(h as f32 * f) {
                Some(hb) => {
                    sum += (spectrum.magnitudes[hb] + LOG_EPSILON).ln();
                    terms += 1;
                }
                None => break,
            }
        }
        if terms == 0 {
            continue;
        }
        let score = sum / terms as f32;
        if score > best_score {
            best_score = score;
            best = Some(bin);
        }
    }

    best
}

/// Walks a candidate down by octaves while the half frequency stays in band
/// and carries at least `ratio` of the candidate's magnitude. Corrects the
/// common lock onto the first strong harmonic.
fn correct_octave(spectrum: &Spectrum, mut bin: usize, ratio: f32) -> usize {
    loop {
        let half = spectrum.freq_at(bin) / 2.0;
        match spectrum.bin_of(half) {
            Some(hb)
                if hb != bin
                    && spectrum.magnitudes[hb] >= ratio * spectrum.magnitudes[bin] =>
            {
                bin = hb;
            }
            _ => return bin,
        }
    }
}
