//! # Peak Refinement Module
//!
//! Sharpens a resolved fundamental from bin resolution to sub-bin
//! resolution with parabolic interpolation over the peak and its two
//! neighbors. Degenerate geometry falls back to the unrefined bin
//! frequency rather than surfacing an error.

use crate::harmonic::PitchCandidate;
use crate::spectrum::Spectrum;

/// Denominators smaller than this are treated as a flat peak.
const DENOMINATOR_EPSILON: f32 = 1e-9;

/// Refines a candidate's frequency by fitting a parabola through the
/// magnitudes at the winning bin and its immediate neighbors.
///
/// The vertex offset `p = 0.5 * (y1 - y3) / (y1 - 2*y2 + y3)` is clamped to
/// one bin in either direction; a candidate on the spectrum edge or a
/// numerically flat peak is returned unrefined.
pub fn refine(spectrum: &Spectrum, candidate: &PitchCandidate) -> f32 {
    let bin = candidate.bin;
    if bin == 0 || bin + 1 >= spectrum.len() {
        return candidate.frequency_hz;
    }

    let y1 = spectrum.magnitudes[bin - 1];
    let y2 = spectrum.magnitudes[bin];
    let y3 = spectrum.magnitudes[bin + 1];

    let denominator = y1 - 2.0 * y2 + y3;
    if denominator.abs() < DENOMINATOR_EPSILON {
        return candidate.frequency_hz;
    }

    let p = (0.5 * (y1 - y3) / denominator).clamp(-1.0, 1.0);
    candidate.frequency_hz + p * spectrum.step_hz
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum_of(magnitudes: Vec<f32>) -> Spectrum {
        Spectrum {
            start_hz: 100.0,
            step_hz: 2.0,
            magnitudes,
        }
    }

    fn candidate_at(spectrum: &Spectrum, bin: usize) -> PitchCandidate {
        PitchCandidate {
            bin,
            frequency_hz: spectrum.freq_at(bin),
            magnitude: spectrum.magnitudes[bin],
        }
    }

    #[test]
    fn symmetric_peak_is_unmoved() {
        let spectrum = spectrum_of(vec![1.0, 4.0, 9.0, 4.0, 1.0]);
        let candidate = candidate_at(&spectrum, 2);
        let refined = refine(&spectrum, &candidate);
        assert!((refined - candidate.frequency_hz).abs() < 1e-4);
    }

    #[test]
    fn skewed_peak_moves_toward_heavier_neighbor() {
        let spectrum = spectrum_of(vec![1.0, 4.0, 9.0, 8.0, 1.0]);
        let candidate = candidate_at(&spectrum, 2);
        let refined = refine(&spectrum, &candidate);
        assert!(refined > candidate.frequency_hz);
        assert!(refined <= candidate.frequency_hz + spectrum.step_hz);
    }

    #[test]
    fn flat_top_returns_bin_frequency() {
        // Three equal magnitudes make the denominator zero; refinement
        // must not divide by it.
        let spectrum = spectrum_of(vec![1.0, 5.0, 5.0, 5.0, 1.0]);
        let candidate = candidate_at(&spectrum, 2);
        assert_eq!(refine(&spectrum, &candidate), candidate.frequency_hz);
    }

    #[test]
    fn edge_bins_are_not_refined() {
        let spectrum = spectrum_of(vec![9.0, 4.0, 1.0]);
        let first = candidate_at(&spectrum, 0);
        assert_eq!(refine(&spectrum, &first), first.frequency_hz);
        let last = candidate_at(&spectrum, 2);
        assert_eq!(refine(&spectrum, &last), last.frequency_hz);
    }

    #[test]
    fn offset_is_clamped_to_one_bin() {
        // Near-collinear magnitudes make the raw vertex land many bins
        // away; the clamp keeps the refined frequency within one step.
        let spectrum = spectrum_of(vec![1.0, 6.0, 5.51, 5.0, 4.0]);
        let candidate = candidate_at(&spectrum, 2);
        let refined = refine(&spectrum, &candidate);
        // Raw offset would be 0.5 * (6.0 - 5.0) / -0.02 = -25 bins.
        assert!((refined - (candidate.frequency_hz - spectrum.step_hz)).abs() < 1e-3);
    }
}
