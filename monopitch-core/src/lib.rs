// monopitch-core/src/lib.rs

//! The core logic for monophonic pitch detection and note classification.
//! This crate turns a decoded PCM buffer into a musical note reading:
//! it gates silence, estimates the fundamental frequency with sub-bin
//! precision, corrects octave errors, and maps the result to a note name
//! with a stability dead-zone. It is completely headless, performs no I/O,
//! and keeps no state between calls.

pub mod config;
pub mod error;
pub mod harmonic;
pub mod note;
pub mod refine;
pub mod spectrum;
pub mod window;

use serde::{Deserialize, Serialize};

pub use crate::config::{EngineConfig, HarmonicStrategy, SpectralEstimator};
pub use crate::error::EngineError;

/// The result of analyzing a single buffer.
///
/// A rest (silence, noise, or an unstable reading) carries frequency 0 and
/// no note fields, but its intensity is still measured so a caller can show
/// ambient loudness while nothing is playing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteResult {
    /// The detected fundamental frequency in Hz; 0 for a rest.
    pub frequency_hz: f32,
    /// The nearest note name, e.g. "A"; `None` for a rest.
    pub note: Option<String>,
    /// The note's octave in scientific pitch notation; `None` for a rest.
    pub octave: Option<i32>,
    /// Deviation from the note's canonical frequency in cents, in
    /// [-50, 50]; `None` for a rest.
    pub cents: Option<f32>,
    /// Normalized loudness in [0, 1], mapped from RMS on a decibel scale.
    pub intensity: f32,
}

impl NoteResult {
    fn rest(intensity: f32) -> Self {
        Self {
            frequency_hz: 0.0,
            note: None,
            octave: None,
            cents: None,
            intensity,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.note.is_none()
    }

    /// The conventional note label ("A4", "C#3"), or `None` for a rest.
    pub fn label(&self) -> Option<String> {
        match (&self.note, self.octave) {
            (Some(name), Some(octave)) => Some(format!("{name}{octave}")),
            _ => None,
        }
    }
}

/// Analyzes one buffer of samples and classifies what it hears.
///
/// The full pipeline runs per call with no retained state: preprocessing
/// (DC removal, Hann window, RMS), band-limited spectral estimation,
/// harmonic-aware fundamental resolution with octave correction, parabolic
/// peak refinement, and note mapping with a cents dead-zone.
///
/// # Arguments
/// * `samples` - Decoded PCM amplitudes, full scale 1.0; borrowed read-only
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Deployment-level engine configuration
///
/// # Returns
/// * `Ok(NoteResult)` - A note reading or a rest, never partial
/// * `Err(EngineError)` - Malformed input or configuration
pub fn detect_note(
    samples: &[f32],
    sample_rate: u32,
    config: &EngineConfig,
) -> Result<NoteResult, EngineError> {
    if sample_rate == 0 {
        return Err(EngineError::InvalidSampleRate(sample_rate));
    }
    config.validate()?;

    let (analysis_window, rms) = window::prepare(samples, config)?;
    let intensity = intensity_from_rms(rms, config);

    if rms < config.silence_rms_threshold {
        return Ok(NoteResult::rest(intensity));
    }

    let spectrum = spectrum::estimate(&analysis_window, sample_rate, config);
    let Some(candidate) = harmonic::resolve_fundamental(&spectrum, config) else {
        return Ok(NoteResult::rest(intensity));
    };

    let frequency_hz = refine::refine(&spectrum, &candidate);

    match note::frequency_to_note(frequency_hz, config.cents_dead_zone) {
        Some(mapped) => Ok(NoteResult {
            frequency_hz,
            note: Some(mapped.name.to_string()),
            octave: Some(mapped.octave),
            cents: Some(mapped.cents),
            intensity,
        }),
        None => Ok(NoteResult::rest(intensity)),
    }
}

/// Converts 16-bit PCM to normalized f32 samples in [-1, 1].
///
/// Upstream decoders commonly hand over int16 buffers; the engine's
/// thresholds are calibrated to full scale 1.0.
pub fn samples_to_f32(samples: &[i16]) -> Vec<f32> {
    samples
        .iter()
        .map(|&s| s as f32 / i16::MAX as f32)
        .collect()
}

/// Maps RMS onto [0, 1] through a decibel window.
///
/// `dB = 20*log10(rms)` relative to full scale 1.0, clamped to the
/// configured floor so digital silence never produces -infinity, then
/// mapped affinely over `config.db_range`.
fn intensity_from_rms(rms: f32, config: &EngineConfig) -> f32 {
    let db = if rms > 0.0 {
        (20.0 * rms.log10()).max(config.db_floor)
    } else {
        config.db_floor
    };
    let (low, high) = config.db_range;
    ((db - low) / (high - low)).clamp(0.0, 1.0)
}
