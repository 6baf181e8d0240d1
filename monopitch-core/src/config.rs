//! # Engine Configuration Module
//!
//! Deployment-level tuning for the detection engine. Every constant that the
//! source variants hard-coded per instrument (analysis band, spectral step,
//! silence thresholds, harmonic weights) lives here as data, so one engine
//! serves every deployment.
//!
//! A configuration is fixed for the lifetime of a deployment, not per call;
//! it can be loaded from a file via serde.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// How the magnitude-per-frequency spectrum is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpectralEstimator {
    /// Per-frequency Goertzel sweep at a configurable step. O(bins × samples),
    /// but the step is independent of the window length.
    Swept,
    /// Radix-2 FFT, zero-padded to the next power of two. O(N log N); the
    /// effective step becomes `sample_rate / fft_len`.
    Fft,
}

/// How raw magnitudes are combined into a harmonic-aware fundamental score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HarmonicStrategy {
    /// Peak search with the 2nd and 3rd harmonics subtracted from each
    /// candidate's score, weighted by `second` and `third`.
    PenalizedPeaks { second: f32, third: f32 },
    /// Harmonic Product Spectrum over `harmonics` partials, evaluated in the
    /// log domain.
    HarmonicProduct { harmonics: usize },
}

/// Full engine configuration.
///
/// The defaults reproduce the calibration of the reference deployment:
/// a 50–1200 Hz band swept at 2 Hz, an RMS silence gate of 0.015 on
/// full-scale-1.0 samples, penalty weights 0.6/0.3, and a 25-cent
/// dead-zone on note mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lower edge of the analysis band in Hz.
    pub min_frequency_hz: f32,
    /// Upper edge of the analysis band in Hz.
    pub max_frequency_hz: f32,
    /// Spectral resolution of the swept estimator in Hz.
    pub frequency_step_hz: f32,
    /// Minimum number of samples per analysis call. Shorter buffers are
    /// rejected with `EngineError::InsufficientSamples`.
    pub min_window_len: usize,
    /// RMS level (full scale 1.0) below which the call is reported as rest.
    /// Calibrated against RMS of the raw, DC-removed samples, before
    /// windowing.
    pub silence_rms_threshold: f32,
    /// Spectral estimation strategy.
    pub estimator: SpectralEstimator,
    /// Harmonic resolution strategy.
    pub resolver: HarmonicStrategy,
    /// If the magnitude at half the candidate frequency is at least this
    /// fraction of the candidate's own magnitude, the candidate is moved
    /// down an octave. Repeats while the half frequency stays in band.
    pub octave_ratio_threshold: f32,
    /// Best-bin magnitude relative to the spectrum mean below which the
    /// resolver reports no pitch.
    pub magnitude_floor_ratio: f32,
    /// Readings further than this many cents from the nearest semitone are
    /// reported as rest instead of guessing a note.
    pub cents_dead_zone: f32,
    /// Decibel value substituted for digital silence, so the intensity
    /// mapping never sees -infinity.
    pub db_floor: f32,
    /// The (low, high) decibel window mapped affinely onto intensity [0, 1].
    pub db_range: (f32, f32),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_frequency_hz: 50.0,
            max_frequency_hz: 1200.0,
            frequency_step_hz: 2.0,
            min_window_len: 2048,
            silence_rms_threshold: 0.015,
            estimator: SpectralEstimator::Swept,
            resolver: HarmonicStrategy::PenalizedPeaks {
                second: 0.6,
                third: 0.3,
            },
            octave_ratio_threshold: 0.7,
            magnitude_floor_ratio: 0.05,
            cents_dead_zone: 25.0,
            db_floor: -100.0,
            db_range: (-60.0, -5.0),
        }
    }
}

impl EngineConfig {
    /// Checks the configuration for internal consistency.
    ///
    /// Called once per detection call before any processing, so the
    /// numeric pipeline can assume a sane band and step.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.min_frequency_hz.is_finite()
            || !self.max_frequency_hz.is_finite()
            || self.min_frequency_hz <= 0.0
        {
            return Err(EngineError::InvalidConfig(
                "analysis band edges must be finite and positive",
            ));
        }
        if self.max_frequency_hz <= self.min_frequency_hz {
            return Err(EngineError::InvalidConfig(
                "max_frequency_hz must exceed min_frequency_hz",
            ));
        }
        if !(self.frequency_step_hz > 0.0) || !self.frequency_step_hz.is_finite() {
            return Err(EngineError::InvalidConfig(
                "frequency_step_hz must be finite and positive",
            ));
        }
        if self.min_window_len == 0 {
            return Err(EngineError::InvalidConfig(
                "min_window_len must be non-zero",
            ));
        }
        if let HarmonicStrategy::HarmonicProduct { harmonics } = self.resolver {
            if harmonics == 0 {
                return Err(EngineError::InvalidConfig(
                    "harmonic count must be non-zero",
                ));
            }
        }
        if self.db_range.1 <= self.db_range.0 {
            return Err(EngineError::InvalidConfig(
                "db_range must be ordered (low, high)",
            ));
        }
        Ok(())
    }
}
