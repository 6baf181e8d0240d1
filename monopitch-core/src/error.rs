//! Error types for the detection engine.

use thiserror::Error;

/// Errors reported at the engine's input boundary.
///
/// Only malformed input is an error. "No pitch heard" is a first-class
/// outcome and is returned as a rest result, never through this type.
/// Numeric edge cases deeper in the pipeline (degenerate interpolation,
/// empty spectra) are absorbed internally and degrade to a less refined
/// but still valid result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The input buffer is shorter than the minimum analysis window.
    #[error("insufficient samples: got {got}, need at least {need}")]
    InsufficientSamples { got: usize, need: usize },

    /// The sample rate is zero.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// The engine configuration is internally inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
