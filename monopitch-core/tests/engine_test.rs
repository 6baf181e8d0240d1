//! End-to-end tests of the detection pipeline over synthesized signals.

use monopitch_core::{EngineConfig, EngineError, SpectralEstimator, detect_note};

fn sine(freq_hz: f32, amplitude: f32, sample_rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            amplitude * (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin()
        })
        .collect()
}

fn two_sines(
    f1: f32,
    a1: f32,
    f2: f32,
    a2: f32,
    sample_rate: u32,
    len: usize,
) -> Vec<f32> {
    let first = sine(f1, a1, sample_rate, len);
    let second = sine(f2, a2, sample_rate, len);
    first
        .iter()
        .zip(second.iter())
        .map(|(x, y)| x + y)
        .collect()
}

#[test]
fn a440_sine_is_classified_as_a4() {
    let cfg = EngineConfig::default();
    let samples = sine(440.0, 0.4, 44100, 5000);
    let result = detect_note(&samples, 44100, &cfg).unwrap();

    assert_eq!(result.label().as_deref(), Some("A4"));
    assert!(
        (result.frequency_hz - 440.0).abs() <= 2.0,
        "detected {} Hz",
        result.frequency_hz
    );
    assert!(result.intensity > 0.0);
}

#[test]
fn all_zero_buffer_is_a_rest_with_zero_intensity() {
    let cfg = EngineConfig::default();
    let samples = vec![0.0; 4096];
    let result = detect_note(&samples, 48000, &cfg).unwrap();

    assert!(result.is_rest());
    assert_eq!(result.frequency_hz, 0.0);
    assert_eq!(result.intensity, 0.0);
}

#[test]
fn sub_threshold_signal_is_a_rest_but_keeps_its_loudness() {
    let cfg = EngineConfig::default();
    // RMS of a 0.01-amplitude sine is ~0.007, below the 0.015 gate.
    let samples = sine(440.0, 0.01, 44100, 4096);
    let result = detect_note(&samples, 44100, &cfg).unwrap();

    assert!(result.is_rest());
    assert_eq!(result.frequency_hz, 0.0);
    // Ambient loudness is still reported during silence.
    assert!(result.intensity > 0.0);
}

#[test]
fn detection_tracks_sines_across_the_band() {
    let cfg = EngineConfig::default();
    // Equal-tempered pitches a semitone apart, A2 through A5.
    for semitone in 0..=36 {
        let freq = 110.0 * 2.0_f32.powf(semitone as f32 / 12.0);
        let samples = sine(freq, 0.5, 44100, 4096);
        let result = detect_note(&samples, 44100, &cfg).unwrap();

        assert!(
            (result.frequency_hz - freq).abs() <= cfg.frequency_step_hz,
            "{freq} Hz detected as {} Hz",
            result.frequency_hz
        );
        assert!(!result.is_rest(), "{freq} Hz reported as rest");
    }
}

#[test]
fn fundamental_wins_over_a_stronger_second_harmonic() {
    let cfg = EngineConfig::default();
    let samples = two_sines(220.0, 0.4, 440.0, 0.35, 44100, 4096);
    let result = detect_note(&samples, 44100, &cfg).unwrap();

    assert_eq!(result.label().as_deref(), Some("A3"));
    assert!(
        (result.frequency_hz - 220.0).abs() <= 2.0,
        "detected {} Hz",
        result.frequency_hz
    );
}

#[test]
fn quarter_tone_between_semitones_is_a_rest() {
    let cfg = EngineConfig::default();
    // 50 cents above A4, exactly between A4 and A#4.
    let freq = 440.0 * 2.0_f32.powf(0.5 / 12.0);
    let samples = sine(freq, 0.4, 44100, 4096);
    let result = detect_note(&samples, 44100, &cfg).unwrap();

    assert!(result.is_rest(), "got {:?}", result.label());
}

#[test]
fn fft_estimator_agrees_on_a4() {
    let cfg = EngineConfig {
        estimator: SpectralEstimator::Fft,
        ..EngineConfig::default()
    };
    let samples = sine(440.0, 0.4, 44100, 5000);
    let result = detect_note(&samples, 44100, &cfg).unwrap();

    assert_eq!(result.label().as_deref(), Some("A4"));
    assert!(
        (result.frequency_hz - 440.0).abs() <= 3.0,
        "detected {} Hz",
        result.frequency_hz
    );
}

#[test]
fn short_buffer_is_a_typed_error() {
    let cfg = EngineConfig::default();
    let samples = sine(440.0, 0.4, 44100, 1000);
    assert_eq!(
        detect_note(&samples, 44100, &cfg),
        Err(EngineError::InsufficientSamples {
            got: 1000,
            need: cfg.min_window_len,
        })
    );
}

#[test]
fn int16_input_matches_float_input() {
    let cfg = EngineConfig::default();
    let float_samples = sine(330.0, 0.5, 44100, 4096);
    let int_samples: Vec<i16> = float_samples
        .iter()
        .map(|&s| (s * i16::MAX as f32) as i16)
        .collect();

    let from_float = detect_note(&float_samples, 44100, &cfg).unwrap();
    let from_int =
        detect_note(&monopitch_core::samples_to_f32(&int_samples), 44100, &cfg).unwrap();

    assert_eq!(from_float.label(), from_int.label());
    assert!((from_float.frequency_hz - from_int.frequency_hz).abs() < 0.5);
}
