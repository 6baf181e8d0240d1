//! Command-line harness for the detection engine.
//!
//! Reads a decoded PCM WAV file, runs the engine once per analysis window,
//! and prints one JSON `NoteResult` per line. Decoding arbitrary containers
//! down to WAV is left to the caller (e.g. ffmpeg), as is anything done
//! with the results.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use monopitch_core::{EngineConfig, detect_note};

#[derive(Parser)]
#[command(name = "monopitch", about = "Classify the notes in a mono PCM WAV file")]
struct Args {
    /// Path to the WAV file to analyze.
    wav: PathBuf,

    /// Samples per analysis window.
    #[arg(long, default_value_t = 4096)]
    window: usize,

    /// JSON file with a full `EngineConfig`; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lower edge of the analysis band in Hz.
    #[arg(long)]
    min_freq: Option<f32>,

    /// Upper edge of the analysis band in Hz.
    #[arg(long)]
    max_freq: Option<f32>,

    /// Spectral step of the swept estimator in Hz.
    #[arg(long)]
    step: Option<f32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;

    let (samples, sample_rate) = read_wav(&args.wav)
        .with_context(|| format!("failed to read {}", args.wav.display()))?;

    if args.window < config.min_window_len {
        bail!(
            "window of {} samples is below the engine minimum of {}",
            args.window,
            config.min_window_len
        );
    }

    let mut windows = 0usize;
    for chunk in samples.chunks(args.window) {
        // The trailing partial window is dropped rather than zero-padded.
        if chunk.len() < config.min_window_len {
            break;
        }
        let result = detect_note(chunk, sample_rate, &config)
            .context("analysis failed")?;
        println!("{}", serde_json::to_string(&result)?);
        windows += 1;
    }

    eprintln!(
        "[ANALYZE] {} window(s) of {} samples at {} Hz",
        windows, args.window, sample_rate
    );
    Ok(())
}

/// Loads the engine configuration, starting from the defaults or a JSON
/// file and applying any command-line overrides.
fn build_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config in {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(min) = args.min_freq {
        config.min_frequency_hz = min;
    }
    if let Some(max) = args.max_freq {
        config.max_frequency_hz = max;
    }
    if let Some(step) = args.step {
        config.frequency_step_hz = step;
    }

    config.validate()?;
    Ok(config)
}

/// Reads a WAV file into normalized f32 samples plus its sample rate.
///
/// Multi-channel files are mixed down by averaging the channels, and
/// integer PCM is scaled to full scale 1.0.
fn read_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .context("malformed float samples")?,
        hound::SampleFormat::Int => {
            let full_scale = ((1u32 << (spec.bits_per_sample - 1)) - 1) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()
                .context("malformed integer samples")?
        }
    };

    Ok((
        mixdown(&interleaved, spec.channels),
        spec.sample_rate,
    ))
}

/// Averages interleaved channels into a mono buffer.
fn mixdown(interleaved: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
