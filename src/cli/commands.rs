//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use crate::dsp::TrebleMaker;
use crate::engine::{load_wav, render, save_wav_with_depth, AudioAnalysis};
use crate::error::Result;
use crate::params::ParameterSnapshot;
use crate::response::evaluate_response_curve;

/// Render `input` through the shelf into `output`.
pub fn render_file(
    input: &Path,
    output: &Path,
    params: &ParameterSnapshot,
    block_size: usize,
    bit_depth: u16,
) -> Result<()> {
    info!("Rendering {} -> {}", input.display(), output.display());
    info!(
        "Shelf: {} Hz, {} dB, Q {}, {}",
        params.cutoff_hz,
        params.gain_db,
        params.resonance,
        params.mode.to_str()
    );

    let mut buffer = load_wav(input)?;
    let mut processor = TrebleMaker::new();
    processor.params().store(params);

    let report = render(&mut processor, &mut buffer, block_size)?;
    save_wav_with_depth(&buffer, output, bit_depth)?;

    println!(
        "Rendered {} frames in {} blocks: {}",
        report.frames,
        report.blocks,
        output.display()
    );
    Ok(())
}

/// Print the response curve as a table or JSON.
pub fn print_response(
    params: &ParameterSnapshot,
    sample_rate: f64,
    points: usize,
    json: bool,
) -> Result<()> {
    info!("Evaluating response at {} Hz, {} points", sample_rate, points);

    let curve = evaluate_response_curve(params, sample_rate, points);

    if json {
        println!("{}", serde_json::to_string_pretty(&curve)?);
        return Ok(());
    }

    println!("{:>12}  {:>9}", "freq (Hz)", "dB");
    for point in curve.iter() {
        println!("{:>12.1}  {:>9.3}", point.frequency_hz, point.magnitude_db);
    }
    if let Some(peak) = curve.max_db() {
        println!("Peak: {:.2} dB", peak);
    }
    Ok(())
}

/// Analyse a WAV file and print the measurements.
pub fn analyze_file(input: &Path, json: bool) -> Result<()> {
    info!("Analyzing {}", input.display());

    let buffer = load_wav(input)?;
    let analysis = AudioAnalysis::analyze(&buffer);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", analysis.summary());
    }
    Ok(())
}
