//! Response Agreement Tests
//!
//! The analytic curve must match what the audio path actually does.

use approx::assert_abs_diff_eq;
use test_case::test_case;
use treble::engine::analysis::gain_db;
use treble::dsp::saturation::{DRIVE_PER_DB, FULL_BLEND_GAIN_DB, SATURATION_BIAS};
use treble::engine::AudioBuffer;
use treble::response::magnitude_db_at;
use treble::ParameterSnapshot;

use super::{process_in_blocks, BLOCK_SIZE, SAMPLE_RATE};

#[test_case(1000.0 ; "below shelf")]
#[test_case(6000.0 ; "below cutoff")]
#[test_case(8000.0 ; "at cutoff")]
#[test_case(12000.0 ; "above cutoff")]
#[test_case(18000.0 ; "top octave")]
fn test_cut_mode_matches_evaluator(freq: f32) {
    let params = ParameterSnapshot::cut(8000.0, 6.0, 0.7);
    let input = AudioBuffer::sine_wave(freq, 0.2, SAMPLE_RATE as usize, 1, SAMPLE_RATE);

    let mut output = input.clone();
    process_in_blocks(&mut output, BLOCK_SIZE, |_| params);

    let settled = 4096;
    let measured = gain_db(&input.channel(0)[settled..], &output.channel(0)[settled..]);
    let predicted = magnitude_db_at(&params, freq as f64, SAMPLE_RATE as f64) as f32;

    assert_abs_diff_eq!(measured, predicted, epsilon = 0.25);
}

#[test]
fn test_boost_rises_toward_gain() {
    // Small signal keeps the saturator close to linear
    let params = ParameterSnapshot::boost(4000.0, 0.1, 0.7);
    let input = AudioBuffer::sine_wave(19000.0, 0.1, SAMPLE_RATE as usize, 1, SAMPLE_RATE);

    let mut output = input.clone();
    process_in_blocks(&mut output, BLOCK_SIZE, |_| params);

    let measured = gain_db(&input.channel(0)[4096..], &output.channel(0)[4096..]);
    let predicted = magnitude_db_at(&params, 19000.0, SAMPLE_RATE as f64) as f32;
    assert_abs_diff_eq!(measured, predicted, epsilon = 0.05);
}

#[test]
fn test_boost_saturation_lifts_whole_band() {
    // The displayed curve is the linear shelf only. In boost the shaper's
    // small-signal slope, blended in, raises every frequency on top of it.
    let params = ParameterSnapshot::boost(4000.0, 8.0, 0.7);
    let input = AudioBuffer::sine_wave(200.0, 0.05, SAMPLE_RATE as usize * 2, 1, SAMPLE_RATE);

    let mut output = input.clone();
    process_in_blocks(&mut output, BLOCK_SIZE, |_| params);

    // Drive has converged by then
    let settled = SAMPLE_RATE as usize * 3 / 2;
    let measured = gain_db(&input.channel(0)[settled..], &output.channel(0)[settled..]);
    let displayed = magnitude_db_at(&params, 200.0, SAMPLE_RATE as f64) as f32;

    let drive = 1.0 + 8.0 * DRIVE_PER_DB;
    let tanh_bias = SATURATION_BIAS.tanh();
    let slope = drive * (1.0 - tanh_bias * tanh_bias) / ((drive + SATURATION_BIAS).tanh() - tanh_bias);
    let blend = 8.0 / FULL_BLEND_GAIN_DB;
    let lift = 20.0 * (blend * slope + 1.0 - blend).log10();

    assert!(displayed.abs() < 0.1, "200 Hz sits below the shelf, shown {}", displayed);
    assert_abs_diff_eq!(measured, displayed + lift, epsilon = 0.2);
    assert!(
        measured - displayed > 3.0,
        "expected a broadband saturation lift, measured {} vs shown {}",
        measured,
        displayed
    );
}
