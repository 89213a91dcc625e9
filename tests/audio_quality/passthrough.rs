//! Transparency Tests
//!
//! Settings that should leave (parts of) the signal alone.

use treble::engine::analysis::calculate_rms;
use treble::engine::AudioBuffer;
use treble::ParameterSnapshot;

use super::{noise, process_in_blocks, BLOCK_SIZE, SAMPLE_RATE};

#[test]
fn test_boost_at_zero_gain_is_bit_perfect() {
    let input = AudioBuffer::from_channels(
        vec![noise(8192, 0.9, 1), noise(8192, 0.9, 2)],
        SAMPLE_RATE,
    )
    .unwrap();

    for cutoff in [2000.0, 8000.0, 20000.0] {
        let mut output = input.clone();
        process_in_blocks(&mut output, BLOCK_SIZE, |_| {
            ParameterSnapshot::boost(cutoff, 0.0, 1.5)
        });
        assert_eq!(output, input, "boost at 0 dB altered audio at {} Hz", cutoff);
    }
}

#[test]
fn test_cut_at_zero_gain_removes_content_above_shelf() {
    let input = AudioBuffer::sine_wave(18000.0, 0.5, SAMPLE_RATE as usize, 1, SAMPLE_RATE);
    let mut output = input.clone();
    process_in_blocks(&mut output, BLOCK_SIZE, |_| {
        ParameterSnapshot::cut(2000.0, 0.0, 1.5)
    });

    let settled = 4096;
    let ratio = calculate_rms(&output.channel(0)[settled..]) / calculate_rms(&input.channel(0)[settled..]);
    assert!(
        ratio < 0.05,
        "cut at 0 dB should nearly cancel 18 kHz, residual ratio {}",
        ratio
    );
}

#[test]
fn test_cut_keeps_content_below_shelf() {
    let input = AudioBuffer::sine_wave(200.0, 0.5, SAMPLE_RATE as usize, 1, SAMPLE_RATE);
    let mut output = input.clone();
    process_in_blocks(&mut output, BLOCK_SIZE, |_| {
        ParameterSnapshot::cut(8000.0, 8.0, 0.7)
    });

    let settled = 4096;
    let ratio = calculate_rms(&output.channel(0)[settled..]) / calculate_rms(&input.channel(0)[settled..]);
    assert!((ratio - 1.0).abs() < 0.01, "lows should pass at unity, got {}", ratio);
}

#[test]
fn test_sample_count_preserved() {
    let input = AudioBuffer::sine_wave(3000.0, 0.5, 12_345, 2, 48000);
    let mut output = input.clone();
    process_in_blocks(&mut output, 300, |_| ParameterSnapshot::default());
    assert_eq!(output.len(), input.len());
    assert_eq!(output.channels(), 2);
}
