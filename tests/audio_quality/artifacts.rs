//! Artifact Detection Tests
//!
//! Tests to detect unwanted artifacts: noise on silence, non-finite output,
//! clipping and clicks on parameter changes.

use test_case::test_case;
use treble::engine::analysis::{calculate_peak, count_clipped_samples, count_non_finite, max_sample_jump};
use treble::engine::AudioBuffer;
use treble::{Mode, ParameterSnapshot, TrebleMaker};

use super::{noise, process_in_blocks, BLOCK_SIZE, SAMPLE_RATE};

#[test]
fn test_silence_remains_silence() {
    let mut processor = TrebleMaker::new();
    processor.prepare(44100.0, 512, 2).unwrap();
    let params = ParameterSnapshot::boost(8000.0, 2.0, 0.7);

    for _ in 0..16 {
        let mut block = vec![vec![0.0_f32; 512]; 2];
        processor.process_block_with(&mut block, &params);
        assert!(
            block.iter().flatten().all(|&s| s == 0.0),
            "silence in must give silence out"
        );
    }
}

#[test_case(2000.0, 8.0, 1.5, Mode::Boost ; "low cutoff max boost max q")]
#[test_case(20000.0, 8.0, 1.5, Mode::Boost ; "top cutoff max boost")]
#[test_case(8000.0, 8.0, 0.1, Mode::Cut ; "max cut min q")]
#[test_case(20000.0, 0.0, 0.1, Mode::Cut ; "top cutoff zero cut")]
fn test_full_scale_input_stays_bounded(cutoff: f32, gain: f32, q: f32, mode: Mode) {
    for sample_rate in [44100, 96000, 192000] {
        let mut buffer = AudioBuffer::from_channels(
            vec![noise(16384, 1.0, 7), noise(16384, 1.0, 8)],
            sample_rate,
        )
        .unwrap();
        process_in_blocks(&mut buffer, BLOCK_SIZE, |_| {
            ParameterSnapshot::new(cutoff, gain, q, mode)
        });

        for channel in &buffer.samples {
            assert_eq!(count_non_finite(channel), 0);
            assert!(
                channel.iter().all(|s| (-1.0..=1.0).contains(s)),
                "output escaped [-1, 1] at {} Hz",
                sample_rate
            );
        }
    }
}

#[test_case(2000.0, 1.5, 3000.0 ; "resonant peak")]
#[test_case(8000.0, 0.7, 12000.0 ; "default shelf")]
#[test_case(4000.0, 1.0, 18000.0 ; "top octave")]
fn test_program_level_stays_clear_of_guard(cutoff: f32, q: f32, tone: f32) {
    // -20 dBFS through the strongest boost must not lean on the hard clamp
    let mut buffer = AudioBuffer::sine_wave(tone, 0.1, SAMPLE_RATE as usize, 2, SAMPLE_RATE);
    process_in_blocks(&mut buffer, BLOCK_SIZE, |_| ParameterSnapshot::boost(cutoff, 8.0, q));

    for channel in &buffer.samples {
        assert_eq!(count_clipped_samples(channel), 0);
        assert!(
            calculate_peak(channel) < 0.9,
            "peak {} too close to the clamp",
            calculate_peak(channel)
        );
    }
}

#[test]
fn test_out_of_range_parameters_are_clamped() {
    let mut buffer = AudioBuffer::from_channels(vec![noise(4096, 0.8, 9)], SAMPLE_RATE).unwrap();
    process_in_blocks(&mut buffer, BLOCK_SIZE, |block| match block % 3 {
        0 => ParameterSnapshot::boost(f32::NAN, 100.0, -4.0),
        1 => ParameterSnapshot::cut(1e9, f32::INFINITY, 50.0),
        _ => ParameterSnapshot::boost(-1.0, -30.0, f32::NAN),
    });
    assert_eq!(count_non_finite(buffer.channel(0)), 0);
}

#[test]
fn test_gain_jump_does_not_click() {
    let tone = AudioBuffer::sine_wave(10000.0, 0.25, BLOCK_SIZE * 4, 1, SAMPLE_RATE);

    let mut reference = tone.clone();
    process_in_blocks(&mut reference, BLOCK_SIZE, |_| {
        ParameterSnapshot::boost(8000.0, 8.0, 0.7)
    });

    let mut jumped = tone.clone();
    process_in_blocks(&mut jumped, BLOCK_SIZE, |block| {
        let gain = if block < 2 { 2.0 } else { 8.0 };
        ParameterSnapshot::boost(8000.0, gain, 0.7)
    });

    let reference_jump = max_sample_jump(reference.channel(0));
    let boundary = &jumped.channel(0)[BLOCK_SIZE * 2 - 4..BLOCK_SIZE * 2 + 4];
    let boundary_jump = max_sample_jump(boundary);
    let overall_jump = max_sample_jump(jumped.channel(0));

    assert!(
        boundary_jump <= reference_jump * 1.1,
        "gain step clicked: {} vs steady {}",
        boundary_jump,
        reference_jump
    );
    assert!(overall_jump <= reference_jump * 1.1);
}

#[test]
fn test_mode_switch_does_not_click() {
    let tone = AudioBuffer::sine_wave(12000.0, 0.25, BLOCK_SIZE * 4, 1, SAMPLE_RATE);

    let mut switched = tone.clone();
    process_in_blocks(&mut switched, BLOCK_SIZE, |block| {
        let mode = if block < 2 { Mode::Boost } else { Mode::Cut };
        ParameterSnapshot::new(8000.0, 8.0, 0.7, mode)
    });

    let mut steady = tone.clone();
    process_in_blocks(&mut steady, BLOCK_SIZE, |_| {
        ParameterSnapshot::cut(8000.0, 8.0, 0.7)
    });
    let mut boosted = tone.clone();
    process_in_blocks(&mut boosted, BLOCK_SIZE, |_| {
        ParameterSnapshot::boost(8000.0, 8.0, 0.7)
    });

    let bound = max_sample_jump(steady.channel(0)).max(max_sample_jump(boosted.channel(0)));
    let boundary = &switched.channel(0)[BLOCK_SIZE * 2 - 4..BLOCK_SIZE * 2 + 4];
    assert!(
        max_sample_jump(boundary) <= bound * 1.1,
        "mode switch clicked: {} vs {}",
        max_sample_jump(boundary),
        bound
    );
}
