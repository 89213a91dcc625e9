//! Audio Quality Tests
//!
//! No manual listening required - all verification via RMS, FFT, etc.

mod artifacts;
mod passthrough;
mod response_match;
mod stability;

use treble::engine::AudioBuffer;
use treble::{ParameterSnapshot, TrebleMaker};

pub const SAMPLE_RATE: u32 = 44100;
pub const BLOCK_SIZE: usize = 512;

/// Deterministic white-ish noise in [-amplitude, amplitude]
pub fn noise(len: usize, amplitude: f32, seed: u32) -> Vec<f32> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            ((state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0) * amplitude
        })
        .collect()
}

/// Run `buffer` through a freshly prepared processor in host-sized blocks,
/// switching parameters per block via `params_for_block`.
pub fn process_in_blocks<F>(buffer: &mut AudioBuffer, block_size: usize, mut params_for_block: F)
where
    F: FnMut(usize) -> ParameterSnapshot,
{
    let mut processor = TrebleMaker::new();
    treble::engine::render_automated(&mut processor, buffer, block_size, |start| {
        params_for_block(start / block_size)
    })
    .expect("render");
}
