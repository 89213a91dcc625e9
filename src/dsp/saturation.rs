//! Soft saturation stage
//!
//! Biased tanh waveshaper applied after the boost mix. The bias adds a touch
//! of even harmonics; subtracting `tanh(bias)` removes the DC it would
//! introduce and dividing by `tanh(drive + bias) - tanh(bias)` keeps a
//! full-scale input at full scale.

use crate::params::Mode;

// ============================================================================
// Constants
// ============================================================================

/// Gain above which the boost path saturates (dB)
pub const SATURATION_THRESHOLD_DB: f32 = 0.1;

/// Waveshaper bias
pub const SATURATION_BIAS: f32 = 0.15;

/// One-pole coefficient for the drive smoother (per block)
pub const DRIVE_SMOOTHING: f32 = 0.95;

/// Drive added per dB of gain
pub const DRIVE_PER_DB: f32 = 0.08;

/// Gain at which the shaped signal is fully blended in (dB)
pub const FULL_BLEND_GAIN_DB: f32 = 12.0;

/// Normalising denominators smaller than this skip shaping
const MIN_NORMALISATION: f32 = 1e-9;

// ============================================================================
// Waveshaping
// ============================================================================

/// DC-corrected, normalised biased tanh
#[inline]
fn waveshape(x: f32, drive: f32, tanh_bias: f32, norm: f32) -> f32 {
    ((x * drive + SATURATION_BIAS).tanh() - tanh_bias) / norm
}

/// Per-block shaping parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationBlock {
    pub drive: f32,
    /// Blend at the start of the block
    pub blend_from: f32,
    /// Blend reached on the last sample
    pub blend_to: f32,
}

impl SaturationBlock {
    /// Shape `samples` in place, ramping the blend across the block
    pub fn apply(&self, samples: &mut [f32]) {
        let tanh_bias = SATURATION_BIAS.tanh();
        let norm = (self.drive + SATURATION_BIAS).tanh() - tanh_bias;
        if !norm.is_finite() || norm.abs() < MIN_NORMALISATION {
            return;
        }

        let len = samples.len();
        if len == 0 {
            return;
        }
        let step = (self.blend_to - self.blend_from) / len as f32;

        for (i, sample) in samples.iter_mut().enumerate() {
            let blend = if i + 1 == len {
                self.blend_to
            } else {
                self.blend_from + step * (i + 1) as f32
            };
            let x = *sample;
            let shaped = waveshape(x, self.drive, tanh_bias, norm);
            *sample = shaped * blend + x * (1.0 - blend);
        }
    }
}

// ============================================================================
// Saturator
// ============================================================================

/// Saturation state carried across blocks
#[derive(Debug, Clone, Default)]
pub struct Saturator {
    smooth_drive: f32,
    blend: f32,
}

impl Saturator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Smoothed drive (starts at 0)
    pub fn drive(&self) -> f32 {
        self.smooth_drive
    }

    /// Blend reached at the end of the last block
    pub fn blend(&self) -> f32 {
        self.blend
    }

    /// Whether the shaper is engaged for the given parameters
    #[inline]
    pub fn is_active(gain_db: f32, mode: Mode) -> bool {
        mode == Mode::Boost && gain_db > SATURATION_THRESHOLD_DB
    }

    /// Advance the block-rate state and return how to shape this block.
    ///
    /// The drive smoother only moves while the shaper is active. When it
    /// turns off, the previous blend fades to zero over one more block
    /// before `None` is returned.
    pub fn begin_block(&mut self, gain_db: f32, mode: Mode) -> Option<SaturationBlock> {
        let blend_from = self.blend;

        let blend_to = if Self::is_active(gain_db, mode) {
            let target = 1.0 + gain_db * DRIVE_PER_DB;
            self.smooth_drive = self.smooth_drive * DRIVE_SMOOTHING + target * (1.0 - DRIVE_SMOOTHING);
            (gain_db / FULL_BLEND_GAIN_DB).min(1.0)
        } else {
            0.0
        };
        self.blend = blend_to;

        if blend_from == 0.0 && blend_to == 0.0 {
            return None;
        }

        Some(SaturationBlock {
            drive: self.smooth_drive,
            blend_from,
            blend_to,
        })
    }

    pub fn reset(&mut self) {
        self.smooth_drive = 0.0;
        self.blend = 0.0;
    }
}
