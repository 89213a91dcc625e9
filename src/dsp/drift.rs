//! Analog drift oscillator
//!
//! A slow sine LFO that nudges the shelf cutoff by a fraction of a percent,
//! advanced once per block.

use std::f64::consts::TAU;

// ============================================================================
// Constants
// ============================================================================

/// Drift rate in Hz
pub const DRIFT_RATE_HZ: f64 = 0.2;

/// Peak fractional deviation of the cutoff (0.5%)
pub const DRIFT_DEPTH: f64 = 0.005;

/// Block-rate drift LFO
#[derive(Debug, Clone, Default)]
pub struct DriftOscillator {
    phase: f64,
}

impl DriftOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase in radians, always in `[0, 2π)`
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Return the drift fraction for this block, then advance by its length.
    ///
    /// The returned value is taken from the phase before advancing. A
    /// zero-length block returns the current drift and leaves the phase as is.
    pub fn advance(&mut self, block_len: usize, sample_rate: f64) -> f64 {
        let drift = self.phase.sin() * DRIFT_DEPTH;

        if block_len > 0 && sample_rate > 0.0 && sample_rate.is_finite() {
            let increment = TAU * DRIFT_RATE_HZ * block_len as f64 / sample_rate;
            self.phase = (self.phase + increment).rem_euclid(TAU);
            // rem_euclid can round up to exactly TAU
            if self.phase >= TAU {
                self.phase = 0.0;
            }
        }

        drift
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
