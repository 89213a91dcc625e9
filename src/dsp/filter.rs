//! Shelf high-pass filter
//!
//! One coefficient design feeds two realisations of the same 2nd-order
//! high-pass:
//! - a TPT state-variable filter, run sample by sample on the audio thread
//! - RBJ cookbook biquad coefficients, evaluated analytically for display
//!
//! Both are bilinear transforms of `s² / (s² + s/Q + 1)` prewarped at the
//! cutoff, so their transfer functions are identical.

use std::f64::consts::PI;

use rustfft::num_complex::Complex;

use crate::params::{CUTOFF_RANGE, GAIN_RANGE, RESONANCE_RANGE};

// ============================================================================
// Constants
// ============================================================================

/// Lowest cutoff the filter will be designed at
pub const MIN_CUTOFF_HZ: f64 = 10.0;

/// Highest cutoff as a fraction of the sample rate (just under Nyquist)
pub const MAX_CUTOFF_RATIO: f64 = 0.49;

/// Q bounds after gain coupling
pub const MIN_Q: f64 = 0.1;
pub const MAX_Q: f64 = 2.0;

/// Q added per dB of gain
pub const GAIN_Q_COUPLING: f64 = 0.02;

/// Integrator states below this magnitude are flushed to zero.
/// Non-finite states are cleared as well.
pub const DENORMAL_THRESHOLD: f64 = 1e-20;

/// Sample rate used when a design is requested with an unusable rate
pub const FALLBACK_SAMPLE_RATE: f64 = 44100.0;

/// Maximum number of channels a filter bank can be prepared for
pub const MAX_CHANNELS: usize = 2;

// ============================================================================
// Design
// ============================================================================

/// Effective filter parameters for one block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDesign {
    /// Cutoff after drift and clamping
    pub cutoff_hz: f64,
    /// Q after gain coupling and clamping
    pub q: f64,
    pub sample_rate: f64,
}

impl FilterDesign {
    /// Derive the effective design from raw parameter values.
    ///
    /// `effective_cutoff = cutoff · (1 + drift)` and
    /// `effective_q = resonance + gain_db · 0.02`. Non-finite inputs fall
    /// back to parameter defaults (zero for drift).
    pub fn derive(
        cutoff_hz: f32,
        resonance: f32,
        gain_db: f32,
        drift: f64,
        sample_rate: f64,
    ) -> Self {
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        } else {
            FALLBACK_SAMPLE_RATE
        };

        let cutoff = finite_or(cutoff_hz, CUTOFF_RANGE.default);
        let resonance = finite_or(resonance, RESONANCE_RANGE.default);
        let gain_db = finite_or(gain_db, GAIN_RANGE.default);
        let drift = if drift.is_finite() { drift } else { 0.0 };

        let upper = sample_rate * MAX_CUTOFF_RATIO;
        let lower = MIN_CUTOFF_HZ.min(upper);
        let cutoff_hz = (cutoff * (1.0 + drift)).clamp(lower, upper);

        let q = (resonance + gain_db * GAIN_Q_COUPLING).clamp(MIN_Q, MAX_Q);

        Self {
            cutoff_hz,
            q,
            sample_rate,
        }
    }

    /// State-variable coefficients for the audio path
    pub fn svf_coeffs(&self) -> SvfCoeffs {
        let g = (PI * self.cutoff_hz / self.sample_rate).tan();
        let k = 1.0 / self.q;
        let a1 = 1.0 / (1.0 + g * (g + k));
        let a2 = g * a1;
        let a3 = g * a2;
        SvfCoeffs { a1, a2, a3, k }
    }

    /// RBJ cookbook high-pass coefficients, normalised so `a0 = 1`
    pub fn biquad_coeffs(&self) -> BiquadCoeffs {
        let omega = 2.0 * PI * self.cutoff_hz / self.sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * self.q);

        let a0 = 1.0 + alpha;
        BiquadCoeffs {
            b0: ((1.0 + cos_omega) / 2.0) / a0,
            b1: (-(1.0 + cos_omega)) / a0,
            b2: ((1.0 + cos_omega) / 2.0) / a0,
            a1: (-2.0 * cos_omega) / a0,
            a2: (1.0 - alpha) / a0,
        }
    }
}

#[inline]
fn finite_or(value: f32, fallback: f32) -> f64 {
    if value.is_finite() {
        value as f64
    } else {
        fallback as f64
    }
}

// ============================================================================
// Coefficients
// ============================================================================

/// TPT state-variable coefficients (`g = tan(π·fc/fs)`, `k = 1/Q`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvfCoeffs {
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub k: f64,
}

impl Default for SvfCoeffs {
    fn default() -> Self {
        FilterDesign::derive(
            CUTOFF_RANGE.default,
            RESONANCE_RANGE.default,
            GAIN_RANGE.default,
            0.0,
            FALLBACK_SAMPLE_RATE,
        )
        .svf_coeffs()
    }
}

/// Normalised biquad coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Evaluate `H(z)` at `z = e^{jω}` for the given frequency
    pub fn response(&self, freq_hz: f64, sample_rate: f64) -> Complex<f64> {
        let omega = 2.0 * PI * freq_hz / sample_rate;
        // z^-1 and z^-2
        let z1 = Complex::from_polar(1.0, -omega);
        let z2 = z1 * z1;

        let num = Complex::new(self.b0, 0.0) + z1 * self.b1 + z2 * self.b2;
        let den = Complex::new(1.0, 0.0) + z1 * self.a1 + z2 * self.a2;
        num / den
    }
}

// ============================================================================
// Per-channel state
// ============================================================================

/// Integrator state of one high-pass channel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighPassState {
    ic1eq: f64,
    ic2eq: f64,
}

impl HighPassState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single sample and return the high-pass output
    #[inline]
    pub fn process_sample(&mut self, coeffs: &SvfCoeffs, v0: f64) -> f64 {
        let v3 = v0 - self.ic2eq;
        let v1 = coeffs.a1 * self.ic1eq + coeffs.a2 * v3;
        let v2 = self.ic2eq + coeffs.a2 * self.ic1eq + coeffs.a3 * v3;
        self.ic1eq = flush_denormal(2.0 * v1 - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        v0 - coeffs.k * v1 - v2
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    /// True when both integrators are exactly zero
    pub fn is_cleared(&self) -> bool {
        self.ic1eq == 0.0 && self.ic2eq == 0.0
    }
}

#[inline]
fn flush_denormal(x: f64) -> f64 {
    if !x.is_finite() || x.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        x
    }
}

// ============================================================================
// Filter Bank
// ============================================================================

/// One high-pass state per channel sharing one coefficient set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBank {
    states: Vec<HighPassState>,
    coeffs: SvfCoeffs,
}

impl FilterBank {
    pub fn new(num_channels: usize) -> Self {
        Self {
            states: vec![HighPassState::new(); num_channels],
            coeffs: SvfCoeffs::default(),
        }
    }

    pub fn num_channels(&self) -> usize {
        self.states.len()
    }

    /// Install the coefficients for the next block
    pub fn set_design(&mut self, design: &FilterDesign) {
        self.coeffs = design.svf_coeffs();
    }

    /// Replace `samples` with the high-passed signal of `channel`.
    ///
    /// Channels without a provisioned state are left untouched.
    pub fn process_channel(&mut self, channel: usize, samples: &mut [f32]) {
        let coeffs = self.coeffs;
        if let Some(state) = self.states.get_mut(channel) {
            for sample in samples.iter_mut() {
                *sample = state.process_sample(&coeffs, *sample as f64) as f32;
            }
        }
    }

    pub fn state(&self, channel: usize) -> Option<&HighPassState> {
        self.states.get(channel)
    }

    pub fn reset(&mut self) {
        for state in &mut self.states {
            state.reset();
        }
    }
}
