//! Frequency-response evaluation
//!
//! Computes the shelf's magnitude response analytically from the same
//! [`FilterDesign`] the audio path uses, for display. Runs at UI rate and
//! never touches processor state.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::dsp::filter::{BiquadCoeffs, FilterDesign, FALLBACK_SAMPLE_RATE};
use crate::dsp::mix::{db_to_linear, linear_to_db, wet_coefficient};
use crate::params::ParameterSnapshot;

// ============================================================================
// Constants
// ============================================================================

/// Lowest frequency on the curve
pub const MIN_FREQUENCY_HZ: f64 = 20.0;

/// Magnitudes are floored here
pub const MIN_DB: f64 = -100.0;

/// Default number of curve points
pub const DEFAULT_POINTS: usize = 200;

/// Per-tick smoothing toward the live parameters
pub const UI_SMOOTHING: f32 = 0.15;

/// Decorative ripple amplitude in dB
pub const RIPPLE_DEPTH_DB: f64 = 0.15;

/// Ripple phase offset between adjacent points
pub const RIPPLE_SPREAD: f64 = 0.3;

/// Ripple phase advance per tick
pub const RIPPLE_SPEED: f64 = 0.05;

// ============================================================================
// Curve
// ============================================================================

/// One point of a response curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponsePoint {
    pub frequency_hz: f64,
    pub magnitude_db: f64,
}

/// Magnitude response sampled on a log frequency axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseCurve {
    pub sample_rate: f64,
    pub points: Vec<ResponsePoint>,
}

impl ResponseCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResponsePoint> {
        self.points.iter()
    }

    /// Largest magnitude on the curve
    pub fn max_db(&self) -> Option<f64> {
        self.points.iter().map(|p| p.magnitude_db).reduce(f64::max)
    }
}

#[inline]
fn gain_to_db(magnitude: f64) -> f64 {
    linear_to_db(magnitude).max(MIN_DB)
}

#[inline]
fn usable_sample_rate(sample_rate: f64) -> f64 {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        sample_rate
    } else {
        FALLBACK_SAMPLE_RATE
    }
}

/// Frequency of point `index` of `points`, log-spaced from 20 Hz to Nyquist
pub fn curve_frequency(index: usize, points: usize, sample_rate: f64) -> f64 {
    let nyquist = usable_sample_rate(sample_rate) / 2.0;
    if points < 2 {
        return MIN_FREQUENCY_HZ.min(nyquist);
    }

    let ratio = (nyquist / MIN_FREQUENCY_HZ).max(1.0);
    let t = index as f64 / (points - 1) as f64;
    (MIN_FREQUENCY_HZ * ratio.powf(t)).min(nyquist)
}

/// Shelf transfer function ready for evaluation
struct Shelf {
    coeffs: BiquadCoeffs,
    wet: f64,
    sample_rate: f64,
}

impl Shelf {
    /// `sample_rate` must already be usable. Parameters are taken as given.
    fn new(params: &ParameterSnapshot, sample_rate: f64) -> Self {
        let coeffs = FilterDesign::derive(
            params.cutoff_hz,
            params.resonance,
            params.gain_db,
            0.0,
            sample_rate,
        )
        .biquad_coeffs();

        Self {
            coeffs,
            wet: wet_coefficient(params.mode, db_to_linear(params.gain_db as f64) as f32) as f64,
            sample_rate,
        }
    }

    /// `|1 + c·H(e^{jω})|` in dB
    fn magnitude_db(&self, frequency_hz: f64) -> f64 {
        let total = self.coeffs.response(frequency_hz, self.sample_rate) * self.wet + 1.0;
        gain_to_db(total.norm())
    }

    fn curve(&self, points: usize) -> ResponseCurve {
        let points = (0..points)
            .map(|i| {
                let frequency_hz = curve_frequency(i, points, self.sample_rate);
                ResponsePoint {
                    frequency_hz,
                    magnitude_db: self.magnitude_db(frequency_hz),
                }
            })
            .collect();

        ResponseCurve {
            sample_rate: self.sample_rate,
            points,
        }
    }
}

/// Magnitude in dB of the full shelf (dry plus mixed high-pass) at one frequency
pub fn magnitude_db_at(params: &ParameterSnapshot, frequency_hz: f64, sample_rate: f64) -> f64 {
    let sample_rate = usable_sample_rate(sample_rate);
    let f = frequency_hz.clamp(0.0, sample_rate / 2.0);
    Shelf::new(&params.clamped(), sample_rate).magnitude_db(f)
}

/// Evaluate the shelf response at `points` log-spaced frequencies.
///
/// Drift is not applied. An unusable sample rate falls back to 44.1 kHz.
pub fn evaluate_response_curve(
    params: &ParameterSnapshot,
    sample_rate: f64,
    points: usize,
) -> ResponseCurve {
    Shelf::new(&params.clamped(), usable_sample_rate(sample_rate)).curve(points)
}

// ============================================================================
// UI-rate evaluator
// ============================================================================

/// Animated response curve for an editor.
///
/// Each [`tick`](Self::tick) eases the displayed cutoff, gain and Q toward
/// the live values and optionally overlays a moving ripple.
#[derive(Debug, Clone)]
pub struct ResponseEvaluator {
    sample_rate: f64,
    num_points: usize,
    ripple: bool,
    ripple_phase: f64,
    smoothed: ParameterSnapshot,
    curve: ResponseCurve,
}

impl Default for ResponseEvaluator {
    fn default() -> Self {
        Self::new(FALLBACK_SAMPLE_RATE, DEFAULT_POINTS)
    }
}

impl ResponseEvaluator {
    pub fn new(sample_rate: f64, num_points: usize) -> Self {
        Self {
            sample_rate: usable_sample_rate(sample_rate),
            num_points,
            ripple: true,
            ripple_phase: 0.0,
            smoothed: Self::initial_display(),
            curve: ResponseCurve::default(),
        }
    }

    fn initial_display() -> ParameterSnapshot {
        ParameterSnapshot::boost(1000.0, 0.0, 0.5)
    }

    /// Enable or disable the decorative ripple
    pub fn with_ripple(mut self, ripple: bool) -> Self {
        self.ripple = ripple;
        self
    }

    /// Parameters currently displayed
    pub fn smoothed(&self) -> &ParameterSnapshot {
        &self.smoothed
    }

    pub fn curve(&self) -> &ResponseCurve {
        &self.curve
    }

    /// Advance one UI frame toward `live` and recompute the curve
    pub fn tick(&mut self, live: &ParameterSnapshot) -> &ResponseCurve {
        let target = live.clamped();
        let s = &mut self.smoothed;
        s.cutoff_hz += (target.cutoff_hz - s.cutoff_hz) * UI_SMOOTHING;
        s.gain_db += (target.gain_db - s.gain_db) * UI_SMOOTHING;
        s.resonance += (target.resonance - s.resonance) * UI_SMOOTHING;
        s.mode = target.mode;

        // Unclamped: the eased start value of 1 kHz sits below the cutoff range
        self.curve = Shelf::new(&self.smoothed, self.sample_rate).curve(self.num_points);

        if self.ripple {
            for (i, point) in self.curve.points.iter_mut().enumerate() {
                point.magnitude_db +=
                    RIPPLE_DEPTH_DB * (self.ripple_phase + i as f64 * RIPPLE_SPREAD).sin();
            }
            self.ripple_phase = (self.ripple_phase + RIPPLE_SPEED) % TAU;
        }

        &self.curve
    }

    /// Jump the display to `live` without easing
    pub fn snap_to(&mut self, live: &ParameterSnapshot) {
        self.smoothed = live.clamped();
    }

    pub fn reset(&mut self) {
        self.smoothed = Self::initial_display();
        self.ripple_phase = 0.0;
        self.curve = ResponseCurve::default();
    }
}
