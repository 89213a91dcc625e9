//! Dry/wet mix stage
//!
//! The shelf is built as `dry + c · highpass(dry)`:
//! - boost: `c = G - 1`, so the top end rises to `G` while the lows stay at unity
//! - cut: `c = -G`, the high-passed band is scaled and subtracted
//!
//! The result is written over the wet buffer.

use crate::params::Mode;

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert linear amplitude to decibels, `-inf` for silence
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Coefficient applied to the wet signal before adding it to dry
#[inline]
pub fn wet_coefficient(mode: Mode, gain_linear: f32) -> f32 {
    match mode {
        Mode::Boost => gain_linear - 1.0,
        Mode::Cut => -gain_linear,
    }
}

/// `wet = dry + wet · coeff`
pub fn mix(wet: &mut [f32], dry: &[f32], coeff: f32) {
    for (w, &d) in wet.iter_mut().zip(dry) {
        *w = d + *w * coeff;
    }
}

/// Like [`mix`], with the coefficient moving linearly from `from` to `to`
/// across the block. The last sample uses exactly `to`.
pub fn mix_ramped(wet: &mut [f32], dry: &[f32], from: f32, to: f32) {
    if from == to {
        mix(wet, dry, to);
        return;
    }

    let len = wet.len().min(dry.len());
    if len == 0 {
        return;
    }

    let step = (to - from) / len as f32;
    for (i, (w, &d)) in wet.iter_mut().zip(dry).enumerate() {
        let coeff = if i + 1 == len {
            to
        } else {
            from + step * (i + 1) as f32
        };
        *w = d + *w * coeff;
    }
}
