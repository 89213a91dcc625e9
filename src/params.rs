//! Parameter schema and shared parameter registry
//!
//! The processor reads one [`ParameterSnapshot`] per block. Snapshots come
//! from any [`ParameterSource`]; [`TrebleParams`] is the lock-free registry a
//! UI or host thread writes into while the audio thread reads from it.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrebleError};

// ============================================================================
// Ranges
// ============================================================================

/// Inclusive range and default for a continuous parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamRange {
    /// Clamp `value` into the range, mapping NaN/Inf to the default
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.default
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Cutoff frequency in Hz
pub const CUTOFF_RANGE: ParamRange = ParamRange {
    min: 2000.0,
    max: 20000.0,
    default: 8000.0,
};

/// Gain in dB
pub const GAIN_RANGE: ParamRange = ParamRange {
    min: 0.0,
    max: 8.0,
    default: 2.0,
};

/// Resonance (filter Q)
pub const RESONANCE_RANGE: ParamRange = ParamRange {
    min: 0.1,
    max: 1.5,
    default: 0.7,
};

/// Look up a range by parameter name
pub fn param_range(name: &str) -> Option<ParamRange> {
    match name {
        "cutoff_hz" | "freq" => Some(CUTOFF_RANGE),
        "gain_db" | "gain" => Some(GAIN_RANGE),
        "resonance" | "q" => Some(RESONANCE_RANGE),
        _ => None,
    }
}

// ============================================================================
// Mode
// ============================================================================

/// Shelf direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Dry plus scaled high-pass: raises the treble
    #[default]
    Boost,
    /// Dry minus scaled high-pass: reduces the treble
    Cut,
}

impl Mode {
    /// Parse mode from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "boost" => Some(Mode::Boost),
            "cut" | "reduce" => Some(Mode::Cut),
            _ => None,
        }
    }

    /// Get string identifier
    pub fn to_str(&self) -> &'static str {
        match self {
            Mode::Boost => "boost",
            Mode::Cut => "cut",
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Immutable view of all parameters, valid for one block or one UI tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSnapshot {
    /// Shelf cutoff frequency in Hz (2000-20000)
    pub cutoff_hz: f32,
    /// Shelf gain in dB (0-8)
    pub gain_db: f32,
    /// Filter resonance / Q (0.1-1.5)
    pub resonance: f32,
    /// Boost or cut
    pub mode: Mode,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            cutoff_hz: CUTOFF_RANGE.default,
            gain_db: GAIN_RANGE.default,
            resonance: RESONANCE_RANGE.default,
            mode: Mode::Boost,
        }
    }
}

impl ParameterSnapshot {
    pub fn new(cutoff_hz: f32, gain_db: f32, resonance: f32, mode: Mode) -> Self {
        Self {
            cutoff_hz,
            gain_db,
            resonance,
            mode,
        }
    }

    pub fn boost(cutoff_hz: f32, gain_db: f32, resonance: f32) -> Self {
        Self::new(cutoff_hz, gain_db, resonance, Mode::Boost)
    }

    pub fn cut(cutoff_hz: f32, gain_db: f32, resonance: f32) -> Self {
        Self::new(cutoff_hz, gain_db, resonance, Mode::Cut)
    }

    /// Copy with every field bounded to its declared range
    pub fn clamped(&self) -> Self {
        Self {
            cutoff_hz: CUTOFF_RANGE.clamp(self.cutoff_hz),
            gain_db: GAIN_RANGE.clamp(self.gain_db),
            resonance: RESONANCE_RANGE.clamp(self.resonance),
            mode: self.mode,
        }
    }

    /// Strict check used by offline tools before accepting user input
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("cutoff_hz", self.cutoff_hz, CUTOFF_RANGE, "2000-20000 Hz"),
            ("gain_db", self.gain_db, GAIN_RANGE, "0-8 dB"),
            ("resonance", self.resonance, RESONANCE_RANGE, "0.1-1.5"),
        ];

        for (param, value, range, expected) in checks {
            if !range.contains(value) {
                return Err(TrebleError::InvalidParameter {
                    param: param.to_string(),
                    value: value.to_string(),
                    expected: expected.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Parse from JSON string. Missing fields get default values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Anything the processor can pull a per-block snapshot from
pub trait ParameterSource: Send + Sync {
    /// Read all parameters once. Must not block.
    fn snapshot(&self) -> ParameterSnapshot;
}

/// Lock-free parameter registry
///
/// Floats are stored as their bit patterns in `AtomicU32`s so writers on a
/// UI thread never block the audio thread. Values are clamped on write.
#[derive(Debug)]
pub struct TrebleParams {
    cutoff_hz: AtomicU32,
    gain_db: AtomicU32,
    resonance: AtomicU32,
    cut_mode: AtomicBool,
}

impl Default for TrebleParams {
    fn default() -> Self {
        Self::from_snapshot(&ParameterSnapshot::default())
    }
}

impl TrebleParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: &ParameterSnapshot) -> Self {
        let s = snapshot.clamped();
        Self {
            cutoff_hz: AtomicU32::new(s.cutoff_hz.to_bits()),
            gain_db: AtomicU32::new(s.gain_db.to_bits()),
            resonance: AtomicU32::new(s.resonance.to_bits()),
            cut_mode: AtomicBool::new(s.mode == Mode::Cut),
        }
    }

    pub fn cutoff_hz(&self) -> f32 {
        f32::from_bits(self.cutoff_hz.load(Ordering::Relaxed))
    }

    pub fn gain_db(&self) -> f32 {
        f32::from_bits(self.gain_db.load(Ordering::Relaxed))
    }

    pub fn resonance(&self) -> f32 {
        f32::from_bits(self.resonance.load(Ordering::Relaxed))
    }

    pub fn mode(&self) -> Mode {
        if self.cut_mode.load(Ordering::Relaxed) {
            Mode::Cut
        } else {
            Mode::Boost
        }
    }

    pub fn set_cutoff_hz(&self, value: f32) {
        self.cutoff_hz
            .store(CUTOFF_RANGE.clamp(value).to_bits(), Ordering::Relaxed);
    }

    pub fn set_gain_db(&self, value: f32) {
        self.gain_db
            .store(GAIN_RANGE.clamp(value).to_bits(), Ordering::Relaxed);
    }

    pub fn set_resonance(&self, value: f32) {
        self.resonance
            .store(RESONANCE_RANGE.clamp(value).to_bits(), Ordering::Relaxed);
    }

    pub fn set_mode(&self, mode: Mode) {
        self.cut_mode.store(mode == Mode::Cut, Ordering::Relaxed);
    }

    /// Store every field of `snapshot`
    pub fn store(&self, snapshot: &ParameterSnapshot) {
        self.set_cutoff_hz(snapshot.cutoff_hz);
        self.set_gain_db(snapshot.gain_db);
        self.set_resonance(snapshot.resonance);
        self.set_mode(snapshot.mode);
    }

    /// Set a single parameter by name
    pub fn set_param(&self, name: &str, value: &serde_json::Value) -> Result<()> {
        let invalid = |expected: &str| TrebleError::InvalidParameter {
            param: name.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        };

        match name {
            "mode" => {
                let mode = value
                    .as_str()
                    .and_then(Mode::from_str)
                    .ok_or_else(|| invalid("\"boost\" or \"cut\""))?;
                self.set_mode(mode);
            }
            _ => {
                let range = param_range(name).ok_or_else(|| invalid("a known parameter name"))?;
                let v = value
                    .as_f64()
                    .ok_or_else(|| invalid("a number"))? as f32;
                if !range.contains(v) {
                    return Err(invalid(&format!("{}..={}", range.min, range.max)));
                }
                match name {
                    "cutoff_hz" | "freq" => self.set_cutoff_hz(v),
                    "gain_db" | "gain" => self.set_gain_db(v),
                    _ => self.set_resonance(v),
                }
            }
        }

        Ok(())
    }
}

impl ParameterSource for TrebleParams {
    fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            cutoff_hz: self.cutoff_hz(),
            gain_db: self.gain_db(),
            resonance: self.resonance(),
            mode: self.mode(),
        }
    }
}
