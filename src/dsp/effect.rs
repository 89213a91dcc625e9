//! Effect trait definition
//!
//! Host-style lifecycle shared by processors that run on an [`AudioBuffer`].

use crate::engine::AudioBuffer;
use crate::error::Result;

/// Base trait for block processors driven like a plugin host would
pub trait Effect: Send {
    /// Allocate state for the given stream configuration.
    ///
    /// Must be called before `process`, and again whenever any argument
    /// changes.
    fn prepare(&mut self, sample_rate: u32, max_block_size: usize, channels: usize) -> Result<()>;

    /// Process an audio buffer in place
    fn process(&mut self, buffer: &mut AudioBuffer);

    /// Clear internal state (filter history, modulation, smoothing)
    fn reset(&mut self);

    /// Free all prepared state
    fn release(&mut self);

    /// Whether `prepare` has succeeded since the last `release`
    fn is_prepared(&self) -> bool;

    /// Get the effect type identifier
    fn effect_type(&self) -> &'static str;

    /// Get human-readable display name
    fn display_name(&self) -> &str;

    /// Get the unique instance ID
    fn id(&self) -> &str;
}
