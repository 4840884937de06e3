//! Filter traits for motion-delta smoothing.

use crate::Transform;

/// Trait for filters that denoise frame-to-frame motion estimates.
///
/// A filter is stepped at most once per inter-frame transition, in strict
/// temporal order. Construction fully initializes it, so there is no
/// "step before initialize" state.
pub trait MotionFilter: Send + Sync {
    /// Run one predict/correct cycle with `raw_delta` as the measurement.
    ///
    /// # Returns
    /// The filtered motion delta.
    fn step(&mut self, raw_delta: &Transform) -> Transform;

    /// Get the current filtered delta estimate.
    fn state(&self) -> Transform;
}
