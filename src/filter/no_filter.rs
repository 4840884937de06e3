//! Pass-through filter that returns every raw delta unchanged.
//!
//! This provides a baseline for comparison: the camera path equals the
//! sensor path.

use super::traits::MotionFilter;
use crate::Transform;

/// Filter that stores and returns the last measurement.
#[derive(Clone, Debug, Default)]
pub struct NoFilter {
    last: Transform,
}

impl NoFilter {
    /// Create a new pass-through filter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MotionFilter for NoFilter {
    fn step(&mut self, raw_delta: &Transform) -> Transform {
        self.last = *raw_delta;
        self.last
    }

    fn state(&self) -> Transform {
        self.last
    }
}
