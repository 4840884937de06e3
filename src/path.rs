//! Cumulative sensor and camera paths.

use tracing::warn;

use crate::filter::FilterEnum;
use crate::Transform;

/// Result of integrating one inter-frame transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStep {
    /// Raw cumulative path of the newer frame.
    pub sensor: Transform,
    /// Filtered cumulative path of the newer frame.
    pub camera: Transform,
    /// Raw delta used for this transition (identity if nothing was estimated).
    pub raw_delta: Transform,
    /// Filtered delta added to the camera path.
    pub camera_delta: Transform,
    /// Whether the motion estimator produced a value.
    pub estimated: bool,
}

/// Integrates per-transition motion deltas into the sensor and camera paths.
///
/// Each transition steps the smoothing filter exactly once. A missing motion
/// estimate is treated as a static camera: the raw delta is the identity, and
/// the camera delta is the filter's response to zero input.
#[derive(Clone, Debug)]
pub struct PathTracker {
    filter: FilterEnum,
    transitions: usize,
    missing_estimates: usize,
}

impl PathTracker {
    /// Create a tracker owning `filter`.
    pub fn new(filter: FilterEnum) -> Self {
        Self {
            filter,
            transitions: 0,
            missing_estimates: 0,
        }
    }

    /// Integrate the transition from the previous frame to the next one.
    ///
    /// # Arguments
    /// * `prev_sensor` - Sensor path of the previous frame
    /// * `prev_camera` - Camera path of the previous frame
    /// * `raw_delta` - Estimated motion between the two frames, if any
    pub fn integrate(
        &mut self,
        prev_sensor: Transform,
        prev_camera: Transform,
        raw_delta: Option<Transform>,
    ) -> PathStep {
        self.transitions += 1;

        let estimated = raw_delta.is_some();
        let raw_delta = raw_delta.unwrap_or_else(|| {
            self.missing_estimates += 1;
            warn!(
                transition = self.transitions,
                missing = self.missing_estimates,
                "no motion estimate, assuming a static camera"
            );
            Transform::IDENTITY
        });

        let camera_delta = self.filter.step(&raw_delta);

        PathStep {
            sensor: prev_sensor + raw_delta,
            camera: prev_camera + camera_delta,
            raw_delta,
            camera_delta,
            estimated,
        }
    }

    /// Number of transitions integrated so far.
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    /// Number of transitions without a motion estimate.
    pub fn missing_estimates(&self) -> usize {
        self.missing_estimates
    }

    /// The smoothing filter.
    pub fn filter(&self) -> &FilterEnum {
        &self.filter
    }
}
