//! Enum-based filter dispatch for static (non-virtual) function calls.
//!
//! The pipeline owns exactly one filter for its whole lifetime; `FilterKind`
//! selects which one from configuration and `FilterEnum` holds it without a
//! `Box<dyn MotionFilter>`.

use serde::{Deserialize, Serialize};

use super::kalman::KalmanMotionFilter;
use super::no_filter::NoFilter;
use super::traits::MotionFilter;
use crate::video::FrameSize;
use crate::Transform;

/// Enum-based filter for static dispatch.
#[derive(Clone, Debug)]
pub enum FilterEnum {
    Kalman(KalmanMotionFilter),
    None(NoFilter),
}

impl FilterEnum {
    #[inline(always)]
    pub fn step(&mut self, raw_delta: &Transform) -> Transform {
        match self {
            FilterEnum::Kalman(f) => f.step(raw_delta),
            FilterEnum::None(f) => f.step(raw_delta),
        }
    }

    #[inline(always)]
    pub fn state(&self) -> Transform {
        match self {
            FilterEnum::Kalman(f) => f.state(),
            FilterEnum::None(f) => f.state(),
        }
    }
}

impl MotionFilter for FilterEnum {
    #[inline(always)]
    fn step(&mut self, raw_delta: &Transform) -> Transform {
        FilterEnum::step(self, raw_delta)
    }

    #[inline(always)]
    fn state(&self) -> Transform {
        FilterEnum::state(self)
    }
}

/// Which filter smooths the raw motion deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Kalman filter with frame-relative noise covariances.
    #[default]
    Kalman,
    /// No smoothing: the camera path follows the sensor path.
    None,
}

impl FilterKind {
    /// Create the filter for a stream of frames of the given size.
    pub fn create(
        &self,
        frame_size: FrameSize,
        process_error: f64,
        measurement_error: f64,
    ) -> FilterEnum {
        match self {
            FilterKind::Kalman => FilterEnum::Kalman(KalmanMotionFilter::new(
                frame_size,
                process_error,
                measurement_error,
            )),
            FilterKind::None => FilterEnum::None(NoFilter::new()),
        }
    }
}
