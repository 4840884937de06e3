//! Kalman smoothing of inter-frame motion deltas.

use std::f64::consts::PI;

use nalgebra::{Matrix3, Vector3};

use super::traits::MotionFilter;
use crate::internal::kalman::KalmanFilter;
use crate::video::FrameSize;
use crate::Transform;

/// Kalman filter over the motion delta `(x, y, a)`.
///
/// Transition and measurement are identity: the delta is assumed to persist
/// between cycles and the raw estimate measures it directly. Both noise
/// covariances are diagonal and scale a dimensionless error by the frame
/// width, the frame height and a full turn (`2π`) respectively.
#[derive(Clone, Debug)]
pub struct KalmanMotionFilter {
    kf: KalmanFilter,
}

impl KalmanMotionFilter {
    /// Create a filter for frames of the given size.
    ///
    /// # Arguments
    /// * `frame_size` - Size of the captured frames
    /// * `process_error` - Process noise relative to frame dimensions
    /// * `measurement_error` - Measurement noise relative to frame dimensions
    pub fn new(frame_size: FrameSize, process_error: f64, measurement_error: f64) -> Self {
        let mut kf = KalmanFilter::new();
        kf.q = noise_covariance(frame_size, process_error);
        kf.r = noise_covariance(frame_size, measurement_error);
        Self { kf }
    }

    /// Process noise covariance.
    pub fn process_noise(&self) -> &Matrix3<f64> {
        &self.kf.q
    }

    /// Measurement noise covariance.
    pub fn measurement_noise(&self) -> &Matrix3<f64> {
        &self.kf.r
    }

    /// Current error covariance.
    pub fn covariance(&self) -> &Matrix3<f64> {
        self.kf.covariance()
    }
}

fn noise_covariance(frame_size: FrameSize, error: f64) -> Matrix3<f64> {
    let e2 = error * error;
    let w = frame_size.width as f64;
    let h = frame_size.height as f64;
    Matrix3::from_diagonal(&Vector3::new(w * w * e2, h * h * e2, 4.0 * PI * PI * e2))
}

impl MotionFilter for KalmanMotionFilter {
    fn step(&mut self, raw_delta: &Transform) -> Transform {
        self.kf.predict();
        Transform::from_vector(self.kf.correct(&raw_delta.to_vector()))
    }

    fn state(&self) -> Transform {
        Transform::from_vector(self.kf.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn size() -> FrameSize {
        FrameSize::new(640, 480)
    }

    #[test]
    fn test_noise_covariances() {
        let filter = KalmanMotionFilter::new(size(), 0.5, 0.25);

        let q = filter.process_noise();
        assert_relative_eq!(q[(0, 0)], 640.0 * 640.0 * 0.25, epsilon = 1e-9);
        assert_relative_eq!(q[(1, 1)], 480.0 * 480.0 * 0.25, epsilon = 1e-9);
        assert_relative_eq!(q[(2, 2)], 4.0 * PI * PI * 0.25, epsilon = 1e-9);
        assert_relative_eq!(q[(0, 1)], 0.0, epsilon = 1e-12);

        let r = filter.measurement_noise();
        assert_relative_eq!(r[(0, 0)], 640.0 * 640.0 * 0.0625, epsilon = 1e-9);
        assert_relative_eq!(r[(1, 1)], 480.0 * 480.0 * 0.0625, epsilon = 1e-9);
        assert_relative_eq!(r[(2, 2)], 4.0 * PI * PI * 0.0625, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_input_stays_zero() {
        let mut filter = KalmanMotionFilter::new(size(), 0.5, 0.5);
        for _ in 0..10 {
            assert!(filter.step(&Transform::IDENTITY).is_identity());
        }
        assert!(filter.state().is_identity());
    }

    #[test]
    fn test_equal_noise_first_step_halves_measurement() {
        let mut filter = KalmanMotionFilter::new(size(), 0.5, 0.5);
        let filtered = filter.step(&Transform::new(8.0, -4.0, 0.02));
        assert_relative_eq!(filtered.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(filtered.y, -2.0, epsilon = 1e-9);
        assert_relative_eq!(filtered.a, 0.01, epsilon = 1e-12);
        assert_eq!(filter.state(), filtered);
    }

    #[test]
    fn test_spike_is_damped() {
        let mut filter = KalmanMotionFilter::new(size(), 0.1, 0.5);
        let spike = Transform::new(50.0, 0.0, 0.0);

        for _ in 0..5 {
            filter.step(&Transform::IDENTITY);
        }
        let filtered = filter.step(&spike);
        assert!(filtered.x > 0.0);
        assert!(filtered.x < spike.x);

        // Subsequent zero measurements pull the estimate back down
        let next = filter.step(&Transform::IDENTITY);
        assert!(next.x < filtered.x);
        assert!(next.x > 0.0);
    }

    #[test]
    fn test_tracks_constant_motion() {
        let mut filter = KalmanMotionFilter::new(size(), 0.5, 0.5);
        let delta = Transform::new(3.0, 1.0, 0.01);
        let mut last = Transform::IDENTITY;
        for _ in 0..100 {
            last = filter.step(&delta);
        }
        assert_relative_eq!(last.x, 3.0, epsilon = 1e-6);
        assert_relative_eq!(last.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(last.a, 0.01, epsilon = 1e-8);
    }
}
