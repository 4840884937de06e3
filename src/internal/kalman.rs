//! Linear Kalman filter over a three-component state.
//!
//! Matrices are fixed-size (`Matrix3`) since the only state the pipeline
//! filters is a motion delta `(x, y, a)`. The error covariance starts at zero
//! and the state at the origin, so the first predict leaves `P = Q`.

use nalgebra::{Matrix3, Vector3};

/// Standard predict/correct Kalman filter with a 3-dimensional state and
/// a 3-dimensional measurement.
#[derive(Clone, Debug)]
pub struct KalmanFilter {
    /// State vector (posterior after `correct`, prior after `predict`)
    pub x: Vector3<f64>,
    /// Error covariance
    pub p: Matrix3<f64>,
    /// State transition matrix
    pub f: Matrix3<f64>,
    /// Measurement matrix
    pub h: Matrix3<f64>,
    /// Process noise covariance
    pub q: Matrix3<f64>,
    /// Measurement noise covariance
    pub r: Matrix3<f64>,
}

impl KalmanFilter {
    /// Create a filter with identity transition, measurement and noise
    /// matrices, zero state and zero error covariance.
    pub fn new() -> Self {
        Self {
            x: Vector3::zeros(),
            p: Matrix3::zeros(),
            f: Matrix3::identity(),
            h: Matrix3::identity(),
            q: Matrix3::identity(),
            r: Matrix3::identity(),
        }
    }

    /// Predict the next state.
    pub fn predict(&mut self) -> &Vector3<f64> {
        // x = F @ x
        self.x = self.f * self.x;

        // P = F @ P @ F.T + Q
        self.p = self.f * self.p * self.f.transpose() + self.q;

        &self.x
    }

    /// Correct the predicted state with measurement `z`.
    pub fn correct(&mut self, z: &Vector3<f64>) -> &Vector3<f64> {
        let h = self.h;

        // S = H @ P @ H.T + R
        let s = h * self.p * h.transpose() + self.r;

        // K = P @ H.T @ S^-1
        let si = s.try_inverse().unwrap_or_else(Matrix3::identity);
        let k = self.p * h.transpose() * si;

        // x = x + K @ (z - H @ x)
        self.x += k * (z - h * self.x);

        // P = (I - K @ H) @ P
        self.p = (Matrix3::identity() - k * h) * self.p;

        &self.x
    }

    /// Get the current state estimate.
    pub fn state(&self) -> &Vector3<f64> {
        &self.x
    }

    /// Get the error covariance.
    pub fn covariance(&self) -> &Matrix3<f64> {
        &self.p
    }
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kalman_filter_create() {
        let kf = KalmanFilter::new();

        assert_eq!(kf.f, Matrix3::identity());
        assert_eq!(kf.h, Matrix3::identity());
        assert_eq!(kf.x, Vector3::zeros());
        assert_eq!(kf.p, Matrix3::zeros());
    }

    #[test]
    fn test_kalman_filter_predict() {
        let mut kf = KalmanFilter::new();
        kf.x = Vector3::new(1.0, 2.0, 3.0);
        kf.q = Matrix3::from_diagonal(&Vector3::new(0.1, 0.2, 0.3));
        kf.p = Matrix3::identity();

        kf.predict();

        // Identity transition keeps the state
        assert_relative_eq!(kf.x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(kf.x[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(kf.x[2], 3.0, epsilon = 1e-12);

        // P = P + Q
        assert_relative_eq!(kf.p[(0, 0)], 1.1, epsilon = 1e-12);
        assert_relative_eq!(kf.p[(1, 1)], 1.2, epsilon = 1e-12);
        assert_relative_eq!(kf.p[(2, 2)], 1.3, epsilon = 1e-12);
        assert_relative_eq!(kf.p[(0, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kalman_filter_first_cycle_gain() {
        // P starts at zero, so after the first predict P = Q and the gain is
        // Q (Q + R)^-1. With Q = R the state moves halfway to the measurement.
        let mut kf = KalmanFilter::new();
        kf.q = Matrix3::identity() * 4.0;
        kf.r = Matrix3::identity() * 4.0;

        kf.predict();
        let x = *kf.correct(&Vector3::new(10.0, -6.0, 0.2));

        assert_relative_eq!(x[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], -3.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 0.1, epsilon = 1e-12);
        assert_relative_eq!(kf.p[(0, 0)], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kalman_filter_correct_large_uncertainty() {
        let mut kf = KalmanFilter::new();
        kf.p = Matrix3::identity() * 10.0;
        kf.r = Matrix3::identity();

        kf.correct(&Vector3::new(5.0, 0.0, 0.0));

        // K = 10 / (10 + 1)
        assert_relative_eq!(kf.x[0], 4.545454545, epsilon = 1e-6);
        assert_relative_eq!(kf.x[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kalman_filter_converges_to_constant_measurement() {
        let mut kf = KalmanFilter::new();
        kf.q = Matrix3::identity() * 0.01;
        kf.r = Matrix3::identity() * 0.1;

        let z = Vector3::new(2.0, -1.0, 0.05);
        for _ in 0..200 {
            kf.predict();
            kf.correct(&z);
        }

        assert_relative_eq!(kf.state()[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(kf.state()[1], -1.0, epsilon = 1e-6);
        assert_relative_eq!(kf.state()[2], 0.05, epsilon = 1e-6);
    }

    #[test]
    fn test_kalman_filter_covariance_settles() {
        let mut kf = KalmanFilter::new();
        kf.q = Matrix3::identity();
        kf.r = Matrix3::identity();

        for _ in 0..50 {
            kf.predict();
            kf.correct(&Vector3::zeros());
        }

        // Steady state of p' = p + q, p = p' r / (p' + r) with q = r = 1:
        // p = (sqrt(5) - 1) / 2
        let expected = (5.0f64.sqrt() - 1.0) / 2.0;
        assert_relative_eq!(kf.covariance()[(0, 0)], expected, epsilon = 1e-9);
    }
}
