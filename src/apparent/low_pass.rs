//! Exponential low-pass smoothing of the camera path.

use super::traits::ApparentPath;
use crate::Transform;

/// Moves the apparent path a fixed fraction `alpha` toward the camera path
/// every frame. No lookahead: the newest frame is rendered immediately.
#[derive(Clone, Debug)]
pub struct LowPass {
    alpha: f64,
}

impl LowPass {
    /// Create a low-pass strategy with decay weight `alpha` in `(0, 1]`.
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Get the decay weight.
    #[inline(always)]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl ApparentPath for LowPass {
    fn update(
        &self,
        prev_apparent: Transform,
        camera: Transform,
        _evicted_camera: Option<Transform>,
    ) -> Transform {
        prev_apparent + self.alpha * (camera - prev_apparent)
    }

    fn window_len(&self) -> usize {
        1
    }

    fn lookahead(&self) -> usize {
        0
    }
}
