//! Centered moving average of the camera path.

use super::traits::ApparentPath;
use crate::Transform;

/// Running average of the camera path over the last `window` frames.
///
/// The accumulator is updated in O(1): the newest camera value is added with
/// weight `1/N` and the value of the frame leaving the window is removed with
/// the same weight. The value is read once, when the newest frame is
/// rendered, and it is then the average over the whole window. Rendering the
/// frame `N/2` positions behind the newest one centers that average.
#[derive(Clone, Debug)]
pub struct MovingAverage {
    window: usize,
}

impl MovingAverage {
    /// Create a moving average over `window` frames (at least 1).
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// Get the window length.
    #[inline(always)]
    pub fn window(&self) -> usize {
        self.window
    }
}

impl ApparentPath for MovingAverage {
    fn update(
        &self,
        prev_apparent: Transform,
        camera: Transform,
        evicted_camera: Option<Transform>,
    ) -> Transform {
        let n = self.window as f64;
        let mut apparent = prev_apparent + camera / n;
        if let Some(evicted) = evicted_camera {
            apparent -= evicted / n;
        }
        apparent
    }

    fn window_len(&self) -> usize {
        self.window
    }

    fn lookahead(&self) -> usize {
        self.window / 2
    }
}
