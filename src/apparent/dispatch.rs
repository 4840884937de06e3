//! Enum-based apparent-path dispatch.

use super::low_pass::LowPass;
use super::moving_average::MovingAverage;
use super::traits::ApparentPath;
use crate::Transform;

/// Apparent-path strategy selected once from configuration.
#[derive(Clone, Debug)]
pub enum ApparentPathEnum {
    LowPass(LowPass),
    MovingAverage(MovingAverage),
}

impl ApparentPathEnum {
    /// Select the strategy: a zero `avg_window` means exponential low-pass
    /// with weight `low_pass`, anything else a moving average over
    /// `avg_window` frames.
    pub fn from_config(avg_window: usize, low_pass: f64) -> Self {
        if avg_window == 0 {
            ApparentPathEnum::LowPass(LowPass::new(low_pass))
        } else {
            ApparentPathEnum::MovingAverage(MovingAverage::new(avg_window))
        }
    }

    #[inline(always)]
    pub fn update(
        &self,
        prev_apparent: Transform,
        camera: Transform,
        evicted_camera: Option<Transform>,
    ) -> Transform {
        match self {
            ApparentPathEnum::LowPass(s) => s.update(prev_apparent, camera, evicted_camera),
            ApparentPathEnum::MovingAverage(s) => s.update(prev_apparent, camera, evicted_camera),
        }
    }

    #[inline(always)]
    pub fn window_len(&self) -> usize {
        match self {
            ApparentPathEnum::LowPass(s) => s.window_len(),
            ApparentPathEnum::MovingAverage(s) => s.window_len(),
        }
    }

    #[inline(always)]
    pub fn lookahead(&self) -> usize {
        match self {
            ApparentPathEnum::LowPass(s) => s.lookahead(),
            ApparentPathEnum::MovingAverage(s) => s.lookahead(),
        }
    }

    /// Whether this is the windowed (moving average) strategy.
    pub fn is_windowed(&self) -> bool {
        matches!(self, ApparentPathEnum::MovingAverage(_))
    }
}

impl ApparentPath for ApparentPathEnum {
    #[inline(always)]
    fn update(
        &self,
        prev_apparent: Transform,
        camera: Transform,
        evicted_camera: Option<Transform>,
    ) -> Transform {
        ApparentPathEnum::update(self, prev_apparent, camera, evicted_camera)
    }

    #[inline(always)]
    fn window_len(&self) -> usize {
        ApparentPathEnum::window_len(self)
    }

    #[inline(always)]
    fn lookahead(&self) -> usize {
        ApparentPathEnum::lookahead(self)
    }
}
