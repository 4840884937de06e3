//! Apparent-path strategy trait.

use crate::Transform;

/// Strategy deriving the apparent (target) path from the camera path.
///
/// Implementations are selected once at construction and stepped once per
/// frame, in temporal order, after the newest frame's camera value is known.
pub trait ApparentPath: Send + Sync {
    /// Compute the newest frame's apparent value.
    ///
    /// # Arguments
    /// * `prev_apparent` - Apparent value of the previous frame
    /// * `camera` - Camera value of the newest frame
    /// * `evicted_camera` - Camera value of the frame leaving the window this step, if any
    fn update(
        &self,
        prev_apparent: Transform,
        camera: Transform,
        evicted_camera: Option<Transform>,
    ) -> Transform;

    /// Number of frames the window keeps once full.
    fn window_len(&self) -> usize;

    /// Number of frames between the newest frame and the rendered one.
    fn lookahead(&self) -> usize;
}
