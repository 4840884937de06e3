//! Inverse-transform synthesis for the rendered frame.

use nalgebra::Matrix2x3;

use crate::video::{FrameSize, Warper};
use crate::{Result, Transform};

/// Builds the affine warp that moves a buffered frame onto the apparent path.
///
/// The inverse is `apparent(newest) - camera(displayed)`, converted to a 2x3
/// matrix whose first row is scaled by `out_w / in_w` and second row by
/// `out_h / in_h`. With a positive zoom, the whole matrix is scaled and the
/// translation is offset so the zoom is centered on the output frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpSynthesizer {
    input: FrameSize,
    output: FrameSize,
    zoom: f64,
}

impl WarpSynthesizer {
    /// Create a synthesizer mapping `input`-sized frames to `output`-sized ones.
    ///
    /// A `zoom` of zero disables zooming.
    pub fn new(input: FrameSize, output: FrameSize, zoom: f64) -> Self {
        Self { input, output, zoom }
    }

    /// Capture size.
    pub fn input_size(&self) -> FrameSize {
        self.input
    }

    /// Output size.
    pub fn output_size(&self) -> FrameSize {
        self.output
    }

    /// Correction taking the displayed frame's camera path to the apparent path.
    pub fn inverse(&self, apparent: Transform, display_camera: Transform) -> Transform {
        apparent - display_camera
    }

    /// Full 2x3 warp matrix for the displayed frame.
    pub fn matrix(&self, apparent: Transform, display_camera: Transform) -> Matrix2x3<f64> {
        let mut m = self.inverse(apparent, display_camera).to_affine();

        let scale_x = self.output.width as f64 / self.input.width as f64;
        let scale_y = self.output.height as f64 / self.input.height as f64;
        {
            let mut row = m.row_mut(0);
            row *= scale_x;
        }
        {
            let mut row = m.row_mut(1);
            row *= scale_y;
        }

        if self.zoom > 0.0 {
            let z = self.zoom;
            let half_w = (self.output.width / 2) as f64;
            let half_h = (self.output.height / 2) as f64;
            m *= z;
            m[(0, 2)] += half_w * (1.0 - z);
            m[(1, 2)] += half_h * (1.0 - z);
        }

        m
    }

    /// Pure resize from the input to the output size, without zoom.
    pub fn resize_matrix(&self) -> Matrix2x3<f64> {
        Matrix2x3::new(
            self.output.width as f64 / self.input.width as f64, 0.0, 0.0,
            0.0, self.output.height as f64 / self.input.height as f64, 0.0,
        )
    }

    /// Warp `image` onto the apparent path through `warper`.
    ///
    /// # Returns
    /// The warp matrix and the warped image.
    pub fn synthesize<I, W: Warper<I>>(
        &self,
        warper: &mut W,
        image: &I,
        apparent: Transform,
        display_camera: Transform,
    ) -> Result<(Matrix2x3<f64>, W::Output)> {
        let m = self.matrix(apparent, display_camera);
        let output = warper.warp(image, &m, self.output)?;
        Ok((m, output))
    }
}
