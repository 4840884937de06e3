//! Boundary contracts between the stabilization core and its collaborators.
//!
//! Capture, motion estimation, resampling and output all live outside this
//! crate. The pipeline reaches them only through these traits:
//!
//! - [`FrameSource`] yields captured images until the stream ends
//! - [`MotionEstimator`] returns a 2x3 affine estimate between two images, or nothing
//! - [`Warper`] resamples an image through a 2x3 affine matrix
//! - [`FrameSink`] receives every rendered frame and may ask the stream to stop

use nalgebra::Matrix2x3;
use serde::{Deserialize, Serialize};

use crate::stabilizer::RenderedFrame;
use crate::{Error, Result};

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    /// Create a new frame size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// How the output resolution is derived from the capture resolution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSize {
    /// Same size as the input.
    #[default]
    Original,
    /// Both dimensions multiplied by a factor.
    Scale(f64),
    /// Fixed width, height follows the input aspect ratio.
    Width(u32),
    /// Fixed height, width follows the input aspect ratio.
    Height(u32),
    /// Fixed width and height.
    Exact(FrameSize),
}

impl OutputSize {
    /// Check that the requested size can produce a non-empty frame.
    pub fn validate(&self) -> Result<()> {
        match *self {
            OutputSize::Original => Ok(()),
            OutputSize::Scale(s) if s.is_finite() && s > 0.0 => Ok(()),
            OutputSize::Scale(s) => Err(Error::InvalidConfig(format!(
                "output scale must be positive, got {}",
                s
            ))),
            OutputSize::Width(0) | OutputSize::Height(0) => Err(Error::InvalidConfig(
                "output width and height must be non-zero".to_string(),
            )),
            OutputSize::Width(_) | OutputSize::Height(_) => Ok(()),
            OutputSize::Exact(size) if size.is_empty() => Err(Error::InvalidConfig(format!(
                "output size must be non-zero, got {}x{}",
                size.width, size.height
            ))),
            OutputSize::Exact(_) => Ok(()),
        }
    }

    /// Resolve the output size for frames captured at `input`.
    ///
    /// Aspect-preserving dimensions use integer arithmetic and truncate.
    pub fn resolve(&self, input: FrameSize) -> Result<FrameSize> {
        self.validate()?;
        if input.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "input frame size must be non-zero, got {}x{}",
                input.width, input.height
            )));
        }

        let (in_w, in_h) = (input.width as u64, input.height as u64);
        let size = match *self {
            OutputSize::Original => input,
            OutputSize::Scale(s) => FrameSize::new(
                scaled_dimension(s, input.width)?,
                scaled_dimension(s, input.height)?,
            ),
            OutputSize::Width(w) => FrameSize::new(w, dimension(w as u64 * in_h / in_w)?),
            OutputSize::Height(h) => FrameSize::new(dimension(h as u64 * in_w / in_h)?, h),
            OutputSize::Exact(size) => size,
        };

        if size.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "output size {}x{} resolved from {}x{} is empty",
                size.width, size.height, input.width, input.height
            )));
        }
        Ok(size)
    }
}

fn dimension(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        Error::InvalidConfig(format!("output dimension {} does not fit in u32", value))
    })
}

fn scaled_dimension(scale: f64, value: u32) -> Result<u32> {
    let scaled = (scale * value as f64).floor();
    if scaled > u32::MAX as f64 {
        return Err(Error::InvalidConfig(format!(
            "output dimension {} does not fit in u32",
            scaled
        )));
    }
    Ok(scaled as u32)
}

/// An image whose pixel dimensions are known.
pub trait FrameImage {
    /// Get the image size.
    fn size(&self) -> FrameSize;
}

/// Source of captured frames.
pub trait FrameSource<I> {
    /// Read the next frame.
    ///
    /// # Returns
    /// `Ok(None)` when the stream is exhausted.
    fn read(&mut self) -> Result<Option<I>>;
}

/// Estimator of the planar motion between two images.
pub trait MotionEstimator<I> {
    /// Estimate the rigid/affine transform taking `prev` onto `next`.
    ///
    /// # Arguments
    /// * `min_inlier_ratio` - Minimum fraction of matched points that must fit the model
    /// * `inlier_threshold` - Maximum inlier distance, relative to the image dimensions
    ///
    /// # Returns
    /// `None` when no trustworthy estimate exists.
    fn estimate(
        &mut self,
        prev: &I,
        next: &I,
        min_inlier_ratio: f64,
        inlier_threshold: f64,
    ) -> Option<Matrix2x3<f64>>;
}

/// Affine image resampler.
pub trait Warper<I> {
    /// Image type produced by the warp.
    type Output;

    /// Resample `image` through `transform` into an image of `size`.
    fn warp(&mut self, image: &I, transform: &Matrix2x3<f64>, size: FrameSize) -> Result<Self::Output>;
}

/// What the pipeline should do after a sink has consumed a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkControl {
    Continue,
    /// Stop capturing; buffered frames are still drained.
    Stop,
}

/// Consumer of rendered frames.
pub trait FrameSink<O> {
    /// Consume one rendered frame.
    fn consume(&mut self, frame: RenderedFrame<O>) -> Result<SinkControl>;
}

/// Adapts any iterator of images into a [`FrameSource`].
#[derive(Debug, Clone)]
pub struct IterSource<T> {
    inner: T,
}

impl<T> IterSource<T> {
    /// Wrap an iterator.
    pub fn new<U: IntoIterator<IntoIter = T>>(iter: U) -> Self {
        Self { inner: iter.into_iter() }
    }
}

impl<I, T: Iterator<Item = I>> FrameSource<I> for IterSource<T> {
    fn read(&mut self) -> Result<Option<I>> {
        Ok(self.inner.next())
    }
}
