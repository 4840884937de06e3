//! Sliding window of frames with their cumulative paths.

use std::collections::VecDeque;

use crate::Transform;

/// One sampled frame and its three cumulative paths.
///
/// `image` is `None` for padding frames seeded behind the first capture and
/// for the virtual frames appended while draining; neither is ever rendered.
#[derive(Debug, Clone)]
pub struct Frame<I> {
    /// Captured image.
    pub image: Option<I>,
    /// Raw cumulative motion.
    pub sensor: Transform,
    /// Filtered cumulative motion.
    pub camera: Transform,
    /// Target cumulative motion.
    pub apparent: Transform,
}

impl<I> Frame<I> {
    /// A freshly captured frame with undefined (zero) paths.
    pub fn captured(image: I) -> Self {
        Self {
            image: Some(image),
            sensor: Transform::IDENTITY,
            camera: Transform::IDENTITY,
            apparent: Transform::IDENTITY,
        }
    }

    /// An image-less frame with zero paths.
    pub fn padding() -> Self {
        Self {
            image: None,
            sensor: Transform::IDENTITY,
            camera: Transform::IDENTITY,
            apparent: Transform::IDENTITY,
        }
    }

    /// An image-less frame repeating `last`'s sensor and camera values, i.e.
    /// a future frame with no further motion.
    pub fn repeating(last: &Frame<I>) -> Self {
        Self {
            image: None,
            sensor: last.sensor,
            camera: last.camera,
            apparent: Transform::IDENTITY,
        }
    }

    /// Whether this frame carries an image.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// Bounded double-ended queue of frames, newest at index 0.
///
/// The window may temporarily hold `capacity + 1` frames: a new frame is
/// pushed first, its paths are computed against its predecessor, and only
/// then is the oldest frame evicted.
#[derive(Debug, Clone)]
pub struct FrameWindow<I> {
    frames: VecDeque<Frame<I>>,
    capacity: usize,
    display_offset: usize,
}

impl<I> FrameWindow<I> {
    /// Create an empty window.
    ///
    /// # Arguments
    /// * `capacity` - Frames kept once full (at least 1)
    /// * `display_offset` - Distance from the newest frame to the rendered one
    pub fn new(capacity: usize, display_offset: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity + 1),
            capacity,
            display_offset,
        }
    }

    /// Insert a frame at the newest end.
    pub fn push(&mut self, frame: Frame<I>) {
        self.frames.push_front(frame);
    }

    /// Whether the window holds more frames than its capacity.
    pub fn is_overfull(&self) -> bool {
        self.frames.len() > self.capacity
    }

    /// Remove and return the oldest frame.
    pub fn evict_oldest(&mut self) -> Option<Frame<I>> {
        self.frames.pop_back()
    }

    /// Get the oldest frame.
    pub fn oldest(&self) -> Option<&Frame<I>> {
        self.frames.back()
    }

    /// Get the newest frame.
    pub fn newest(&self) -> Option<&Frame<I>> {
        self.frames.front()
    }

    /// Get the newest frame mutably.
    pub fn newest_mut(&mut self) -> Option<&mut Frame<I>> {
        self.frames.front_mut()
    }

    /// Get the frame `index` positions behind the newest one.
    pub fn get(&self, index: usize) -> Option<&Frame<I>> {
        self.frames.get(index)
    }

    /// Get the frame selected for rendering.
    ///
    /// In windowed mode this is the temporal center of the window; otherwise
    /// the newest frame.
    pub fn display_frame(&self) -> Option<&Frame<I>> {
        self.frames.get(self.display_offset)
    }

    /// Distance from the newest frame to the rendered one.
    pub fn display_offset(&self) -> usize {
        self.display_offset
    }

    /// Frames kept once full.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterate from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Frame<I>> {
        self.frames.iter()
    }
}
