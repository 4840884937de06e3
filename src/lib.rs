//! # Flutter - Video Stabilization Core
//!
//! Flutter stabilizes shaky video by estimating inter-frame camera motion,
//! smoothing the resulting motion path, and re-rendering each frame warped
//! into the smoothed ("apparent") trajectory.
//!
//! ## Features
//!
//! - Kalman filter smoothing of frame-to-frame motion deltas
//! - Cumulative sensor (raw) and camera (filtered) paths per frame
//! - Two apparent-path strategies: exponential low-pass or centered moving average
//! - Sliding window with lookahead, startup fill and shutdown drain
//! - Inverse-transform synthesis with output scaling and centered zoom
//! - Tab-separated trajectory records
//!
//! Capture, motion estimation, image warping and output are external
//! collaborators reached through the traits in [`video`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use flutter_rs::{run, StabilizerConfig, TrajectoryWriter};
//!
//! let mut config = StabilizerConfig::default();
//! config.avg_window = 30;
//!
//! let mut trajectory = TrajectoryWriter::create("trajectory.tsv")?;
//! let summary = run(&config, &mut source, &mut estimator, &mut warper, &mut sink, Some(&mut trajectory))?;
//! println!("rendered {} frames", summary.frames_rendered);
//! ```

pub(crate) mod internal;

pub mod transform;
pub mod filter;
pub mod path;
pub mod apparent;
pub mod window;
pub mod warp;
pub mod video;
pub mod trajectory;
pub mod stabilizer;

// Re-exports for convenience
pub use transform::Transform;
pub use filter::{FilterEnum, FilterKind, MotionFilter};
pub use path::PathTracker;
pub use apparent::{ApparentPath, ApparentPathEnum};
pub use window::{Frame, FrameWindow};
pub use warp::WarpSynthesizer;
pub use video::{FrameImage, FrameSink, FrameSize, FrameSource, MotionEstimator, OutputSize, SinkControl, Warper};
pub use trajectory::{TrajectoryRecord, TrajectoryWriter};
pub use stabilizer::{run, RenderedFrame, RunSummary, Stabilizer, StabilizerConfig};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur in the flutter library
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Capture error: {0}")]
        Capture(String),

        #[error("Warp error: {0}")]
        Warp(String),

        #[error("Sink error: {0}")]
        Sink(String),

        #[error("Window slot {index} has no image to render")]
        MissingImage { index: usize },

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for flutter operations
    pub type Result<T> = std::result::Result<T, Error>;
}
