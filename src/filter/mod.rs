//! Motion-delta smoothing filters.
//!
//! This module provides:
//! - `KalmanMotionFilter` - Kalman predict/correct over `(x, y, a)` deltas
//! - `NoFilter` - Pass-through baseline
//! - `FilterEnum` / `FilterKind` - Static dispatch and configuration selection

mod traits;
mod kalman;
mod no_filter;
mod dispatch;

pub use traits::MotionFilter;
pub use kalman::KalmanMotionFilter;
pub use no_filter::NoFilter;
pub use dispatch::{FilterEnum, FilterKind};
