//! Apparent (target) trajectory computation.
//!
//! Two interchangeable strategies derive the path the output should follow
//! from the filtered camera path:
//! - `LowPass` - Exponential smoothing, no lag
//! - `MovingAverage` - Centered moving average over a window, `N/2` frames of lag

mod traits;
mod low_pass;
mod moving_average;
mod dispatch;

pub use traits::ApparentPath;
pub use low_pass::LowPass;
pub use moving_average::MovingAverage;
pub use dispatch::ApparentPathEnum;
