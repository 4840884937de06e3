//! Internal numeric building blocks.

pub mod kalman;
