//! Threshold Tuner math utilities.

pub mod math;

pub use math::decision::*;
pub use math::grid::*;
pub use math::ranking::*;
pub use math::stable::*;
