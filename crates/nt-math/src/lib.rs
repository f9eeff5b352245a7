//! Name Trends math utilities.

pub mod math;

pub use math::descriptive::*;
pub use math::extrema::*;
pub use math::regression::*;
pub use math::streaks::*;
pub use math::volatility::*;
