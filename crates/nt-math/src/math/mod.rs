//! Core statistics modules.
//!
//! Every function takes sequences where a missing observation is `None`.
//! Missing values are skipped or break adjacency; they are never read as 0.

pub mod descriptive;
pub mod extrema;
pub mod regression;
pub mod streaks;
pub mod volatility;
