//! Distribution catalog.
//!
//! - `family`: the closed set of families, their schemas, and frozen pdf/cdf evaluation
//! - `catalog`: name-keyed lookups for callers holding a family name
//! - `curve`: evenly spaced density curves for plotting

pub mod catalog;
pub mod curve;
pub mod family;

pub use catalog::*;
pub use curve::*;
pub use family::*;
