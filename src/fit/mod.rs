//! Fitting and evaluation engine.
//!
//! Responsibilities:
//!
//! - maximum-likelihood estimation per family (`estimator`), and the parallel
//!   fit of every family for `scan`
//! - slider bounds for manual exploration (`ranges`)
//! - histogram binning (`histogram`) and goodness-of-fit metrics (`quality`)

pub mod estimator;
pub mod histogram;
pub mod quality;
pub mod ranges;

pub use estimator::*;
pub use histogram::*;
pub use quality::*;
pub use ranges::*;
