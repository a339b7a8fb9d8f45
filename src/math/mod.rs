//! Numerical utilities: simplex minimization and Kolmogorov–Smirnov helpers.

pub mod ks;
pub mod neldermead;

pub use ks::*;
pub use neldermead::*;
