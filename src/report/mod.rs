//! Reporting utilities: formatted terminal output for fits, metrics and ranges.

pub mod format;

pub use format::*;
