//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the validated observation set (`Sample`) and its summary
//! - fitted/manual parameters (`ParameterVector`) and their tables
//! - evaluation outputs (`QualityReport`, `ParameterRangeHint`)
//! - run configuration (`FitConfig`, `DataSource`) and export schemas

pub mod types;

pub use types::*;
