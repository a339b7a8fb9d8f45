//! `dist-fit` library crate.
//!
//! The binary (`distfit`) is a thin wrapper around this library so that:
//!
//! - the fitting engine is testable without spawning processes
//! - the catalog, estimator and evaluator are reusable from other front-ends
//!
//! Engine entry points: [`models`] (catalog, pdf/cdf, curves), [`fit`]
//! (estimation, ranges, quality) and [`domain`] (shared types).

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
