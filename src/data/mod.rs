//! Sample sources that are not plain local input.
//!
//! - `remote`: CSV / value lists fetched over HTTP
//! - `sample`: seeded synthetic draws from a catalog family

pub mod remote;
pub mod sample;

pub use remote::*;
pub use sample::*;
