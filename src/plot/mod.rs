//! Terminal plotting (ASCII grid).

pub mod ascii;

pub use ascii::*;
