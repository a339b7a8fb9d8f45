//! Name-keyed catalog lookups.
//!
//! The engine itself works on the [`Family`] enum; these helpers serve callers
//! that only have a family name (CLI flags, config files) and surface
//! `UnknownFamily` for anything outside the catalog.

use serde::Serialize;

use crate::error::FitError;
use crate::models::{Family, FrozenDistribution, ParamSpec};

/// One catalog row: family name plus its ordered schema.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub family: Family,
    pub name: &'static str,
    pub params: &'static [ParamSpec],
}

/// Family names in catalog order.
pub fn list_families() -> Vec<&'static str> {
    Family::ALL.iter().map(|f| f.display_name()).collect()
}

/// Full catalog (name + schema with roles).
pub fn entries() -> Vec<CatalogEntry> {
    Family::ALL
        .iter()
        .map(|&family| CatalogEntry {
            family,
            name: family.display_name(),
            params: family.params(),
        })
        .collect()
}

/// Ordered parameter names for `name`.
pub fn schema(name: &str) -> Result<Vec<&'static str>, FitError> {
    let family: Family = name.parse()?;
    Ok(family.param_names())
}

/// Probability density of family `name` at `x`.
pub fn density(name: &str, x: f64, params: &[f64]) -> Result<f64, FitError> {
    let family: Family = name.parse()?;
    Ok(FrozenDistribution::new(family, params)?.pdf(x))
}

/// Cumulative probability of family `name` at `x` (in `[0, 1]`).
pub fn cumulative(name: &str, x: f64, params: &[f64]) -> Result<f64, FitError> {
    let family: Family = name.parse()?;
    Ok(FrozenDistribution::new(family, params)?.cdf(x))
}
