//! Referential integrity checks over a [`Dataset`].
//!
//! Two rules: ids are unique within each collection, and every wine points at an
//! existing varietal and winery.

use crate::error::{CellarError, Result};
use crate::store::Dataset;
use std::collections::HashSet;

pub fn validate(dataset: &Dataset) -> Result<()> {
    let varietal_ids = unique_ids("varietals", dataset.varietals.iter().map(|v| v.id.as_str()))?;
    let winery_ids = unique_ids("wineries", dataset.wineries.iter().map(|w| w.id.as_str()))?;
    unique_ids("wines", dataset.wines.iter().map(|w| w.id.as_str()))?;

    for wine in &dataset.wines {
        if !varietal_ids.contains(wine.varietal_id.as_str()) {
            return Err(CellarError::Integrity(format!(
                "wine '{}' references unknown varietal_id '{}'",
                wine.id, wine.varietal_id
            )));
        }
        if !winery_ids.contains(wine.winery_id.as_str()) {
            return Err(CellarError::Integrity(format!(
                "wine '{}' references unknown winery_id '{}'",
                wine.id, wine.winery_id
            )));
        }
    }
    Ok(())
}

fn unique_ids<'a>(
    collection: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<HashSet<&'a str>> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(CellarError::Integrity(format!(
                "{} contains a record with an empty id",
                collection
            )));
        }
        if !seen.insert(id) {
            return Err(CellarError::Integrity(format!(
                "{} contains duplicate id '{}'",
                collection, id
            )));
        }
    }
    Ok(seen)
}
