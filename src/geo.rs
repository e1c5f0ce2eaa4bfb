// Geospatial reducer: one map point per customer.
use crate::types::{CustomerLocation, NoData};
use std::collections::HashSet;

/// Deduplicate geolocation rows to one per distinct `customer_unique_id`,
/// keeping the first occurrence in input order. Coordinates are not
/// validated. An empty reduced set is an explicit no-data condition so the
/// caller can skip plotting/export instead of rendering an empty map.
pub fn reduce(rows: &[CustomerLocation]) -> Result<Vec<CustomerLocation>, NoData> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unique: Vec<CustomerLocation> = Vec::new();
    for r in rows {
        if seen.insert(r.customer_unique_id.as_str()) {
            unique.push(r.clone());
        }
    }
    if unique.is_empty() {
        return Err(NoData);
    }
    Ok(unique)
}
