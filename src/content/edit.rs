//! Whole-record edits over a collection
//!
//! Editors never patch fields: they build a new copy of the collection with
//! one record replaced, inserted or filtered out, then hand the whole
//! collection to `ContentStore::save_*`.

use crate::content::types::Identified;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Fresh id with a collection prefix, e.g. `exh-1b4e...`
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// Insert or replace `item`.
///
/// An empty id is replaced with a fresh one and the item is appended. A
/// known id replaces the existing record in place. An unknown non-empty id
/// is appended as-is.
pub fn upsert<T: Identified + Clone>(items: &[T], mut item: T, prefix: &str) -> (Vec<T>, T) {
    let mut out = items.to_vec();
    if item.id().trim().is_empty() {
        item.set_id(new_id(prefix));
        out.push(item.clone());
        return (out, item);
    }

    match out.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item.clone(),
        None => out.push(item.clone()),
    }
    (out, item)
}

/// Copy of `items` without the record `id`, `None` if nothing matched
pub fn remove<T: Identified + Clone>(items: &[T], id: &str) -> Option<Vec<T>> {
    let out: Vec<T> = items.iter().filter(|i| i.id() != id).cloned().collect();
    if out.len() == items.len() {
        None
    } else {
        Some(out)
    }
}

/// Give every record with an empty id a fresh one.
///
/// Fails on the first id that appears twice.
pub fn assign_ids<T: Identified>(items: &mut [T], prefix: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items.iter_mut() {
        if item.id().trim().is_empty() {
            item.set_id(new_id(prefix));
        }
        if !seen.insert(item.id().to_string()) {
            return Err(Error::Validation(format!("duplicate id '{}'", item.id())));
        }
    }
    Ok(())
}
