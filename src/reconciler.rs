//! Turning membership deltas into the absolute sets the API expects.
//!
//! The remote API only accepts a full membership list per user, while the
//! caller sends additions and removals. [`reconcile_membership`] fetches the
//! current list when it has to, merges the delta and hands back the list to
//! write. Filtering of ignored codes happens on the read path only
//! ([`filter_memberships`]); a write-back is never truncated.

use crate::error::ConnectorResult;
use crate::model::MembershipDelta;
use std::collections::HashSet;

/// Group every user belongs to implicitly; never reported as a membership.
pub const EVERYONE_GROUP: &str = "everyone";

/// Compute `(current ∪ add) \ remove`.
///
/// Current elements keep their order, new ones follow in the order given and
/// duplicates collapse to their first occurrence. An element present in both
/// `add` and `remove` is removed.
pub fn reconcile(current: Vec<String>, add: &[String], remove: &[String]) -> Vec<String> {
    let removed: HashSet<&str> = remove.iter().map(String::as_str).collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(current.len() + add.len());

    current
        .into_iter()
        .chain(add.iter().cloned())
        .filter(|code| !removed.contains(code.as_str()))
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

/// Resolve a membership delta into the list to write, if any.
///
/// Returns `None` without calling `fetch_current` when the delta is empty.
/// A full replacement list becomes the base set as is; otherwise the current
/// remote set is fetched once and the additions and removals are merged into
/// it.
pub async fn reconcile_membership<F, Fut>(
    delta: &MembershipDelta,
    fetch_current: F,
) -> ConnectorResult<Option<Vec<String>>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ConnectorResult<Vec<String>>>,
{
    if !delta.has_change() {
        return Ok(None);
    }

    let base = match &delta.replace {
        Some(replace) => replace.clone(),
        None => fetch_current().await?,
    };
    let add = delta.add.as_deref().unwrap_or_default();
    let remove = delta.remove.as_deref().unwrap_or_default();

    Ok(Some(reconcile(base, add, remove)))
}

/// Drop ignored codes, and optionally one built-in code, from a fetched list.
pub fn filter_memberships(
    values: Vec<String>,
    ignored: &HashSet<String>,
    builtin_excluded: Option<&str>,
) -> Vec<String> {
    values
        .into_iter()
        .filter(|v| !ignored.contains(v))
        .filter(|v| Some(v.as_str()) != builtin_excluded)
        .collect()
}
