//! Index-name grouping.
//!
//! Index names follow a namespace convention: the text before the first `:`
//! or `.` delimiter names the queryable dimension, the remainder narrows it
//! (`"ping:us-east"`, `"map.sunsetvalley"`). Undelimited names are
//! namespaces with no suffixes.

use std::collections::BTreeMap;

/// Splits an index name at the first `:` or `.` delimiter.
pub fn split_index_name(name: &str) -> (&str, Option<&str>) {
    match name.find(&[':', '.'][..]) {
        Some(pos) => (&name[..pos], Some(&name[pos + 1..])),
        None => (name, None),
    }
}

/// Groups index names by namespace.
///
/// Namespaces and the suffix list under each come out sorted, so the
/// grouping is deterministic for any input order.
pub fn group_index_names<I>(names: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in names {
        let (namespace, suffix) = split_index_name(&name);
        let suffixes = grouped.entry(namespace.to_string()).or_default();
        if let Some(suffix) = suffix {
            suffixes.push(suffix.to_string());
        }
    }
    for suffixes in grouped.values_mut() {
        suffixes.sort();
    }
    grouped
}
