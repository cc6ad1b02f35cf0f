//! Domain hierarchy helpers for zone resolution
//!
//! A caller only knows a record name such as `test.demo.example.org`. The zone
//! holding it may be `demo.example.org`, `example.org` or even the full name,
//! depending on how the hierarchy is delegated. These helpers derive the
//! candidate zone names and pick the best zone out of the candidates the
//! provider returns.

use crate::model::Zone;

/// A record name without the trailing dot of its absolute form
///
/// ```
/// use hostingde_core::domain::relative_name;
///
/// assert_eq!(relative_name("www.example.org."), "www.example.org");
/// assert_eq!(relative_name("www.example.org"), "www.example.org");
/// ```
pub fn relative_name(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Candidate zone names for a record, longest first
///
/// The single-label suffix (the TLD) is never a candidate. A trailing dot of an
/// absolute name is ignored.
///
/// ```
/// use hostingde_core::domain::record_domain_list;
///
/// assert_eq!(
///     record_domain_list("test.demo.example.org"),
///     vec!["test.demo.example.org", "demo.example.org", "example.org"]
/// );
/// assert!(record_domain_list("localhost").is_empty());
/// ```
pub fn record_domain_list(record_name: &str) -> Vec<String> {
    let name = relative_name(record_name);
    if name.is_empty() {
        return Vec::new();
    }

    let labels: Vec<&str> = name.split('.').collect();
    let count = labels.len();

    (2..=count)
        .rev()
        .map(|take| labels[count - take..].join("."))
        .collect()
}

/// Zones sorted by depth, deepest first; zones of equal depth keep their order
pub fn zones_ordered_by_depth(zones: &[Zone]) -> Vec<&Zone> {
    let mut sorted: Vec<&Zone> = zones.iter().collect();
    // sort_by_key is stable
    sorted.sort_by_key(|zone| std::cmp::Reverse(zone.depth()));
    sorted
}

/// Pick the zone a record most likely belongs to
///
/// - No candidates: `None`
/// - One candidate: that zone
/// - Otherwise the deepest zone containing a matching record. When nothing
///   matches, the content and then the type are dropped from the match. When
///   still nothing matches, the deepest zone is returned; it may not contain
///   the record at all.
pub fn best_zone_for_record<'a>(
    zones: &'a [Zone],
    record_name: &str,
    record_type: Option<&str>,
    record_content: Option<&str>,
) -> Option<&'a Zone> {
    match zones {
        [] => return None,
        [only] => return Some(only),
        _ => {}
    }

    let sorted = zones_ordered_by_depth(zones);

    let mut attempts = vec![(record_type, record_content)];
    if record_content.is_some() {
        attempts.push((record_type, None));
    }
    if record_type.is_some() {
        attempts.push((None, None));
    }

    for (record_type, record_content) in attempts {
        if let Some(zone) = sorted
            .iter()
            .copied()
            .find(|zone| zone.contains_record(record_name, record_type, record_content))
        {
            return Some(zone);
        }
    }

    sorted.first().copied()
}
