use std::cmp::Ordering;

use compare::{natural, Compare, Natural, Rev};
use rb_ordered_map::RbMap;

/// Orders version strings like "1.10.2" numerically, component by component.
#[derive(Debug, Clone, Copy, Default)]
struct VersionOrder;

impl VersionOrder {
    fn components(s: &str) -> impl Iterator<Item = u64> + '_ {
        s.split('.').map(|part| part.parse().unwrap_or(0))
    }
}

impl Compare<String> for VersionOrder {
    fn compare(&self, a: &String, b: &String) -> Ordering {
        Self::components(a).cmp(Self::components(b))
    }
}

fn main() {
    let mut releases: RbMap<String, &str, VersionOrder> = RbMap::with_comparator(VersionOrder);
    releases.insert("1.10.0".to_string(), "stable");
    releases.insert("1.2.3".to_string(), "legacy");
    releases.insert("1.9.1".to_string(), "lts");
    releases.insert("2.0.0".to_string(), "next");

    let order: Vec<_> = releases.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["1.2.3", "1.9.1", "1.10.0", "2.0.0"]);

    // the newest release at or below 1.9.5
    let upper = releases.upper_bound(&"1.9.5".to_string());
    let newest = releases.entry_at(releases.prev(upper));
    assert_eq!(newest, Some((&"1.9.1".to_string(), &"lts")));

    let mut descending: RbMap<u32, char, Rev<Natural<u32>>> =
        RbMap::with_comparator(natural().rev());
    descending.extend([(1, 'a'), (3, 'c'), (2, 'b')]);
    let letters: String = descending.values().collect();
    assert_eq!(letters, "cba");

    println!("{releases:?}");
    println!("{descending:?}");
}
