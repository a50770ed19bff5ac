use std::cmp::Ordering;

/// Orders ticket keys such as `FOO-9` and `FOO-10` by creation order.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (split_key(a), split_key(b)) {
        (Some((pa, na)), Some((pb, nb))) => pa.cmp(pb).then(na.cmp(&nb)),
        _ => a.cmp(b),
    }
}

fn split_key(key: &str) -> Option<(&str, u64)> {
    let (project, number) = key.rsplit_once('-')?;
    number.parse().ok().map(|n| (project, n))
}
