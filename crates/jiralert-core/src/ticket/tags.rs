use std::collections::BTreeMap;
use std::collections::BTreeSet;

pub const BASE_TAG: &str = "alert";

const TAG_WHITELIST: [&str; 6] = ["severity", "dc", "env", "perimeter", "team", "jiralert"];

pub type TagSet = BTreeSet<String>;

/// Ticket labels derived from the group's common labels.
pub fn build_tags(common_labels: &BTreeMap<String, String>) -> TagSet {
    let mut tags = TagSet::new();
    tags.insert(BASE_TAG.to_string());

    for (key, value) in common_labels {
        if TAG_WHITELIST.contains(&key.as_str()) {
            tags.insert(format!("{key}:{value}"));
        }
        if key == "tags" {
            tags.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from),
            );
        }
    }
    tags
}
