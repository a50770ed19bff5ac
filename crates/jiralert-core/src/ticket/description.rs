/// Separates operator notes (above) from generated content (below).
pub const DESCRIPTION_BOUNDARY: &str = "_-- Alertmanager -- [only edit above]_";

pub fn initial_description(generated: &str) -> String {
    format!("{DESCRIPTION_BOUNDARY}\n\n{generated}")
}

/// Replaces the generated part of `existing`, keeping whatever an operator
/// wrote above the last boundary marker. Text without a marker is treated as
/// operator text.
pub fn merge_description(existing: Option<&str>, generated: &str) -> String {
    let existing = existing.unwrap_or_default();
    let custom = match existing.rfind(DESCRIPTION_BOUNDARY) {
        Some(pos) => &existing[..pos],
        None => existing,
    };
    let custom = custom.trim();

    if custom.is_empty() {
        initial_description(generated)
    } else {
        format!("{custom}\n\n{DESCRIPTION_BOUNDARY}\n\n{generated}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_starts_with_boundary() {
        let d = initial_description("generated");
        assert_eq!(d, format!("{DESCRIPTION_BOUNDARY}\n\ngenerated"));
    }

    #[test]
    fn merge_keeps_operator_notes() {
        let existing = format!("Looking into it -- bob\n\n{DESCRIPTION_BOUNDARY}\n\nold text");
        let merged = merge_description(Some(&existing), "new text");
        assert_eq!(
            merged,
            format!("Looking into it -- bob\n\n{DESCRIPTION_BOUNDARY}\n\nnew text")
        );
    }

    #[test]
    fn merge_without_notes_equals_initial() {
        let existing = initial_description("old text");
        assert_eq!(
            merge_description(Some(&existing), "new text"),
            initial_description("new text")
        );
    }

    #[test]
    fn merge_is_stable_across_updates() {
        let existing = format!("notes\n{DESCRIPTION_BOUNDARY}\nold");
        let once = merge_description(Some(&existing), "gen");
        let twice = merge_description(Some(&once), "gen");
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_without_boundary_keeps_everything_as_notes() {
        let merged = merge_description(Some("hand written"), "gen");
        assert_eq!(merged, format!("hand written\n\n{DESCRIPTION_BOUNDARY}\n\ngen"));
    }

    #[test]
    fn merge_missing_description() {
        assert_eq!(merge_description(None, "gen"), initial_description("gen"));
    }
}
