use serde::{Deserialize, Serialize};

/// Workflow action available on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

/// First transition from `allowed` (in preference order) offered by the
/// ticket. Names compare case-insensitively.
pub fn pick_resolve_transition<'a>(
    available: &'a [Transition],
    allowed: &[String],
) -> Option<&'a Transition> {
    allowed.iter().find_map(|wanted| {
        available
            .iter()
            .find(|t| t.name.to_lowercase() == wanted.to_lowercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(id: &str, name: &str) -> Transition {
        Transition {
            id: id.into(),
            name: name.into(),
        }
    }

    fn allowed() -> Vec<String> {
        vec!["resolve issue".into(), "close issue".into()]
    }

    #[test]
    fn match_is_case_insensitive() {
        let available = vec![t("11", "Start Progress"), t("21", "Close Issue")];
        assert_eq!(
            pick_resolve_transition(&available, &allowed()),
            Some(&available[1])
        );
    }

    #[test]
    fn preference_order_wins_over_ticket_order() {
        let available = vec![t("21", "Close Issue"), t("31", "Resolve Issue")];
        let picked = pick_resolve_transition(&available, &allowed()).unwrap();
        assert_eq!(picked.id, "31");
    }

    #[test]
    fn no_match_returns_none() {
        let available = vec![t("11", "Start Progress")];
        assert_eq!(pick_resolve_transition(&available, &allowed()), None);
    }
}
