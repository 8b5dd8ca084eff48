//! Setup wizard step machine.

use serde::{Deserialize, Serialize};

/// The steps of the first-run setup wizard.
///
/// Linear topology: Welcome → GrinderSetup → BasketSetup → Summary, with one
/// backward edge per step after Welcome. Forward gating on form validity is
/// the flow state's job; this type only knows the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupStep {
    Welcome,
    GrinderSetup,
    BasketSetup,
    Summary,
}

impl SetupStep {
    /// Check if an edge exists from `self` to `target`, in either direction.
    pub fn can_transition_to(&self, target: SetupStep) -> bool {
        use SetupStep::*;
        matches!(
            (self, target),
            (Welcome, GrinderSetup)
                | (GrinderSetup, BasketSetup)
                | (BasketSetup, Summary)
                | (GrinderSetup, Welcome)
                | (BasketSetup, GrinderSetup)
                | (Summary, BasketSetup)
        )
    }

    /// The next step forward, if any.
    pub fn next(&self) -> Option<SetupStep> {
        use SetupStep::*;
        match self {
            Welcome => Some(GrinderSetup),
            GrinderSetup => Some(BasketSetup),
            BasketSetup => Some(Summary),
            Summary => None,
        }
    }

    /// The previous step, if any.
    pub fn previous(&self) -> Option<SetupStep> {
        use SetupStep::*;
        match self {
            Welcome => None,
            GrinderSetup => Some(Welcome),
            BasketSetup => Some(GrinderSetup),
            Summary => Some(BasketSetup),
        }
    }

    /// Whether this is the last step, from which persistence is triggered.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Summary)
    }
}

impl Default for SetupStep {
    fn default() -> Self {
        Self::Welcome
    }
}

impl std::fmt::Display for SetupStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::GrinderSetup => "grinder_setup",
            Self::BasketSetup => "basket_setup",
            Self::Summary => "summary",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_edges() {
        use SetupStep::*;
        let edges = [
            (Welcome, GrinderSetup),
            (GrinderSetup, BasketSetup),
            (BasketSetup, Summary),
        ];
        for (from, to) in edges {
            assert!(from.can_transition_to(to), "{from} should reach {to}");
            assert_eq!(from.next(), Some(to));
        }
        assert!(Summary.next().is_none());
    }

    #[test]
    fn backward_edges_mirror_forward_edges() {
        use SetupStep::*;
        let edges = [
            (GrinderSetup, Welcome),
            (BasketSetup, GrinderSetup),
            (Summary, BasketSetup),
        ];
        for (from, to) in edges {
            assert!(from.can_transition_to(to), "{from} should go back to {to}");
            assert_eq!(from.previous(), Some(to));
        }
        assert!(Welcome.previous().is_none());
    }

    #[test]
    fn no_skipping_or_self_edges() {
        use SetupStep::*;
        assert!(!Welcome.can_transition_to(BasketSetup));
        assert!(!Welcome.can_transition_to(Summary));
        assert!(!GrinderSetup.can_transition_to(Summary));
        assert!(!Summary.can_transition_to(Welcome));
        assert!(!GrinderSetup.can_transition_to(GrinderSetup));
    }

    #[test]
    fn only_summary_is_final() {
        use SetupStep::*;
        assert!(Summary.is_final());
        assert!(!Welcome.is_final());
        assert!(!GrinderSetup.is_final());
        assert!(!BasketSetup.is_final());
    }

    #[test]
    fn display_matches_serde() {
        use SetupStep::*;
        for step in [Welcome, GrinderSetup, BasketSetup, Summary] {
            let display = format!("{step}");
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }
}
