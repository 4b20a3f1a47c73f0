//! Check-in state machine — the steps of the guided flow.

use serde::{Deserialize, Serialize};

/// The steps of a check-in.
///
/// Welcome → Rating → Open → Submitting → Complete, with Submitting → Open
/// when a submission fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStep {
    #[default]
    Welcome,
    Rating,
    Open,
    Submitting,
    Complete,
}

impl CheckInStep {
    /// Check if a transition from `self` to `target` is valid.
    ///
    /// Self-loops within `Rating` and `Open` are not transitions.
    pub fn can_transition_to(&self, target: CheckInStep) -> bool {
        use CheckInStep::*;
        matches!(
            (self, target),
            (Welcome, Rating)
                | (Rating, Open)
                | (Open, Submitting)
                | (Submitting, Complete)
                | (Submitting, Open)
        )
    }

    /// Whether this step is terminal (a new session is needed to go again).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Whether user input is accepted in this step.
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Welcome | Self::Rating | Self::Open)
    }
}

impl std::fmt::Display for CheckInStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::Rating => "rating",
            Self::Open => "open",
            Self::Submitting => "submitting",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CheckInStep; 5] = [
        CheckInStep::Welcome,
        CheckInStep::Rating,
        CheckInStep::Open,
        CheckInStep::Submitting,
        CheckInStep::Complete,
    ];

    #[test]
    fn valid_transitions() {
        use CheckInStep::*;
        let transitions = [
            (Welcome, Rating),
            (Rating, Open),
            (Open, Submitting),
            (Submitting, Complete),
            (Submitting, Open),
        ];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_transitions() {
        use CheckInStep::*;
        // Skip steps
        assert!(!Welcome.can_transition_to(Open));
        assert!(!Rating.can_transition_to(Submitting));
        assert!(!Open.can_transition_to(Complete));
        // Go backward
        assert!(!Open.can_transition_to(Rating));
        // Terminal
        for step in ALL {
            assert!(!Complete.can_transition_to(step));
        }
        // Self-transition
        assert!(!Rating.can_transition_to(Rating));
    }

    #[test]
    fn terminal_and_input_acceptance() {
        use CheckInStep::*;
        assert!(Complete.is_terminal());
        assert!(!Submitting.is_terminal());
        assert!(Welcome.accepts_input());
        assert!(Open.accepts_input());
        assert!(!Submitting.accepts_input());
        assert!(!Complete.accepts_input());
    }

    #[test]
    fn default_is_welcome() {
        assert_eq!(CheckInStep::default(), CheckInStep::Welcome);
    }

    #[test]
    fn display_matches_serde() {
        for step in ALL {
            let display = format!("{step}");
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(
                format!("\"{display}\""),
                json,
                "Display and serde should match for {step:?}"
            );
        }
    }
}
