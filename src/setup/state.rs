//! Ephemeral flow state for one setup session.

use serde::Serialize;

use super::form::{BasketForm, GrinderForm};
use super::step::SetupStep;

/// In-memory state of a running setup session.
///
/// Created at flow start, mutated by every input and navigation action, and
/// discarded on completion. Partial progress is never persisted — re-entering
/// setup restarts at `Welcome`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowState {
    pub step: SetupStep,
    pub grinder: GrinderForm,
    pub basket: BasketForm,
    pub is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the current step's gate allows moving forward.
    pub fn step_valid(&self) -> bool {
        match self.step {
            SetupStep::Welcome | SetupStep::Summary => true,
            SetupStep::GrinderSetup => self.grinder.is_valid,
            SetupStep::BasketSetup => self.basket.is_valid,
        }
    }

    /// Move forward one step. A failed gate is a silent no-op, not an error.
    /// Returns whether the step changed.
    pub fn advance(&mut self) -> bool {
        if !self.step_valid() {
            return false;
        }
        match self.step.next() {
            Some(next) if self.step.can_transition_to(next) => {
                self.step = next;
                true
            }
            _ => false,
        }
    }

    /// Move back one step, unconditionally. Returns whether the step changed.
    pub fn retreat(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::form::{BasketField, GrinderField};
    use super::*;

    fn state_with_valid_grinder() -> FlowState {
        let mut state = FlowState::new();
        state.grinder.set(GrinderField::ScaleMin, "5");
        state.grinder.set(GrinderField::ScaleMax, "25");
        state
    }

    #[test]
    fn welcome_advances_unconditionally() {
        let mut state = FlowState::new();
        assert!(state.advance());
        assert_eq!(state.step, SetupStep::GrinderSetup);
    }

    #[test]
    fn invalid_grinder_blocks_forward_silently() {
        let mut state = FlowState::new();
        state.advance();
        assert!(!state.advance());
        assert_eq!(state.step, SetupStep::GrinderSetup);
        assert!(state.error.is_none());
    }

    #[test]
    fn valid_grinder_unblocks_forward() {
        let mut state = state_with_valid_grinder();
        state.advance();
        assert!(state.advance());
        assert_eq!(state.step, SetupStep::BasketSetup);
    }

    #[test]
    fn retreat_needs_no_validity() {
        let mut state = state_with_valid_grinder();
        state.advance();
        state.advance();
        // Wreck the grinder form, then go back through it anyway
        state.grinder.set(GrinderField::ScaleMax, "junk");
        assert!(state.retreat());
        assert_eq!(state.step, SetupStep::GrinderSetup);
        assert!(state.retreat());
        assert_eq!(state.step, SetupStep::Welcome);
        assert!(!state.retreat());
    }

    #[test]
    fn invalid_basket_blocks_summary() {
        let mut state = state_with_valid_grinder();
        state.advance();
        state.advance();
        assert!(!state.advance());
        assert_eq!(state.step, SetupStep::BasketSetup);

        state.basket.set(BasketField::CoffeeInMin, "16");
        state.basket.set(BasketField::CoffeeInMax, "20");
        state.basket.set(BasketField::CoffeeOutMin, "32");
        state.basket.set(BasketField::CoffeeOutMax, "48");
        assert!(state.advance());
        assert_eq!(state.step, SetupStep::Summary);
        assert!(!state.advance());
    }
}
