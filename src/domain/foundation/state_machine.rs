//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions on lifecycle statuses such as `FlightStatus`.

use std::fmt;

use thiserror::Error;

/// Why a requested transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError<S: fmt::Debug> {
    /// The target equals the current state.
    #[error("already in state {0:?}")]
    SameState(S),

    /// The edge `from -> to` is not part of the transition table.
    #[error("cannot transition from {from:?} to {to:?}")]
    InvalidTransition { from: S, to: S },
}

/// Trait for status enums that represent state machines.
///
/// Implementors define the edge set through `valid_transitions` and get
/// validated transition methods for free.
///
/// # Example
///
/// ```ignore
/// let next = FlightStatus::Boarding.transition_to(FlightStatus::Departed)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Debug + 'static {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> &'static [Self];

    /// Returns true if transition from self to target is an edge of the table.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation.
    ///
    /// Requesting the current state is rejected as `SameState`, never
    /// treated as a silent no-op.
    fn transition_to(&self, target: Self) -> Result<Self, TransitionError<Self>> {
        if *self == target {
            return Err(TransitionError::SameState(target));
        }
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(TransitionError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestStatus {
        Draft,
        Active,
        Completed,
        Archived,
    }

    impl StateMachine for TestStatus {
        fn valid_transitions(&self) -> &'static [Self] {
            use TestStatus::*;
            match self {
                Draft => &[Active],
                Active => &[Completed, Archived],
                Completed => &[Archived],
                Archived => &[],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(
            TestStatus::Draft.transition_to(TestStatus::Active),
            Ok(TestStatus::Active)
        );
    }

    #[test]
    fn transition_to_rejects_missing_edge() {
        assert_eq!(
            TestStatus::Draft.transition_to(TestStatus::Completed),
            Err(TransitionError::InvalidTransition {
                from: TestStatus::Draft,
                to: TestStatus::Completed
            })
        );
    }

    #[test]
    fn transition_to_same_state_is_an_error() {
        assert_eq!(
            TestStatus::Active.transition_to(TestStatus::Active),
            Err(TransitionError::SameState(TestStatus::Active))
        );
    }

    #[test]
    fn is_terminal_only_for_states_without_edges() {
        assert!(TestStatus::Archived.is_terminal());
        assert!(!TestStatus::Draft.is_terminal());
        assert!(!TestStatus::Completed.is_terminal());
    }
}
