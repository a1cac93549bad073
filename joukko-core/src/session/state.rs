//! Phase tracking for handing work over to the remote
//!
//! `pass` and `finish` share one shape: check for changes, commit (amend
//! or new), push, and on rejection either force push or undo the commit.

use crate::error::{Error, Result};
use std::fmt::Debug;

/// Phases of a pass or finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishPhase {
    Idle,
    ChangesChecked,
    /// Changes folded into the previous commit
    Amend,
    /// Changes recorded in a new commit
    NewCommit,
    Pushed,
    PushRejected,
    ForcePushed,
    /// Commit taken back after a failed or declined push
    Undone,
    /// Stopped before anything was committed
    AbortedPreCommit,
}

impl PublishPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PublishPhase::Pushed
                | PublishPhase::ForcePushed
                | PublishPhase::Undone
                | PublishPhase::AbortedPreCommit
        )
    }

    /// Whether the work reached the remote
    pub fn is_success(&self) -> bool {
        matches!(self, PublishPhase::Pushed | PublishPhase::ForcePushed)
    }
}

/// A basic state machine with an explicit transition table
#[derive(Debug, Clone)]
pub struct StateMachine<P: Clone + PartialEq + Debug> {
    current_phase: P,
    valid_transitions: Vec<(P, P)>,
}

impl<P: Clone + PartialEq + Debug> StateMachine<P> {
    /// Create a new state machine with the given initial phase
    pub fn new(initial_phase: P) -> Self {
        Self {
            current_phase: initial_phase,
            valid_transitions: Vec::new(),
        }
    }

    /// Add multiple valid transitions
    pub fn add_transitions(mut self, transitions: Vec<(P, P)>) -> Self {
        self.valid_transitions.extend(transitions);
        self
    }

    pub fn current_phase(&self) -> &P {
        &self.current_phase
    }

    pub fn can_transition_to(&self, phase: &P) -> bool {
        self.valid_transitions
            .iter()
            .any(|(f, t)| *f == self.current_phase && t == phase)
    }

    /// Move to `phase`, failing if the table does not allow it
    pub fn transition_to(&mut self, phase: P) -> Result<()> {
        if !self.can_transition_to(&phase) {
            return Err(Error::InvalidTransition {
                from: format!("{:?}", self.current_phase),
                to: format!("{:?}", phase),
            });
        }

        tracing::debug!(
            from = ?self.current_phase,
            to = ?phase,
            "Publish phase transition"
        );

        self.current_phase = phase;
        Ok(())
    }
}

/// State machine for one pass or finish, starting at [`PublishPhase::Idle`]
pub fn publish_machine() -> StateMachine<PublishPhase> {
    use PublishPhase::*;

    StateMachine::new(Idle).add_transitions(vec![
        (Idle, ChangesChecked),
        (ChangesChecked, AbortedPreCommit),
        (ChangesChecked, Amend),
        (ChangesChecked, NewCommit),
        // Amended history always goes out with a forced push
        (Amend, ForcePushed),
        (Amend, Undone),
        (NewCommit, Pushed),
        (NewCommit, PushRejected),
        (NewCommit, Undone),
        (PushRejected, ForcePushed),
        (PushRejected, Undone),
    ])
}
