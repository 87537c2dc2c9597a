//! Transition representation

use crate::state_machine::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a transition in its machine's transition sequence
pub type TransitionId = usize;

/// The trigger of a transition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Taken without any external trigger
    Epsilon,
    /// Taken when the named action is performed
    Labeled(String),
}

impl Action {
    pub fn labeled(label: impl Into<String>) -> Self {
        Action::Labeled(label.into())
    }

    /// Interpret a raw table field: the empty string is epsilon
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Action::Epsilon
        } else {
            Action::Labeled(field.to_string())
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Action::Epsilon)
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Action::Epsilon => None,
            Action::Labeled(label) => Some(label),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Epsilon => write!(f, "ε"),
            Action::Labeled(label) => write!(f, "{}", label),
        }
    }
}

/// A directed edge between two states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from_state: StateId,
    pub to_state: StateId,
    pub action: Action,
}

impl Transition {
    pub fn new(from_state: StateId, to_state: StateId, action: Action) -> Self {
        Self {
            from_state,
            to_state,
            action,
        }
    }

    pub fn epsilon(from_state: StateId, to_state: StateId) -> Self {
        Self::new(from_state, to_state, Action::Epsilon)
    }

    pub fn is_epsilon(&self) -> bool {
        self.action.is_epsilon()
    }

    /// Get display label for the transition
    pub fn display_label(&self) -> String {
        self.action.to_string()
    }
}
