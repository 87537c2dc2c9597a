//! State representation

use crate::state_machine::TransitionId;
use serde::{Deserialize, Serialize};

/// Index of a state in its machine's state sequence
pub type StateId = usize;

/// A named node of the machine.
///
/// `incoming` and `outgoing` index into the owning [`StateGraph`](super::StateGraph)'s
/// transition sequence and are kept in storage order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub incoming: Vec<TransitionId>,
    pub outgoing: Vec<TransitionId>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// No stored transition leaves this state
    pub fn is_dead_end(&self) -> bool {
        self.outgoing.is_empty()
    }
}
