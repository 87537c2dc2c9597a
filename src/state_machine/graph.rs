use crate::state_machine::{Action, State, StateId, Transition, TransitionId};
use crate::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

/// The fixed topology of a machine: its states and the transitions between them.
///
/// Transitions live in a single sequence and are addressed by [`TransitionId`].
/// Each [`State`] keeps the ids of the transitions entering and leaving it, so the
/// transition sequence stays the only source of truth.
///
/// Every state implicitly has a reflexive epsilon transition. It is never stored,
/// so none of the lookups below return it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StateGraph {
    states: Vec<State>,
    transitions: Vec<Transition>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state and returns its id. State names must be unique.
    pub fn add_state(&mut self, name: impl Into<String>) -> Result<StateId> {
        let name = name.into();
        if self.find_state(&name).is_some() {
            return Err(Error::malformed(format!("duplicate state name '{}'", name)));
        }

        self.states.push(State::new(name));
        Ok(self.states.len() - 1)
    }

    /// Adds a transition between two existing states and links it into both
    /// states' transition lists.
    pub fn add_transition(
        &mut self,
        from_state: StateId,
        to_state: StateId,
        action: Action,
    ) -> Result<TransitionId> {
        for id in [from_state, to_state] {
            if id >= self.states.len() {
                return Err(Error::malformed(format!(
                    "transition references unknown state id {}",
                    id
                )));
            }
        }

        let id = self.transitions.len();
        self.transitions
            .push(Transition::new(from_state, to_state, action));
        self.states[from_state].outgoing.push(id);
        self.states[to_state].incoming.push(id);
        Ok(id)
    }

    /// Find a state by its name
    pub fn find_state(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|state| state.name == name)
    }

    /// Name of the state with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a valid state id.
    pub fn name(&self, id: StateId) -> &str {
        &self.states[id].name
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    pub fn contains(&self, id: StateId) -> bool {
        id < self.states.len()
    }

    /// First stored transition leading from `a` to `b`
    pub fn find_transition(&self, a: StateId, b: StateId) -> Option<&Transition> {
        self.find_transition_id(a, b).map(|id| &self.transitions[id])
    }

    pub fn find_transition_id(&self, a: StateId, b: StateId) -> Option<TransitionId> {
        self.transitions
            .iter()
            .position(|t| t.from_state == a && t.to_state == b)
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(id)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Transitions leaving `id`, in storage order. Empty for an unknown id.
    pub fn outgoing(&self, id: StateId) -> impl Iterator<Item = &Transition> + '_ {
        self.states
            .get(id)
            .into_iter()
            .flat_map(move |state| state.outgoing.iter().map(move |&t| &self.transitions[t]))
    }

    /// Transitions entering `id`, in storage order. Empty for an unknown id.
    pub fn incoming(&self, id: StateId) -> impl Iterator<Item = &Transition> + '_ {
        self.states
            .get(id)
            .into_iter()
            .flat_map(move |state| state.incoming.iter().map(move |&t| &self.transitions[t]))
    }

    /// Mirror the topology into a petgraph graph. Node indices equal state ids and
    /// edge weights are transition ids.
    pub fn to_petgraph(&self) -> DiGraph<StateId, TransitionId> {
        let mut graph = DiGraph::with_capacity(self.states.len(), self.transitions.len());
        for id in 0..self.states.len() {
            graph.add_node(id);
        }
        for (id, transition) in self.transitions.iter().enumerate() {
            graph.add_edge(
                NodeIndex::new(transition.from_state),
                NodeIndex::new(transition.to_state),
                id,
            );
        }
        graph
    }

    /// Export to DOT format for Graphviz
    pub fn to_dot(&self) -> String {
        let mut dot = "digraph StateMachine {\n".to_string();
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box];\n\n");

        for (id, state) in self.states.iter().enumerate() {
            dot.push_str(&format!(
                "  s{} [label=\"{}\"];\n",
                id,
                escape_dot(&state.name)
            ));
        }

        dot.push('\n');

        for transition in &self.transitions {
            let style = if transition.is_epsilon() {
                ", style=dashed"
            } else {
                ""
            };
            dot.push_str(&format!(
                "  s{} -> s{} [label=\"{}\"{}];\n",
                transition.from_state,
                transition.to_state,
                escape_dot(&transition.display_label()),
                style
            ));
        }

        dot.push_str("}\n");
        dot
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_states: self.states.len(),
            total_transitions: self.transitions.len(),
            epsilon_transitions: self.transitions.iter().filter(|t| t.is_epsilon()).count(),
            dead_end_states: self.states.iter().filter(|s| s.is_dead_end()).count(),
        }
    }
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_states: usize,
    pub total_transitions: usize,
    pub epsilon_transitions: usize,
    pub dead_end_states: usize,
}
