use super::listener::{Listener, Listeners};
use super::search::{action_closure, shortest_path};
use super::{Action, StateGraph, StateId, Transition};
use crate::{Error, Result};
use std::path::Path;

/// A non-deterministic finite state machine.
///
/// The topology is fixed at construction; the only thing that changes afterwards
/// is the current state, and only through [`Machine::transition_to`]. When several
/// transitions lead from the current state to the target, the first one stored is
/// taken.
///
/// A machine is meant to be owned by one thread. Embedders sharing it must
/// serialize access themselves.
#[derive(Debug)]
pub struct Machine {
    graph: StateGraph,
    current_state: StateId,
    listeners: Listeners,
}

impl Machine {
    /// Start in the first state of `graph`
    pub fn new(graph: StateGraph) -> Result<Self> {
        Self::with_initial_state(graph, 0)
    }

    pub fn with_initial_state(graph: StateGraph, initial_state: StateId) -> Result<Self> {
        if graph.is_empty() {
            return Err(Error::malformed("a machine needs at least one state"));
        }
        if !graph.contains(initial_state) {
            return Err(Error::InvalidStateId(initial_state));
        }

        Ok(Self {
            graph,
            current_state: initial_state,
            listeners: Listeners::new(),
        })
    }

    /// Load from a folder holding `states.csv` and `transitions.csv`
    pub fn from_csv(folder: impl AsRef<Path>) -> Result<Self> {
        Self::new(crate::loader::load_graph(folder)?)
    }

    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    pub fn current_name(&self) -> &str {
        self.graph.name(self.current_state)
    }

    pub fn register_listener(&mut self, listener: impl Listener + 'static) {
        self.listeners.register(Box::new(listener));
    }

    pub fn find_state(&self, name: &str) -> Option<StateId> {
        self.graph.find_state(name)
    }

    /// # Panics
    ///
    /// Panics if `state` is not a valid state id.
    pub fn name(&self, state: StateId) -> &str {
        self.graph.name(state)
    }

    pub fn find_transition(&self, a: StateId, b: StateId) -> Option<&Transition> {
        self.graph.find_transition(a, b)
    }

    /// Move to `state` over a direct transition from the current state.
    ///
    /// Listeners are told `on_state_exited` for the old state, then, once the
    /// current state changed, `on_state_entered` and `on_transition`. Without a
    /// direct transition nothing changes and no listener is called.
    ///
    /// A failing listener aborts the dispatch and its error is returned. If it
    /// failed while the old state was being exited, the current state is left
    /// unchanged.
    pub fn transition_to(&mut self, state: StateId) -> Result<()> {
        if !self.graph.contains(state) {
            return Err(Error::InvalidStateId(state));
        }

        let Some(transition_id) = self.graph.find_transition_id(self.current_state, state) else {
            return Err(Error::InvalidTransition {
                from: self.current_name().to_string(),
                to: self.graph.name(state).to_string(),
            });
        };

        tracing::debug!(
            "Transitioning {} -> {}",
            self.current_name(),
            self.graph.name(state)
        );

        self.listeners
            .state_exited(&self.graph, self.current_state)?;

        self.current_state = state;

        let transition = &self.graph.transitions()[transition_id];
        self.listeners
            .state_entered(&self.graph, state, transition)
    }

    /// States that could become current by performing `action` now. Does not
    /// change the current state.
    pub fn simulate_action(&self, action: &Action) -> Vec<StateId> {
        action_closure(&self.graph, self.current_state, action)
    }

    /// Shortest path from `start` (the current state when `None`) to `end`.
    /// Empty when `end` is unreachable.
    pub fn bfs(&self, end: StateId, start: Option<StateId>) -> Vec<StateId> {
        shortest_path(&self.graph, start.unwrap_or(self.current_state), end)
    }

    /// Follow the shortest path to `state`, committing one transition per hop.
    ///
    /// Returns the states entered, which is empty if `state` already is the
    /// current state. Fails without moving if `state` is unreachable.
    pub fn walk_to(&mut self, state: StateId) -> Result<Vec<StateId>> {
        if !self.graph.contains(state) {
            return Err(Error::InvalidStateId(state));
        }

        let path = self.bfs(state, None);
        if path.is_empty() {
            return Err(Error::Unreachable {
                from: self.current_name().to_string(),
                to: self.graph.name(state).to_string(),
            });
        }

        let hops = path[1..].to_vec();
        for &next in &hops {
            self.transition_to(next)?;
        }
        Ok(hops)
    }
}
