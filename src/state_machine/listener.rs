//! Machine event listeners
//!
//! A [`Listener`] observes the commits of a [`Machine`](super::Machine). Every
//! callback has a no-op default so implementors only override what they need.
//! Callbacks get the machine's [`StateGraph`] to resolve names, never the machine
//! itself, so a listener cannot start another commit while one is in progress.

use super::{StateGraph, StateId, Transition};
use crate::Result;
use std::cell::RefCell;
use std::rc::Rc;

/// Observer of state machine events
pub trait Listener {
    /// Called after `state` became the current state
    fn on_state_entered(&mut self, _graph: &StateGraph, _state: StateId) -> Result<()> {
        Ok(())
    }

    /// Called before `state` stops being the current state
    fn on_state_exited(&mut self, _graph: &StateGraph, _state: StateId) -> Result<()> {
        Ok(())
    }

    /// Called after `on_state_entered` with the transition that was taken
    fn on_transition(&mut self, _graph: &StateGraph, _transition: &Transition) -> Result<()> {
        Ok(())
    }
}

/// Shared handle, so the registering code can still inspect its listener
impl<L: Listener + ?Sized> Listener for Rc<RefCell<L>> {
    fn on_state_entered(&mut self, graph: &StateGraph, state: StateId) -> Result<()> {
        self.borrow_mut().on_state_entered(graph, state)
    }

    fn on_state_exited(&mut self, graph: &StateGraph, state: StateId) -> Result<()> {
        self.borrow_mut().on_state_exited(graph, state)
    }

    fn on_transition(&mut self, graph: &StateGraph, transition: &Transition) -> Result<()> {
        self.borrow_mut().on_transition(graph, transition)
    }
}

/// Registration-ordered listener collection.
///
/// Dispatch is synchronous. The first callback that fails ends the round and its
/// error is returned; listeners after it are not called.
#[derive(Default)]
pub struct Listeners {
    listeners: Vec<Box<dyn Listener>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Box<dyn Listener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn state_exited(&mut self, graph: &StateGraph, state: StateId) -> Result<()> {
        for listener in &mut self.listeners {
            listener.on_state_exited(graph, state)?;
        }
        Ok(())
    }

    /// Per listener: `on_state_entered` then `on_transition`
    pub fn state_entered(
        &mut self,
        graph: &StateGraph,
        state: StateId,
        transition: &Transition,
    ) -> Result<()> {
        for listener in &mut self.listeners {
            listener.on_state_entered(graph, state)?;
            listener.on_transition(graph, transition)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

/// Logs every event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl Listener for TracingListener {
    fn on_state_entered(&mut self, graph: &StateGraph, state: StateId) -> Result<()> {
        tracing::info!("Entered state '{}'", graph.name(state));
        Ok(())
    }

    fn on_state_exited(&mut self, graph: &StateGraph, state: StateId) -> Result<()> {
        tracing::debug!("Exited state '{}'", graph.name(state));
        Ok(())
    }

    fn on_transition(&mut self, graph: &StateGraph, transition: &Transition) -> Result<()> {
        tracing::debug!(
            "Took transition {} -> {} ({})",
            graph.name(transition.from_state),
            graph.name(transition.to_state),
            transition.display_label()
        );
        Ok(())
    }
}

/// A recorded machine event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Exited(StateId),
    Entered(StateId),
    Transition(Transition),
}

/// Records events in the order they are dispatched
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// States entered so far, in order
    pub fn entered(&self) -> Vec<StateId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Entered(state) => Some(*state),
                _ => None,
            })
            .collect()
    }
}

impl Listener for EventLog {
    fn on_state_entered(&mut self, _graph: &StateGraph, state: StateId) -> Result<()> {
        self.events.push(Event::Entered(state));
        Ok(())
    }

    fn on_state_exited(&mut self, _graph: &StateGraph, state: StateId) -> Result<()> {
        self.events.push(Event::Exited(state));
        Ok(())
    }

    fn on_transition(&mut self, _graph: &StateGraph, transition: &Transition) -> Result<()> {
        self.events.push(Event::Transition(transition.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::state_machine::Action;

    struct OnlyEntered(Vec<StateId>);

    impl Listener for OnlyEntered {
        fn on_state_entered(&mut self, _graph: &StateGraph, state: StateId) -> Result<()> {
            self.0.push(state);
            Ok(())
        }
    }

    struct Failing;

    impl Listener for Failing {
        fn on_state_entered(&mut self, graph: &StateGraph, state: StateId) -> Result<()> {
            Err(Error::listener(format!("refused {}", graph.name(state))))
        }
    }

    fn graph() -> StateGraph {
        let mut graph = StateGraph::new();
        graph.add_state("a").unwrap();
        graph.add_state("b").unwrap();
        graph.add_transition(0, 1, Action::Epsilon).unwrap();
        graph
    }

    #[test]
    fn test_default_callbacks_are_noops() {
        let graph = graph();
        let transition = graph.transitions()[0].clone();
        let listener = Rc::new(RefCell::new(OnlyEntered(Vec::new())));

        let mut listeners = Listeners::new();
        listeners.register(Box::new(listener.clone()));
        listeners.state_exited(&graph, 0).unwrap();
        listeners.state_entered(&graph, 1, &transition).unwrap();

        assert_eq!(listener.borrow().0, vec![1]);
    }

    #[test]
    fn test_dispatch_order() {
        let graph = graph();
        let transition = graph.transitions()[0].clone();
        let first = Rc::new(RefCell::new(EventLog::new()));
        let second = Rc::new(RefCell::new(EventLog::new()));

        let mut listeners = Listeners::new();
        listeners.register(Box::new(first.clone()));
        listeners.register(Box::new(second.clone()));
        assert_eq!(listeners.len(), 2);

        listeners.state_exited(&graph, 0).unwrap();
        listeners.state_entered(&graph, 1, &transition).unwrap();

        let expected = vec![
            Event::Exited(0),
            Event::Entered(1),
            Event::Transition(transition),
        ];
        assert_eq!(first.borrow().events, expected);
        assert_eq!(second.borrow().events, expected);
        assert_eq!(first.borrow().entered(), vec![1]);
    }

    #[test]
    fn test_failure_skips_remaining_listeners() {
        let graph = graph();
        let transition = graph.transitions()[0].clone();
        let before = Rc::new(RefCell::new(EventLog::new()));
        let after = Rc::new(RefCell::new(EventLog::new()));

        let mut listeners = Listeners::new();
        listeners.register(Box::new(before.clone()));
        listeners.register(Box::new(Failing));
        listeners.register(Box::new(after.clone()));

        let err = listeners.state_entered(&graph, 1, &transition).unwrap_err();
        assert_eq!(err.to_string(), "Listener error: refused b");
        assert_eq!(before.borrow().events.len(), 2);
        assert!(after.borrow().events.is_empty());
    }

    #[test]
    fn test_tracing_listener_never_fails() {
        let graph = graph();
        let transition = graph.transitions()[0].clone();
        let mut listener = TracingListener;
        assert!(listener.on_state_exited(&graph, 0).is_ok());
        assert!(listener.on_state_entered(&graph, 1).is_ok());
        assert!(listener.on_transition(&graph, &transition).is_ok());
    }
}
