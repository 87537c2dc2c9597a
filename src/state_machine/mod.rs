//! State machine module - Graph store, search and the machine itself

pub mod analyzer;
pub mod graph;
pub mod listener;
pub mod machine;
pub mod search;
pub mod state;
pub mod transition;

// Re-export key types
pub use graph::{GraphStats, StateGraph};
pub use listener::{Event, EventLog, Listener, Listeners, TracingListener};
pub use machine::Machine;
pub use state::{State, StateId};
pub use transition::{Action, Transition, TransitionId};
