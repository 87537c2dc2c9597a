//! UI State Machine
//!
//! A non-deterministic finite state machine engine for tracking and navigating
//! the screens of a game or application UI.
//!
//! This library provides functionality for:
//! - Loading machines from CSV state and transition tables
//! - Committing transitions with listener-based event dispatch
//! - Shortest-path search between states
//! - Simulating which states an action may lead to
//! - Walking a machine to externally observed states
//!
//! ```
//! use ui_fsm::state_machine::{Action, Machine, StateGraph};
//!
//! let mut graph = StateGraph::new();
//! let start = graph.add_state("start").unwrap();
//! let middle = graph.add_state("middle").unwrap();
//! let end = graph.add_state("end").unwrap();
//! graph.add_transition(start, middle, Action::Epsilon).unwrap();
//! graph.add_transition(middle, end, Action::labeled("press_a")).unwrap();
//!
//! let mut machine = Machine::new(graph).unwrap();
//! assert_eq!(machine.bfs(end, None), vec![start, middle, end]);
//! machine.transition_to(middle).unwrap();
//! assert_eq!(machine.simulate_action(&Action::labeled("press_a")), vec![end]);
//! ```

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod loader;
pub mod state_machine;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
