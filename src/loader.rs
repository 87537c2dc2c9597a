//! CSV loader
//!
//! A machine is stored as a folder with two header-less CSV files:
//! - `states.csv`: one state name per row. Row order defines the state ids and the
//!   first row is the initial state.
//! - `transitions.csv`: `action,from,to` per row. An empty action is an epsilon
//!   transition.

use crate::state_machine::{Action, StateGraph};
use crate::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const STATES_FILE: &str = "states.csv";
pub const TRANSITIONS_FILE: &str = "transitions.csv";

/// Load the graph stored in `folder`
pub fn load_graph(folder: impl AsRef<Path>) -> Result<StateGraph> {
    let folder = folder.as_ref();
    tracing::info!("Loading state machine from {:?}", folder);

    let states = open(&folder.join(STATES_FILE))?;
    let transitions = open(&folder.join(TRANSITIONS_FILE))?;
    let graph = from_readers(states, transitions)?;

    tracing::info!(
        "Loaded {} states and {} transitions",
        graph.state_count(),
        graph.transition_count()
    );
    Ok(graph)
}

/// Load the state names of a single state table
pub fn load_states(path: impl AsRef<Path>) -> Result<Vec<String>> {
    read_states(open(path.as_ref())?)
}

/// Build a graph from a state table and a transition table
pub fn from_readers(states: impl Read, transitions: impl Read) -> Result<StateGraph> {
    let mut graph = StateGraph::new();
    for name in read_states(states)? {
        graph.add_state(name)?;
    }

    for (row, record) in reader(transitions).records().enumerate() {
        let record = record?;
        let (Some(action), Some(from), Some(to)) = (record.get(0), record.get(1), record.get(2))
        else {
            return Err(Error::malformed(format!(
                "{} row {}: expected 3 columns, found {}",
                TRANSITIONS_FILE,
                row + 1,
                record.len()
            )));
        };

        let from_state = resolve(&graph, from, row)?;
        let to_state = resolve(&graph, to, row)?;
        graph.add_transition(from_state, to_state, Action::from_field(action))?;
    }

    Ok(graph)
}

fn read_states(source: impl Read) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for (row, record) in reader(source).records().enumerate() {
        let record = record?;
        let name = record.get(0).unwrap_or_default();
        if name.is_empty() {
            return Err(Error::malformed(format!(
                "{} row {}: empty state name",
                STATES_FILE,
                row + 1
            )));
        }
        if names.iter().any(|existing| existing == name) {
            return Err(Error::malformed(format!(
                "{} row {}: duplicate state name '{}'",
                STATES_FILE,
                row + 1,
                name
            )));
        }
        names.push(name.to_string());
    }

    if names.is_empty() {
        return Err(Error::malformed(format!("{} defines no states", STATES_FILE)));
    }
    Ok(names)
}

fn resolve(graph: &StateGraph, name: &str, row: usize) -> Result<usize> {
    graph.find_state(name).ok_or_else(|| {
        Error::malformed(format!(
            "{} row {}: unknown state '{}'",
            TRANSITIONS_FILE,
            row + 1,
            name
        ))
    })
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open {:?}: {}", path, e),
        ))
    })
}
