//! Machine shape analyzer
//!
//! Analyzes the transition graph to classify its overall shape (a linear menu
//! flow, a branching tree of screens, or a cyclic UI) and to surface states the
//! initial state can never reach.

use super::{StateGraph, StateId};
use petgraph::Direction;
use petgraph::graph::NodeIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachinePattern {
    /// A -> B -> C -> D
    Linear,

    /// A -> B
    ///   -> C
    Tree,

    /// A -> B -> A
    Cyclic,

    /// No transitions at all
    Unknown,
}

impl MachinePattern {
    pub fn display_name(&self) -> &'static str {
        match self {
            MachinePattern::Linear => "Linear",
            MachinePattern::Tree => "Branching",
            MachinePattern::Cyclic => "Cyclic",
            MachinePattern::Unknown => "Complex/Unknown",
        }
    }
}

/// Analysis report containing pattern and metrics
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub pattern: MachinePattern,
    pub branching_factor: f64,
    /// Longest shortest-path distance from the initial state
    pub max_depth: usize,
    pub has_cycles: bool,
    pub unreachable: Vec<StateId>,
    pub dead_ends: Vec<StateId>,
}

/// Analyze `graph` as seen from `initial`
pub fn analyze(graph: &StateGraph, initial: StateId) -> AnalysisReport {
    let pg = graph.to_petgraph();
    let node_count = pg.node_count();

    if node_count == 0 || pg.edge_count() == 0 {
        return AnalysisReport {
            pattern: MachinePattern::Unknown,
            branching_factor: 0.0,
            max_depth: 0,
            has_cycles: false,
            unreachable: (0..node_count).filter(|&id| id != initial).collect(),
            dead_ends: (0..node_count).collect(),
        };
    }

    // Self loops count as cycles here even though every state can implicitly stay put.
    let has_cycles = petgraph::algo::is_cyclic_directed(&pg);

    let out_degrees: Vec<usize> = pg
        .node_indices()
        .map(|idx| pg.edges_directed(idx, Direction::Outgoing).count())
        .collect();
    let branching_factor = pg.edge_count() as f64 / node_count as f64;
    let max_out = out_degrees.iter().copied().max().unwrap_or(0);

    let pattern = if has_cycles {
        MachinePattern::Cyclic
    } else if max_out <= 1 {
        MachinePattern::Linear
    } else {
        MachinePattern::Tree
    };

    let distances = (initial < node_count)
        .then(|| petgraph::algo::dijkstra(&pg, NodeIndex::new(initial), None, |_| 1usize));
    let max_depth = distances
        .as_ref()
        .and_then(|d| d.values().copied().max())
        .unwrap_or(0);
    let unreachable = (0..node_count)
        .filter(|id| {
            !distances
                .as_ref()
                .is_some_and(|d| d.contains_key(&NodeIndex::new(*id)))
        })
        .collect();
    let dead_ends = out_degrees
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| id)
        .collect();

    AnalysisReport {
        pattern,
        branching_factor,
        max_depth,
        has_cycles,
        unreachable,
        dead_ends,
    }
}
