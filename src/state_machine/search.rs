//! Reachability queries over a [`StateGraph`]

use super::{Action, StateGraph, StateId};
use std::collections::VecDeque;

/// Shortest path from `start` to `end` by breadth-first search.
///
/// Every stored transition is an edge, whatever its action. Outgoing transitions
/// are explored in storage order and each state remembers the state it was first
/// discovered from. Returns `[start]` when `start == end` and an empty path when
/// `end` cannot be reached or either id is unknown.
pub fn shortest_path(graph: &StateGraph, start: StateId, end: StateId) -> Vec<StateId> {
    if !graph.contains(start) || !graph.contains(end) {
        return Vec::new();
    }

    let mut visited = vec![false; graph.state_count()];
    let mut prev: Vec<Option<StateId>> = vec![None; graph.state_count()];
    let mut queue = VecDeque::from([start]);
    visited[start] = true;

    while let Some(current) = queue.pop_front() {
        for transition in graph.outgoing(current) {
            let next = transition.to_state;
            if !visited[next] {
                visited[next] = true;
                prev[next] = Some(current);
                queue.push_back(next);
            }
        }
    }

    let mut path = vec![end];
    let mut at = end;
    while let Some(previous) = prev[at] {
        path.push(previous);
        at = previous;
    }
    path.reverse();

    if path[0] == start { path } else { Vec::new() }
}

/// States that may result from performing `action` once in `root`.
///
/// That is every target of a transition from `root` labeled `action`, each
/// followed by the states reachable from it through epsilon transitions only. A
/// single visited set spans the whole query, so every state appears at most once.
/// The result is in discovery order and never contains `root`.
pub fn action_closure(graph: &StateGraph, root: StateId, action: &Action) -> Vec<StateId> {
    if !graph.contains(root) {
        return Vec::new();
    }

    let mut visited = vec![false; graph.state_count()];
    let mut reached = Vec::new();
    visit(graph, root, action, &mut visited, &mut reached);
    reached
}

fn visit(
    graph: &StateGraph,
    state: StateId,
    action: &Action,
    visited: &mut [bool],
    reached: &mut Vec<StateId>,
) {
    visited[state] = true;
    for transition in graph.outgoing(state) {
        let next = transition.to_state;
        if transition.action == *action && !visited[next] {
            reached.push(next);
            visit(graph, next, &Action::Epsilon, visited, reached);
        }
    }
}
