//! Property-based tests for the state machine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated machines.

use proptest::prelude::*;
use ui_fsm::state_machine::{Action, Machine, StateGraph, StateId};

const ACTIONS: [&str; 3] = ["", "press_a", "press_b"];

prop_compose! {
    fn arbitrary_graph()(state_count in 1..8usize)
        (edges in prop::collection::vec((0..state_count, 0..state_count, 0..ACTIONS.len()), 0..20),
         state_count in Just(state_count)) -> StateGraph {
        let mut graph = StateGraph::new();
        for i in 0..state_count {
            graph.add_state(format!("s{}", i)).unwrap();
        }
        for (from, to, action) in edges {
            graph.add_transition(from, to, Action::from_field(ACTIONS[action])).unwrap();
        }
        graph
    }
}

fn reachable(graph: &StateGraph, start: StateId) -> Vec<bool> {
    let mut seen = vec![false; graph.state_count()];
    let mut stack = vec![start];
    seen[start] = true;
    while let Some(state) = stack.pop() {
        for transition in graph.outgoing(state) {
            if !seen[transition.to_state] {
                seen[transition.to_state] = true;
                stack.push(transition.to_state);
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn name_lookup_round_trips(graph in arbitrary_graph()) {
        for id in 0..graph.state_count() {
            prop_assert_eq!(graph.find_state(graph.name(id)), Some(id));
        }
    }

    #[test]
    fn back_references_are_consistent(graph in arbitrary_graph()) {
        for (id, state) in graph.states().iter().enumerate() {
            for &t in &state.outgoing {
                prop_assert_eq!(graph.transitions()[t].from_state, id);
            }
            for &t in &state.incoming {
                prop_assert_eq!(graph.transitions()[t].to_state, id);
            }
        }
        let total_out: usize = graph.states().iter().map(|s| s.outgoing.len()).sum();
        let total_in: usize = graph.states().iter().map(|s| s.incoming.len()).sum();
        prop_assert_eq!(total_out, graph.transition_count());
        prop_assert_eq!(total_in, graph.transition_count());
    }

    #[test]
    fn bfs_paths_are_valid(graph in arbitrary_graph(), start_seed in any::<usize>(), end_seed in any::<usize>()) {
        let start = start_seed % graph.state_count();
        let end = end_seed % graph.state_count();
        let machine = Machine::new(graph.clone()).unwrap();
        let path = machine.bfs(end, Some(start));

        if reachable(&graph, start)[end] {
            prop_assert_eq!(path.first().copied(), Some(start));
            prop_assert_eq!(path.last().copied(), Some(end));
            for pair in path.windows(2) {
                prop_assert!(graph.find_transition(pair[0], pair[1]).is_some());
            }
            if start == end {
                prop_assert_eq!(path, vec![start]);
            }
        } else {
            prop_assert!(path.is_empty());
        }
    }

    #[test]
    fn simulate_action_is_pure(graph in arbitrary_graph(), action in 0..ACTIONS.len()) {
        let machine = Machine::new(graph).unwrap();
        let action = Action::from_field(ACTIONS[action]);
        let first = machine.simulate_action(&action);
        let second = machine.simulate_action(&action);

        prop_assert_eq!(machine.current_state(), 0);
        prop_assert!(!first.contains(&0));
        let mut deduped = first.clone();
        deduped.sort_unstable();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), first.len());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn transition_to_requires_direct_edge(graph in arbitrary_graph(), target_seed in any::<usize>()) {
        let target = target_seed % graph.state_count();
        let has_edge = graph.find_transition(0, target).is_some();
        let mut machine = Machine::new(graph).unwrap();

        let result = machine.transition_to(target);
        prop_assert_eq!(result.is_ok(), has_edge);
        prop_assert_eq!(machine.current_state(), if has_edge { target } else { 0 });
    }
}
