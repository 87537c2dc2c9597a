//! Tests against the bundled `resources/menu` machine.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use ui_fsm::driver::{Driver, parse_trace};
use ui_fsm::state_machine::analyzer::{MachinePattern, analyze};
use ui_fsm::state_machine::{Action, Event, EventLog, Machine};

fn menu_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/menu")
}

fn load() -> Machine {
    Machine::from_csv(menu_dir()).unwrap()
}

#[test]
fn test_loads_bundled_machine() {
    let machine = load();
    let graph = machine.graph();
    assert_eq!(machine.current_state(), 0);
    assert_eq!(machine.current_name(), "start");
    assert_eq!(graph.state_count(), 11);
    assert_eq!(graph.transition_count(), 17);
    assert_eq!(graph.stats().epsilon_transitions, 2);

    for id in 0..graph.state_count() {
        assert_eq!(machine.find_state(machine.name(id)), Some(id));
    }
}

#[test]
fn test_shortest_path_to_end() {
    let machine = load();
    let end = machine.find_state("end").unwrap();
    let path: Vec<&str> = machine
        .bfs(end, None)
        .into_iter()
        .map(|id| machine.name(id))
        .collect();
    assert_eq!(
        path,
        vec![
            "start",
            "title",
            "continue",
            "overworld",
            "menu",
            "save",
            "save_confirm",
            "end"
        ]
    );
}

#[test]
fn test_nondeterministic_actions() {
    let graph = load().graph().clone();
    let menu = graph.find_state("menu").unwrap();
    let machine = Machine::with_initial_state(graph.clone(), menu).unwrap();
    let names = |ids: Vec<usize>| {
        ids.into_iter()
            .map(|id| graph.name(id).to_string())
            .collect::<Vec<_>>()
    };

    assert_eq!(
        names(machine.simulate_action(&Action::labeled("down"))),
        vec!["bag", "save"]
    );

    let confirm = graph.find_state("save_confirm").unwrap();
    let machine = Machine::with_initial_state(graph.clone(), confirm).unwrap();
    // `end` is followed by its epsilon transition back to `title`.
    assert_eq!(
        names(machine.simulate_action(&Action::labeled("press_a"))),
        vec!["overworld", "end", "title"]
    );
    assert!(machine.simulate_action(&Action::labeled("press_x")).is_empty());
}

#[test]
fn test_replay_bundled_trace() {
    let mut machine = load();
    let log = Rc::new(RefCell::new(EventLog::new()));
    machine.register_listener(log.clone());

    let trace = std::fs::File::open(menu_dir().join("trace.csv")).unwrap();
    let observations = parse_trace(trace, machine.graph()).unwrap();
    assert_eq!(observations.len(), 7);

    let driver = Driver::new(0.95);
    for observation in observations {
        driver.observe(&mut machine, observation).unwrap();
    }

    assert_eq!(machine.current_name(), "end");
    let entered: Vec<&str> = log
        .borrow()
        .entered()
        .into_iter()
        .map(|id| machine.name(id))
        .collect();
    assert_eq!(
        entered,
        vec![
            "title",
            "continue",
            "overworld",
            "menu",
            "party",
            "member_summary",
            "party",
            "menu",
            "save",
            "save_confirm",
            "end"
        ]
    );

    let events = log.borrow().events.clone();
    assert_eq!(events.len(), 3 * 11);
    assert_eq!(events[0], Event::Exited(0));
}

#[test]
fn test_analysis() {
    let machine = load();
    let report = analyze(machine.graph(), machine.current_state());
    assert_eq!(report.pattern, MachinePattern::Cyclic);
    assert!(report.unreachable.is_empty());
    assert!(report.dead_ends.is_empty());
    assert_eq!(report.max_depth, 7);
}
