//! Output formatting module
//!
//! This module handles formatting machines, paths and events for different
//! output formats.

use crate::state_machine::analyzer::AnalysisReport;
use crate::state_machine::{Event, StateGraph, StateId};
use crate::{Error, Result};
use serde_json::json;

use super::OutputFormat;

/// Output a machine and its analysis as JSON
pub fn output_machine_json(
    w: &mut impl std::io::Write,
    graph: &StateGraph,
    report: &AnalysisReport,
) -> Result<()> {
    let output = json!({
        "summary": {
            "total_states": graph.state_count(),
            "total_transitions": graph.transition_count(),
            "pattern": report.pattern.display_name(),
            "branching_factor": report.branching_factor,
            "max_depth": report.max_depth,
            "has_cycles": report.has_cycles,
            "unreachable": names(graph, &report.unreachable),
            "dead_ends": names(graph, &report.dead_ends),
        },
        "states": graph.states().iter().enumerate().map(|(id, state)| {
            json!({
                "id": id,
                "name": state.name,
                "outgoing": state.outgoing,
                "incoming": state.incoming,
            })
        }).collect::<Vec<_>>(),
        "transitions": graph.transitions().iter().enumerate().map(|(id, t)| {
            json!({
                "id": id,
                "from": graph.name(t.from_state),
                "to": graph.name(t.to_state),
                "action": t.action.label(),
            })
        }).collect::<Vec<_>>(),
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?;
    Ok(())
}

/// Output a machine and its analysis as text table
pub fn output_machine_table(
    w: &mut impl std::io::Write,
    graph: &StateGraph,
    report: &AnalysisReport,
) -> Result<()> {
    writeln!(w, "UI State Machine - Inspection Results")?;
    writeln!(w, "{}", "=".repeat(80))?;
    writeln!(w)?;

    let stats = graph.stats();
    writeln!(w, "Summary:")?;
    writeln!(w, "  Total States:        {}", stats.total_states)?;
    writeln!(w, "  Total Transitions:   {}", stats.total_transitions)?;
    writeln!(w, "  Epsilon Transitions: {}", stats.epsilon_transitions)?;
    writeln!(w, "  Pattern:             {}", report.pattern.display_name())?;
    writeln!(w, "  Branching Factor:    {:.2}", report.branching_factor)?;
    writeln!(w, "  Max Depth:           {}", report.max_depth)?;
    if !report.unreachable.is_empty() {
        writeln!(
            w,
            "  Unreachable:         {}",
            names(graph, &report.unreachable).join(", ")
        )?;
    }
    if !report.dead_ends.is_empty() {
        writeln!(
            w,
            "  Dead Ends:           {}",
            names(graph, &report.dead_ends).join(", ")
        )?;
    }
    writeln!(w)?;

    writeln!(w, "States:")?;
    writeln!(w, "{:-<80}", "")?;
    writeln!(w, "{:>5} {:<40} {:>8} {:>8}", "ID", "Name", "In", "Out")?;
    writeln!(w, "{:-<80}", "")?;
    for (id, state) in graph.states().iter().enumerate() {
        writeln!(
            w,
            "{:>5} {:<40} {:>8} {:>8}",
            id,
            truncate(&state.name, 40),
            state.incoming.len(),
            state.outgoing.len()
        )?;
    }
    writeln!(w)?;

    if graph.transition_count() > 0 {
        writeln!(w, "Transitions:")?;
        writeln!(w, "{:-<80}", "")?;
        writeln!(w, "{:<20} {:<29} {:<29}", "Action", "From", "To")?;
        writeln!(w, "{:-<80}", "")?;
        for transition in graph.transitions() {
            writeln!(
                w,
                "{:<20} {:<29} {:<29}",
                truncate(&transition.display_label(), 20),
                truncate(graph.name(transition.from_state), 29),
                truncate(graph.name(transition.to_state), 29)
            )?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Output an ordered list of states, e.g. a path or a simulation result
pub fn output_states(
    w: &mut impl std::io::Write,
    graph: &StateGraph,
    title: &str,
    states: &[StateId],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = json!({
                "title": title,
                "states": states.iter().map(|&id| json!({
                    "id": id,
                    "name": graph.name(id),
                })).collect::<Vec<_>>(),
            });
            serde_json::to_writer_pretty(&mut *w, &output)?;
            writeln!(w)?;
        }
        OutputFormat::Table => {
            writeln!(w, "{}", title)?;
            if states.is_empty() {
                writeln!(w, "  (none)")?;
            }
            for (step, &id) in states.iter().enumerate() {
                writeln!(w, "  {:>3}. {} ({})", step + 1, graph.name(id), id)?;
            }
        }
        OutputFormat::Dot => return Err(unsupported_dot()),
    }
    Ok(())
}

/// Output recorded machine events
pub fn output_events(
    w: &mut impl std::io::Write,
    graph: &StateGraph,
    events: &[Event],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = events
                .iter()
                .map(|event| match event {
                    Event::Exited(id) => json!({ "event": "exited", "state": graph.name(*id) }),
                    Event::Entered(id) => json!({ "event": "entered", "state": graph.name(*id) }),
                    Event::Transition(t) => json!({
                        "event": "transition",
                        "from": graph.name(t.from_state),
                        "to": graph.name(t.to_state),
                        "action": t.action.label(),
                    }),
                })
                .collect::<Vec<_>>();
            serde_json::to_writer_pretty(&mut *w, &output)?;
            writeln!(w)?;
        }
        OutputFormat::Table => {
            writeln!(w, "{:<12} {:<66}", "Event", "Detail")?;
            writeln!(w, "{:-<80}", "")?;
            for event in events {
                let (kind, detail) = match event {
                    Event::Exited(id) => ("exited", graph.name(*id).to_string()),
                    Event::Entered(id) => ("entered", graph.name(*id).to_string()),
                    Event::Transition(t) => (
                        "transition",
                        format!(
                            "{} -> {} [{}]",
                            graph.name(t.from_state),
                            graph.name(t.to_state),
                            t.display_label()
                        ),
                    ),
                };
                writeln!(w, "{:<12} {:<66}", kind, detail)?;
            }
        }
        OutputFormat::Dot => return Err(unsupported_dot()),
    }
    Ok(())
}

fn names(graph: &StateGraph, states: &[StateId]) -> Vec<String> {
    states.iter().map(|&id| graph.name(id).to_string()).collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

fn unsupported_dot() -> Error {
    Error::custom("DOT output is only available for the inspect command")
}
