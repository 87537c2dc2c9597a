//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::state_machine::Machine;
use crate::{Config, Error, Result, cli::Cli};
use std::path::Path;

/// Load the machine named on the command line, or the configured one, starting
/// in `from` if given, otherwise in the configured initial state.
fn load_machine(
    machine_dir: Option<&Path>,
    config: &Config,
    from: Option<&str>,
) -> Result<Machine> {
    let directory = machine_dir.unwrap_or(config.machine.directory.as_path());
    let graph = crate::loader::load_graph(directory)?;

    let initial = from.or(config.machine.initial_state.as_deref());
    match initial {
        Some(name) => {
            let id = graph.find_state(name).ok_or_else(|| {
                Error::Config(format!("unknown state '{}' in {:?}", name, directory))
            })?;
            Machine::with_initial_state(graph, id)
        }
        None => Machine::new(graph),
    }
}

fn require_state(machine: &Machine, name: &str) -> Result<usize> {
    machine
        .find_state(name)
        .ok_or_else(|| Error::custom(format!("Unknown state '{}'", name)))
}

/// Inspect command implementation
pub mod inspect {
    use super::*;
    use crate::cli::{Commands, OutputFormat};
    use crate::state_machine::analyzer::analyze;

    /// Execute the inspect command
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let output_format = match args.command {
            Commands::Inspect { output } => output,
            _ => unreachable!("inspect::execute called with wrong command"),
        };

        let machine = load_machine(args.machine.as_deref(), &config, None)?;
        let graph = machine.graph();
        let report = analyze(graph, machine.current_state());

        if !report.unreachable.is_empty() {
            tracing::warn!(
                "{} state(s) cannot be reached from '{}'",
                report.unreachable.len(),
                machine.current_name()
            );
        }

        match output_format {
            OutputFormat::Json => {
                crate::cli::output::output_machine_json(&mut std::io::stdout(), graph, &report)?;
            }
            OutputFormat::Table => {
                crate::cli::output::output_machine_table(&mut std::io::stdout(), graph, &report)?;
            }
            OutputFormat::Dot => {
                print!("{}", graph.to_dot());
            }
        }

        Ok(())
    }
}

/// Path command implementation
pub mod path {
    use super::*;
    use crate::cli::Commands;

    /// Execute the path command
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let (to, from, output_format) = match args.command {
            Commands::Path { to, from, output } => (to, from, output),
            _ => unreachable!("path::execute called with wrong command"),
        };

        let machine = load_machine(args.machine.as_deref(), &config, from.as_deref())?;
        let end = require_state(&machine, &to)?;

        tracing::info!("Searching path {} -> {}", machine.current_name(), to);
        let path = machine.bfs(end, None);
        if path.is_empty() {
            tracing::warn!("'{}' is unreachable from '{}'", to, machine.current_name());
        }

        let title = format!("Path {} -> {}", machine.current_name(), to);
        crate::cli::output::output_states(
            &mut std::io::stdout(),
            machine.graph(),
            &title,
            &path,
            output_format,
        )
    }
}

/// Simulate command implementation
pub mod simulate {
    use super::*;
    use crate::cli::Commands;
    use crate::state_machine::Action;

    /// Execute the simulate command
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let (action, from, output_format) = match args.command {
            Commands::Simulate {
                action,
                from,
                output,
            } => (action, from, output),
            _ => unreachable!("simulate::execute called with wrong command"),
        };

        let machine = load_machine(args.machine.as_deref(), &config, from.as_deref())?;
        let action = action
            .as_deref()
            .map(Action::from_field)
            .unwrap_or(Action::Epsilon);

        let reachable = machine.simulate_action(&action);
        tracing::info!(
            "Action {} from '{}' may lead to {} state(s)",
            action,
            machine.current_name(),
            reachable.len()
        );

        let title = format!("Performing {} in {}", action, machine.current_name());
        crate::cli::output::output_states(
            &mut std::io::stdout(),
            machine.graph(),
            &title,
            &reachable,
            output_format,
        )
    }
}

/// Drive command implementation
pub mod drive {
    use super::*;
    use crate::cli::{Commands, OutputFormat};
    use crate::driver::{Driver, parse_trace};
    use crate::state_machine::{EventLog, TracingListener};
    use anyhow::Context;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Execute the drive command
    pub async fn execute(args: Cli, config: Config) -> Result<()> {
        let (trace, interval_ms, until, min_confidence, output_format) = match args.command {
            Commands::Drive {
                trace,
                interval_ms,
                until,
                min_confidence,
                output,
            } => (trace, interval_ms, until, min_confidence, output),
            _ => unreachable!("drive::execute called with wrong command"),
        };

        if output_format == OutputFormat::Dot {
            return Err(Error::custom(
                "DOT output is only available for the inspect command",
            ));
        }

        let mut settings = config.drive.clone();
        if let Some(interval_ms) = interval_ms {
            settings.interval_ms = interval_ms;
        }
        if let Some(min_confidence) = min_confidence {
            settings.min_confidence = min_confidence;
        }
        if let Some(until) = until {
            settings.terminal_state = until;
        }
        settings.validate()?;

        let mut machine = load_machine(args.machine.as_deref(), &config, None)?;
        let terminal = require_state(&machine, &settings.terminal_state)?;
        let interval = settings.interval();
        let driver = Driver::new(settings.min_confidence);

        let observations = read_trace(&trace, &machine)?;
        tracing::info!(
            "Replaying {} observation(s) every {:?} until '{}'",
            observations.len(),
            interval,
            machine.name(terminal)
        );

        let log = Rc::new(RefCell::new(EventLog::new()));
        machine.register_listener(TracingListener);
        machine.register_listener(log.clone());

        let mut ticker = tokio::time::interval(interval);
        for observation in observations {
            if machine.current_state() == terminal {
                break;
            }
            ticker.tick().await;

            match driver.observe(&mut machine, observation) {
                Ok(_) => {}
                Err(e) if e.is_recoverable() => tracing::warn!("{}", e),
                Err(e) => return Err(e),
            }
        }

        if machine.current_state() == terminal {
            tracing::info!("Reached terminal state '{}'", machine.current_name());
        } else {
            tracing::warn!(
                "Trace ended in '{}' before reaching '{}'",
                machine.current_name(),
                machine.name(terminal)
            );
        }

        let events = log.borrow().events.clone();
        crate::cli::output::output_events(
            &mut std::io::stdout(),
            machine.graph(),
            &events,
            output_format,
        )
    }

    fn read_trace(trace: &Path, machine: &Machine) -> Result<Vec<crate::driver::Observation>> {
        let file = std::fs::File::open(trace)
            .with_context(|| format!("Failed to open trace {:?}", trace))?;
        parse_trace(file, machine.graph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn drive_args(extra: &[&str]) -> Cli {
        let mut argv = vec!["ui-fsm", "drive", "trace.csv"];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_drive_rejects_zero_interval_override() {
        let result = drive::execute(drive_args(&["--interval-ms", "0"]), Config::default()).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_drive_rejects_out_of_range_confidence_override() {
        let result = drive::execute(drive_args(&["--min-confidence", "7.5"]), Config::default()).await;
        assert!(matches!(result, Err(Error::Config(_))));

        let result = drive::execute(drive_args(&["--min-confidence=-0.1"]), Config::default()).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_require_state() {
        let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/menu");
        let machine = load_machine(Some(&directory), &Config::default(), Some("menu")).unwrap();
        assert_eq!(machine.current_name(), "menu");
        assert_eq!(require_state(&machine, "bag").unwrap(), machine.find_state("bag").unwrap());
        assert!(require_state(&machine, "battle").is_err());
    }
}
