//! Observation driver
//!
//! Something outside the machine (a screen classifier, a log tail, a replayed
//! trace) reports which state it believes the UI is in. The driver walks the
//! machine there, dropping reports that are not confident enough.

use crate::state_machine::{Machine, StateGraph, StateId};
use crate::{Error, Result};
use std::io::Read;

/// A state reported by an external observer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub state: StateId,
    pub confidence: f32,
}

impl Observation {
    pub fn certain(state: StateId) -> Self {
        Self {
            state,
            confidence: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Driver {
    min_confidence: f32,
}

impl Driver {
    pub fn new(min_confidence: f32) -> Self {
        Self { min_confidence }
    }

    /// Walk `machine` to the observed state.
    ///
    /// Returns the states entered on the way. Observations below the confidence
    /// threshold are ignored and yield an empty walk.
    pub fn observe(&self, machine: &mut Machine, observation: Observation) -> Result<Vec<StateId>> {
        if observation.confidence < self.min_confidence {
            tracing::warn!(
                "Ignoring observation of state {} with confidence {:.2} (< {:.2})",
                observation.state,
                observation.confidence,
                self.min_confidence
            );
            return Ok(Vec::new());
        }

        machine.walk_to(observation.state)
    }
}

/// Parse a trace of `name[,confidence]` rows. A missing confidence means 1.0.
pub fn parse_trace(source: impl Read, graph: &StateGraph) -> Result<Vec<Observation>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut observations = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let name = record.get(0).unwrap_or_default();
        let state = graph.find_state(name).ok_or_else(|| {
            Error::malformed(format!("trace row {}: unknown state '{}'", row + 1, name))
        })?;

        let confidence = match record.get(1) {
            None | Some("") => 1.0,
            Some(field) => field.parse::<f32>().map_err(|e| {
                Error::malformed(format!(
                    "trace row {}: invalid confidence '{}': {}",
                    row + 1,
                    field,
                    e
                ))
            })?,
        };
        if !confidence.is_finite() {
            return Err(Error::malformed(format!(
                "trace row {}: confidence must be a finite number, got {}",
                row + 1,
                confidence
            )));
        }

        observations.push(Observation { state, confidence });
    }

    Ok(observations)
}
