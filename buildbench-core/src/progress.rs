//! Progress Reporting
//!
//! Sinks receive events in execution order: scenario start, one event per
//! measured repeat in ascending order, scenario finish.

use crate::result::BenchResult;
use crate::scenario::Scenario;

/// Receives progress from the scenario runner
pub trait ProgressSink {
    /// A scenario is about to run its first repeat
    fn scenario_started(&mut self, _scenario: &Scenario, _repeats: usize) {}

    /// Repeat `repeat` (1-based) of `repeats` was measured at `seconds`
    fn sample_recorded(&mut self, repeat: usize, repeats: usize, seconds: f64);

    /// All repeats of a scenario finished and were summarized
    fn scenario_finished(&mut self, _result: &BenchResult) {}
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn sample_recorded(&mut self, _repeat: usize, _repeats: usize, _seconds: f64) {}
}

/// Event captured by `RecordingSink`
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Scenario start
    Started {
        /// Scenario label
        label: String,
        /// Planned repeats
        repeats: usize,
    },
    /// One measured repeat
    Sample {
        /// 1-based repeat index
        repeat: usize,
        /// Planned repeats
        repeats: usize,
        /// Measured duration
        seconds: f64,
    },
    /// Scenario finish
    Finished {
        /// Scenario label
        label: String,
        /// Number of summarized samples
        samples: usize,
    },
}

/// Sink that keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Events in the order they were received
    pub events: Vec<ProgressEvent>,
}

impl RecordingSink {
    /// Repeat indices of all recorded samples, in order
    pub fn sample_indices(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Sample { repeat, .. } => Some(*repeat),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn scenario_started(&mut self, scenario: &Scenario, repeats: usize) {
        self.events.push(ProgressEvent::Started {
            label: scenario.label().to_string(),
            repeats,
        });
    }

    fn sample_recorded(&mut self, repeat: usize, repeats: usize, seconds: f64) {
        self.events.push(ProgressEvent::Sample {
            repeat,
            repeats,
            seconds,
        });
    }

    fn scenario_finished(&mut self, result: &BenchResult) {
        self.events.push(ProgressEvent::Finished {
            label: result.label.clone(),
            samples: result.stats.sample_count,
        });
    }
}
