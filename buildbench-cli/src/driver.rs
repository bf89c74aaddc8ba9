//! Harness Driver
//!
//! Runs every planned scenario, one at a time, in declaration order. The first
//! failure ends the run; results of scenarios that already finished are
//! dropped along with it.

use buildbench_core::{BenchResult, ProgressSink, RunError, Scenario, ScenarioRunner};
use tracing::info;

/// A planned, ready-to-run benchmark session
pub struct Harness<'a> {
    scenarios: Vec<Scenario>,
    repeats: usize,
    runner: ScenarioRunner<'a>,
}

impl<'a> Harness<'a> {
    /// Harness measuring each of `scenarios` `repeats` times
    pub fn new(scenarios: Vec<Scenario>, repeats: usize, runner: ScenarioRunner<'a>) -> Self {
        Self {
            scenarios,
            repeats,
            runner,
        }
    }

    /// Run all scenarios sequentially
    pub fn run(&self, sink: &mut dyn ProgressSink) -> Result<Vec<BenchResult>, RunError> {
        if self.repeats == 0 {
            return Err(RunError::InvalidRepeats);
        }

        let mut results = Vec::with_capacity(self.scenarios.len());
        for (index, scenario) in self.scenarios.iter().enumerate() {
            info!(
                scenario = scenario.label(),
                position = index + 1,
                total = self.scenarios.len(),
                "running scenario"
            );
            results.push(self.runner.run_scenario(scenario, self.repeats, sink)?);
        }
        Ok(results)
    }
}
