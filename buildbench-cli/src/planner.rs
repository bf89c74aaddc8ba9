//! Scenario Planner
//!
//! Selects which scenarios run. Unlike a benchmark registry there is no
//! re-sorting: scenarios keep their declaration order, which is the order
//! results are reported in.

use buildbench_core::Scenario;
use regex::Regex;

/// Execution plan for scenarios
pub struct ExecutionPlan {
    /// Ordered list of scenarios to run
    pub scenarios: Vec<Scenario>,
}

/// Build execution plan, keeping scenarios whose label matches `filter`
pub fn build_plan(
    scenarios: impl IntoIterator<Item = Scenario>,
    filter: Option<&Regex>,
) -> ExecutionPlan {
    let scenarios = scenarios
        .into_iter()
        .filter(|s| filter.is_none_or(|re| re.is_match(s.label())))
        .collect();

    ExecutionPlan { scenarios }
}

impl ExecutionPlan {
    /// Render the plan for `--dry-run`
    pub fn describe(&self) -> String {
        let mut output = String::from("BuildBench Plan:\n");
        for scenario in &self.scenarios {
            output.push_str(&format!("├── {}\n", scenario.label()));
            output.push_str(&format!("│   ├── cwd: {}\n", scenario.working_dir().display()));
            output.push_str(&format!("│   ├── command: {}\n", scenario.command_line()));
            for step in scenario.reset() {
                output.push_str(&format!("│   ├── reset: {}\n", step.describe()));
            }
            for step in scenario.warmup() {
                output.push_str(&format!("│   ├── warmup: {}\n", step.describe()));
            }
        }
        output.push_str(&format!("{} scenarios found.\n", self.scenarios.len()));
        output
    }
}
