//! Console Progress Sink
//!
//! Prints scenario headers, one line per measured repeat and a per-scenario
//! summary, with an `indicatif` bar counting finished scenarios. Lines go
//! through `ProgressBar::suspend` so they are never interleaved with the bar
//! and are still printed when the bar is hidden (non-terminal output).
//! Headers are blue and `[Running]` yellow when writing to a terminal.

use buildbench_core::{BenchResult, ProgressSink, Scenario};
use buildbench_report::{format_header, format_sample_line, format_scenario_summary};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Write};

/// Stream progress lines are written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStream {
    /// Standard output (human reports)
    Stdout,
    /// Standard error (keeps stdout clean for JSON)
    Stderr,
}

/// Progress sink writing to the terminal
pub struct ConsoleReporter {
    bar: ProgressBar,
    out: Box<dyn Write>,
    color: bool,
}

impl ConsoleReporter {
    /// Reporter for a run of `scenarios` scenarios
    pub fn new(scenarios: usize, stream: ProgressStream) -> Self {
        let bar = ProgressBar::new(scenarios as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        let (out, color): (Box<dyn Write>, bool) = match stream {
            ProgressStream::Stdout => (Box::new(io::stdout()), io::stdout().is_terminal()),
            ProgressStream::Stderr => (Box::new(io::stderr()), io::stderr().is_terminal()),
        };
        Self { bar, out, color }
    }

    /// Reporter writing plain lines to `out`, with no bar and no colours
    pub fn with_writer(out: Box<dyn Write>) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            out,
            color: false,
        }
    }

    /// Print a line above the bar
    pub fn line(&mut self, text: &str) {
        let out = &mut self.out;
        // Progress output is best effort; a closed console must not abort the run
        let _ = self.bar.suspend(|| writeln!(out, "{}", text));
    }

    /// Print a `=== title ===` header
    pub fn header(&mut self, title: &str) {
        let header = format_header(title);
        let header = if self.color {
            header.blue().to_string()
        } else {
            header
        };
        self.line(&header);
    }

    /// Remove the bar once every scenario has finished
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for ConsoleReporter {
    fn scenario_started(&mut self, scenario: &Scenario, _repeats: usize) {
        self.bar.set_message(scenario.label().to_string());
        self.line("");
        self.header(scenario.label());
        let running = if self.color {
            "[Running]".yellow().to_string()
        } else {
            "[Running]".to_string()
        };
        self.line(&format!("{} {}", running, scenario.label()));
        self.line(&format!("Command: {}", scenario.command_line()));
    }

    fn sample_recorded(&mut self, repeat: usize, repeats: usize, seconds: f64) {
        self.line(&format_sample_line(repeat, repeats, seconds));
    }

    fn scenario_finished(&mut self, result: &BenchResult) {
        self.line(&format_scenario_summary(result));
        self.bar.inc(1);
    }
}

/// In-memory writer shared between a reporter and the test inspecting it
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildbench_stats::compute_summary;

    #[test]
    fn test_scenario_lines_in_order() {
        let buffer = SharedBuffer::default();
        let mut reporter = ConsoleReporter::with_writer(Box::new(buffer.clone()));
        let scenario = Scenario::new("Grog: image", "/repo", ["grog", "build", "//cli:image"])
            .unwrap();
        let samples = [1.0, 1.5, 2.0];

        reporter.scenario_started(&scenario, 3);
        for (i, s) in samples.iter().enumerate() {
            reporter.sample_recorded(i + 1, 3, *s);
        }
        reporter.scenario_finished(&BenchResult {
            label: scenario.label().to_string(),
            command: scenario.command().to_vec(),
            stats: compute_summary(&samples).unwrap(),
        });

        let lines: Vec<String> = buffer.contents().lines().map(str::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "",
                "=== Grog: image ===",
                "[Running] Grog: image",
                "Command: grog build //cli:image",
                "  run  1/3: 1.000s",
                "  run  2/3: 1.500s",
                "  run  3/3: 2.000s",
                "  => mean 1.500s ± 0.500s (stddev), 95% CI ± 0.566s, range [1.000, 2.000]",
            ]
        );
    }

    #[test]
    fn test_plain_writer_has_no_escape_codes() {
        let buffer = SharedBuffer::default();
        let mut reporter = ConsoleReporter::with_writer(Box::new(buffer.clone()));
        reporter.header("Benchmark Complete");
        assert_eq!(buffer.contents(), "=== Benchmark Complete ===\n");
        assert!(!buffer.contents().contains('\u{1b}'));
    }
}
