#![warn(missing_docs)]
//! BuildBench Report - Rendering
//!
//! Turns per-scenario results into output:
//! - Human (terminal summary in declaration order)
//! - JSON (machine-readable, full statistics)

mod human;
mod json;
mod report;

pub use human::{format_header, format_human_summary, format_sample_line, format_scenario_summary};
pub use json::generate_json_report;
pub use report::{Report, ReportMeta, build_report};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

impl OutputFormat {
    /// Render `report` in this format
    pub fn render(self, report: &Report) -> Result<String, serde_json::Error> {
        match self {
            OutputFormat::Human => Ok(format_human_summary(report)),
            OutputFormat::Json => generate_json_report(report),
        }
    }
}
