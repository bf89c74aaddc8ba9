//! Human-readable Output
//!
//! Line formats for console progress and the final summary. Consumers may
//! scrape these lines, so scenario order and repeat order are preserved.

use crate::report::Report;
use buildbench_core::BenchResult;

/// Section header line
pub fn format_header(title: &str) -> String {
    format!("=== {} ===", title)
}

/// Progress line for one measured repeat
pub fn format_sample_line(repeat: usize, repeats: usize, seconds: f64) -> String {
    format!("  run {:>2}/{}: {:.3}s", repeat, repeats, seconds)
}

/// One-line summary printed after a scenario's last repeat
pub fn format_scenario_summary(result: &BenchResult) -> String {
    let s = &result.stats;
    format!(
        "  => mean {:.3}s ± {:.3}s (stddev), 95% CI ± {:.3}s, range [{:.3}, {:.3}]",
        s.mean, s.std_dev, s.ci95, s.min, s.max
    )
}

/// Final comparative summary, one entry per scenario in declaration order
pub fn format_human_summary(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str(&format_header("Summary (mean ± 95% CI)"));
    output.push('\n');

    for result in &report.results {
        output.push_str(&format!("- {}\n", result.label));
        output.push_str(&format!(
            "  mean: {:.3}s, 95% CI: ±{:.3}s, n={}\n",
            result.stats.mean, result.stats.ci95, result.stats.sample_count
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "{} scenario(s), {} repeat(s) each, {:.1}s total\n",
        report.results.len(),
        report.meta.repeats,
        report.meta.total_duration_ms / 1000.0
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_report;
    use buildbench_stats::compute_summary;

    fn result(label: &str, samples: &[f64]) -> BenchResult {
        BenchResult {
            label: label.to_string(),
            command: vec!["true".to_string()],
            stats: compute_summary(samples).unwrap(),
        }
    }

    #[test]
    fn test_sample_line() {
        assert_eq!(format_sample_line(3, 5, 1.23456), "  run  3/5: 1.235s");
        assert_eq!(format_sample_line(10, 10, 0.5), "  run 10/10: 0.500s");
    }

    #[test]
    fn test_scenario_summary_line() {
        let line = format_scenario_summary(&result("x", &[1.0, 3.0]));
        assert!(line.starts_with("  => mean 2.000s ± 1.414s (stddev)"));
        assert!(line.ends_with("range [1.000, 3.000]"));
    }

    #[test]
    fn test_summary_in_declaration_order() {
        let report = build_report(
            vec![result("Pants: cold", &[2.0, 2.0]), result("Grog: image", &[1.0])],
            2,
            4000.0,
        );
        let output = format_human_summary(&report);

        let pants = output.find("- Pants: cold").unwrap();
        let grog = output.find("- Grog: image").unwrap();
        assert!(pants < grog);
        assert!(output.contains("mean: 2.000s, 95% CI: ±0.000s, n=2"));
        assert!(output.contains("mean: 1.000s, 95% CI: ±0.000s, n=1"));
        assert!(output.contains("2 scenario(s), 2 repeat(s) each, 4.0s total"));
    }
}
