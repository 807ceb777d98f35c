// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `ffibench analyze` command - Report and charts from the results file.

use anyhow::Context;
use ffibench_benchmark::{plots, Analysis, JsonReporter};
use ffibench_core::Config;

pub fn execute(config: &Config) -> anyhow::Result<()> {
    let reporter = JsonReporter::new(&config.output.results_file);
    let report = reporter
        .load_results()
        .context("No usable results file; run `ffibench run` first")?;

    tracing::info!(
        run_id = %report.run_id,
        cases = report.results.len(),
        "Analyzing results"
    );

    let analysis = Analysis::from_report(&report)?;
    analysis.write_markdown(&report, &config.output.report_file)?;
    let charts = plots::render_all(&analysis, &config.output.plots_dir)?;

    println!("{}", render_summary(&analysis));
    println!("✓ Report written to {}", config.output.report_file.display());
    for chart in &charts {
        println!("✓ Chart written to {}", chart.display());
    }

    Ok(())
}

/// Console summary: speedups are dynamic mean over linked mean.
fn render_summary(analysis: &Analysis) -> String {
    let overall = &analysis.overall;
    let mut out = String::new();

    out.push_str("Speedup of the linked binding (dynamic time / linked time)\n\n");
    out.push_str(&format!(
        "  Overall:  mean {:.2}x, median {:.2}x over {} cases\n",
        overall.mean, overall.median, overall.count
    ));
    out.push_str(&format!(
        "  Best:     {:.2}x ({})\n",
        overall.best.speedup, overall.best.name
    ));
    out.push_str(&format!(
        "  Worst:    {:.2}x ({})\n\n",
        overall.worst.speedup, overall.worst.name
    ));

    out.push_str("By category:\n");
    for stats in analysis.ranked_categories() {
        out.push_str(&format!(
            "  {:<22} {:>6.2}x  (median {:.2}x, n={})\n",
            stats.category.title(),
            stats.mean,
            stats.median,
            stats.count
        ));
    }

    let excels = analysis.excels();
    if !excels.is_empty() {
        out.push_str("\nLinked binding clearly ahead: ");
        out.push_str(&join_titles(excels.iter().map(|s| s.category.title())));
        out.push('\n');
    }

    let similar = analysis.similar();
    if !similar.is_empty() {
        out.push_str("\nComparable performance: ");
        out.push_str(&join_titles(similar.iter().map(|s| s.category.title())));
        out.push('\n');
    }

    out
}

fn join_titles<'a>(titles: impl Iterator<Item = &'a str>) -> String {
    titles.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffibench_benchmark::{BenchmarkReport, CaseResult, RunMetadata, Speedup, TimingStats};
    use ffibench_core::Category;
    use std::collections::BTreeMap;

    fn case(name: &str, category: Category, linked_ns: u64, dynamic_ns: u64) -> CaseResult {
        let linked = TimingStats::from_samples(vec![linked_ns; 4], false);
        let dynamic = TimingStats::from_samples(vec![dynamic_ns; 4], false);
        CaseResult {
            name: name.to_string(),
            category,
            params: BTreeMap::new(),
            iterations: 4,
            warmup: 0,
            input_crc32: 0,
            speedup: Speedup::between(&linked, &dynamic),
            linked,
            dynamic,
        }
    }

    #[test]
    fn test_summary_lists_extremes_and_groups() {
        let mut report = BenchmarkReport::new(RunMetadata::default());
        report.add_result(case("noop", Category::CallOverhead, 100, 300));
        report.add_result(case("sum_array_1000", Category::Memory, 1000, 1000));

        let analysis = Analysis::from_report(&report).unwrap();
        let summary = render_summary(&analysis);

        assert!(summary.contains("Best:     3.00x (noop)"));
        assert!(summary.contains("Worst:    1.00x (sum_array_1000)"));
        assert!(summary.contains("Linked binding clearly ahead: Function Call Overhead"));
        assert!(summary.contains("Comparable performance: Memory-Intensive"));
    }

    #[test]
    fn test_missing_results_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.output.results_file = dir.path().join("absent.json");

        let err = execute(&config).unwrap_err();
        assert!(err.to_string().contains("ffibench run"));
    }
}
