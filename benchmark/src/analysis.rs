// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Derived statistics and the Markdown report.
//!
//! Everything here is computed from a loaded [`BenchmarkReport`]; nothing is
//! measured. Speedups are oriented as dynamic mean / linked mean, so values
//! above 1 mean the linked binding was faster.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use ffibench_core::Category;
use thiserror::Error;

use crate::metrics::BenchmarkReport;

/// Categories whose mean speedup exceeds this favour the linked binding.
pub const EXCELS_THRESHOLD: f64 = 1.5;
/// Categories whose mean speedup falls in this band perform alike.
pub const SIMILAR_BAND: (f64, f64) = (0.8, 1.2);

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("report contains no results")]
    EmptyReport,

    #[error("no case has a speedup (every mean was zero)")]
    NoSpeedups,

    #[error("failed to draw {chart}: {message}")]
    Chart { chart: &'static str, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One case in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub name: String,
    pub category: Category,
    pub linked_mean_ms: f64,
    pub linked_std_ms: f64,
    pub dynamic_mean_ms: f64,
    pub dynamic_std_ms: f64,
    /// Dynamic mean / linked mean
    pub speedup: Option<f64>,
}

/// A speedup together with the case it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Extreme {
    pub name: String,
    pub speedup: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverallStats {
    pub mean: f64,
    pub median: f64,
    pub best: Extreme,
    pub worst: Extreme,
    /// Cases with a speedup
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: Category,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation, 0 for a single case
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Summary rows and aggregate speedup statistics for one report.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub rows: Vec<SummaryRow>,
    pub overall: OverallStats,
    /// Per-category statistics in canonical category order
    pub categories: Vec<CategoryStats>,
}

impl Analysis {
    pub fn from_report(report: &BenchmarkReport) -> Result<Self, AnalysisError> {
        if report.results.is_empty() {
            return Err(AnalysisError::EmptyReport);
        }

        let rows: Vec<SummaryRow> = report
            .results
            .iter()
            .map(|r| SummaryRow {
                name: r.name.clone(),
                category: r.category,
                linked_mean_ms: r.linked.mean_ms(),
                linked_std_ms: r.linked.std_dev_ms(),
                dynamic_mean_ms: r.dynamic.mean_ms(),
                dynamic_std_ms: r.dynamic.std_dev_ms(),
                speedup: r.speedup.map(|s| s.dynamic_over_linked),
            })
            .collect();

        let with_speedup: Vec<(&str, f64)> = rows
            .iter()
            .filter_map(|r| r.speedup.map(|s| (r.name.as_str(), s)))
            .collect();
        if with_speedup.is_empty() {
            return Err(AnalysisError::NoSpeedups);
        }

        let values: Vec<f64> = with_speedup.iter().map(|(_, s)| *s).collect();
        // First occurrence wins on ties.
        let best = with_speedup
            .iter()
            .fold(with_speedup[0], |acc, &x| if x.1 > acc.1 { x } else { acc });
        let worst = with_speedup
            .iter()
            .fold(with_speedup[0], |acc, &x| if x.1 < acc.1 { x } else { acc });

        let overall = OverallStats {
            mean: mean(&values),
            median: median(&values),
            best: Extreme {
                name: best.0.to_string(),
                speedup: best.1,
            },
            worst: Extreme {
                name: worst.0.to_string(),
                speedup: worst.1,
            },
            count: values.len(),
        };

        let categories = Category::ALL
            .into_iter()
            .filter_map(|category| {
                let values: Vec<f64> = rows
                    .iter()
                    .filter(|r| r.category == category)
                    .filter_map(|r| r.speedup)
                    .collect();
                if values.is_empty() {
                    return None;
                }
                Some(CategoryStats {
                    category,
                    mean: mean(&values),
                    median: median(&values),
                    std_dev: sample_std_dev(&values),
                    min: values.iter().copied().fold(f64::INFINITY, f64::min),
                    max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    count: values.len(),
                })
            })
            .collect();

        Ok(Self {
            rows,
            overall,
            categories,
        })
    }

    /// Categories where the linked binding wins clearly.
    pub fn excels(&self) -> Vec<&CategoryStats> {
        self.categories
            .iter()
            .filter(|c| c.mean > EXCELS_THRESHOLD)
            .collect()
    }

    /// Categories where both bindings perform alike.
    pub fn similar(&self) -> Vec<&CategoryStats> {
        self.categories
            .iter()
            .filter(|c| c.mean >= SIMILAR_BAND.0 && c.mean <= SIMILAR_BAND.1)
            .collect()
    }

    /// Categories sorted by mean speedup, highest first.
    pub fn ranked_categories(&self) -> Vec<&CategoryStats> {
        let mut ranked: Vec<_> = self.categories.iter().collect();
        ranked.sort_by(|a, b| b.mean.total_cmp(&a.mean));
        ranked
    }

    /// Render the full Markdown report.
    pub fn render_markdown(&self, report: &BenchmarkReport) -> String {
        let mut out = String::new();
        let meta = &report.metadata;
        let sys = &report.system_info;

        let _ = writeln!(out, "# Linked vs Dynamic FFI Binding Benchmark Report\n");

        let _ = writeln!(out, "## Test Configuration\n");
        let _ = writeln!(out, "- Run ID: {}", report.run_id);
        let _ = writeln!(out, "- Timestamp: {}", report.timestamp.to_rfc3339());
        let _ = writeln!(out, "- Suite Version: {}", report.version);
        let _ = writeln!(out, "- Iterations: {}", meta.iterations);
        let _ = writeln!(out, "- Warmup: {}", meta.warmup);
        let _ = writeln!(out, "- Seed: {}", meta.seed);
        if let Some(cpu) = meta.pinned_cpu {
            let _ = writeln!(out, "- Pinned CPU: {}", cpu);
        }
        if let Some(path) = &meta.library_path {
            let _ = writeln!(out, "- Shared Library: `{}`", path);
        }
        let _ = writeln!(
            out,
            "- Host: {} {} ({}, {} logical CPUs, {:.1} GiB)\n",
            sys.os,
            sys.os_version,
            sys.cpu_model,
            sys.cpu_cores,
            sys.memory_bytes as f64 / (1u64 << 30) as f64
        );

        let o = &self.overall;
        let _ = writeln!(out, "## Overall Statistics\n");
        let _ = writeln!(out, "Speedup is dynamic mean time / linked mean time.\n");
        let _ = writeln!(out, "- Mean Speedup: {:.2}x", o.mean);
        let _ = writeln!(out, "- Median Speedup: {:.2}x", o.median);
        let _ = writeln!(out, "- Best Speedup: {:.2}x ({})", o.best.speedup, o.best.name);
        let _ = writeln!(out, "- Worst Speedup: {:.2}x ({})\n", o.worst.speedup, o.worst.name);

        let _ = writeln!(out, "## Performance by Category\n");
        let _ = writeln!(out, "| Category | Mean | Median | Std Dev | Min | Max | Tests |");
        let _ = writeln!(out, "|----------|------|--------|---------|-----|-----|-------|");
        for c in &self.categories {
            let _ = writeln!(
                out,
                "| {} | {:.2}x | {:.2}x | {:.2} | {:.2}x | {:.2}x | {} |",
                c.category.title(),
                c.mean,
                c.median,
                c.std_dev,
                c.min,
                c.max,
                c.count
            );
        }

        let _ = writeln!(out, "\n## Detailed Results\n");
        for category in report.categories() {
            let _ = writeln!(out, "### {}\n", category.title());
            let _ = writeln!(out, "| Benchmark | Linked (ms) | Dynamic (ms) | Speedup |");
            let _ = writeln!(out, "|-----------|-------------|--------------|---------|");
            for row in self.rows.iter().filter(|r| r.category == category) {
                let speedup = row
                    .speedup
                    .map(|s| format!("{:.2}x", s))
                    .unwrap_or_else(|| "N/A".to_string());
                let _ = writeln!(
                    out,
                    "| {} | {:.4} ± {:.4} | {:.4} ± {:.4} | {} |",
                    row.name,
                    row.linked_mean_ms,
                    row.linked_std_ms,
                    row.dynamic_mean_ms,
                    row.dynamic_std_ms,
                    speedup
                );
            }
            let _ = writeln!(out);
        }

        let excels = self.excels();
        let similar = self.similar();

        let _ = writeln!(out, "## Key Findings\n");
        if !excels.is_empty() {
            let _ = writeln!(
                out,
                "### Areas Where the Linked Binding Excels (>{}x speedup)\n",
                EXCELS_THRESHOLD
            );
            for c in &excels {
                let _ = writeln!(out, "- **{}**: {:.2}x average speedup", c.category.title(), c.mean);
            }
            let _ = writeln!(out);
        }
        if !similar.is_empty() {
            let _ = writeln!(
                out,
                "### Areas With Similar Performance ({}x - {}x)\n",
                SIMILAR_BAND.0, SIMILAR_BAND.1
            );
            for c in &similar {
                let _ = writeln!(out, "- **{}**: {:.2}x average speedup", c.category.title(), c.mean);
            }
            let _ = writeln!(out);
        }
        if excels.is_empty() && similar.is_empty() {
            let _ = writeln!(out, "No category fell into either band.\n");
        }

        let _ = writeln!(out, "## Recommendations\n");
        let _ = writeln!(out, "Based on the benchmark results:\n");
        let _ = writeln!(out, "1. **Use the linked binding for**: {}", titles(&excels));
        let _ = writeln!(out, "2. **Either binding acceptable for**: {}", titles(&similar));
        let _ = writeln!(
            out,
            "3. **Consider deployment**: the linked binding fixes the library at build time, \
             the dynamic binding can swap the shared object without rebuilding"
        );

        out
    }

    /// Render and write the Markdown report.
    pub fn write_markdown(
        &self,
        report: &BenchmarkReport,
        path: impl AsRef<Path>,
    ) -> Result<(), AnalysisError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| AnalysisError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, self.render_markdown(report)).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Report written");
        Ok(())
    }
}

fn titles(cats: &[&CategoryStats]) -> String {
    if cats.is_empty() {
        return "N/A".to_string();
    }
    cats.iter()
        .map(|c| c.category.title())
        .collect::<Vec<_>>()
        .join(", ")
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{CaseResult, RunMetadata, Speedup, TimingStats};
    use std::collections::BTreeMap;

    fn result(name: &str, category: Category, linked_ns: u64, dynamic_ns: u64) -> CaseResult {
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

    fn report() -> BenchmarkReport {
        let mut report = BenchmarkReport::new(RunMetadata {
            iterations: 4,
            ..RunMetadata::default()
        });
        report.add_result(result("noop(42)", Category::CallOverhead, 100, 400));
        report.add_result(result("add_numbers(100, 200)", Category::CallOverhead, 100, 200));
        report.add_result(result("sum_array(size=1000)", Category::Memory, 1000, 1000));
        report.add_result(result("checksum(100000)", Category::BufferProcessing, 2000, 1000));
        report
    }

    #[test]
    fn test_overall_statistics() {
        let analysis = Analysis::from_report(&report()).unwrap();
        let o = &analysis.overall;

        assert_eq!(o.count, 4);
        assert!((o.mean - (4.0 + 2.0 + 1.0 + 0.5) / 4.0).abs() < 1e-12);
        assert!((o.median - 1.5).abs() < 1e-12);
        assert_eq!(o.best.name, "noop(42)");
        assert_eq!(o.worst.name, "checksum(100000)");
        assert!((o.worst.speedup - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_category_statistics() {
        let analysis = Analysis::from_report(&report()).unwrap();
        let cats: Vec<_> = analysis.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            cats,
            [Category::CallOverhead, Category::Memory, Category::BufferProcessing]
        );

        let call = &analysis.categories[0];
        assert_eq!(call.count, 2);
        assert!((call.mean - 3.0).abs() < 1e-12);
        assert!((call.std_dev - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(analysis.categories[1].std_dev, 0.0);

        let excels: Vec<_> = analysis.excels().iter().map(|c| c.category).collect();
        assert_eq!(excels, [Category::CallOverhead]);
        let similar: Vec<_> = analysis.similar().iter().map(|c| c.category).collect();
        assert_eq!(similar, [Category::Memory]);

        let ranked: Vec<_> = analysis.ranked_categories().iter().map(|c| c.category).collect();
        assert_eq!(
            ranked,
            [Category::CallOverhead, Category::Memory, Category::BufferProcessing]
        );
    }

    #[test]
    fn test_markdown_sections() {
        let report = report();
        let analysis = Analysis::from_report(&report).unwrap();
        let md = analysis.render_markdown(&report);

        for heading in [
            "## Test Configuration",
            "## Overall Statistics",
            "## Performance by Category",
            "## Detailed Results",
            "### Function Call Overhead",
            "## Key Findings",
            "## Recommendations",
        ] {
            assert!(md.contains(heading), "missing {}", heading);
        }
        assert!(md.contains("- Iterations: 4"));
        assert!(md.contains("| noop(42) |"));
        assert!(md.contains("- **Function Call Overhead**: 3.00x average speedup"));
    }

    #[test]
    fn test_empty_report() {
        let report = BenchmarkReport::new(RunMetadata::default());
        assert!(matches!(
            Analysis::from_report(&report),
            Err(AnalysisError::EmptyReport)
        ));
    }

    #[test]
    fn test_zero_means_have_no_speedup() {
        let mut report = BenchmarkReport::new(RunMetadata::default());
        report.add_result(result("noop(0)", Category::CallOverhead, 0, 0));
        assert!(matches!(
            Analysis::from_report(&report),
            Err(AnalysisError::NoSpeedups)
        ));
    }

    #[test]
    fn test_write_markdown() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out/report.md");
        let report = report();
        Analysis::from_report(&report)
            .unwrap()
            .write_markdown(&report, &path)
            .unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("# Linked vs Dynamic"));
    }
}
