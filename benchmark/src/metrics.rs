// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Result types for a benchmark sweep.
//!
//! Per-binding timing statistics, the derived speedup, and the report that
//! is written once at the end of a sweep.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ffibench_core::{BindingKind, Category};
use serde::{Deserialize, Serialize};
use sysinfo::System;
use uuid::Uuid;

/// Sample sets larger than this are down-sampled when kept.
const RAW_SAMPLE_LIMIT: usize = 10_000;
/// Target size of a down-sampled sample set.
const RAW_SAMPLE_TARGET: usize = 1_000;

/// Descriptive statistics over one binding's timed calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    /// Number of timed calls
    pub count: usize,
    /// Arithmetic mean in nanoseconds
    pub mean_ns: f64,
    /// Median in nanoseconds
    pub median_ns: f64,
    /// Population standard deviation in nanoseconds
    pub std_dev_ns: f64,
    /// Minimum observed duration in nanoseconds
    pub min_ns: u64,
    /// Maximum observed duration in nanoseconds
    pub max_ns: u64,
    /// Calls per second implied by the mean
    pub throughput_per_sec: f64,
    /// Raw samples in call order (optional, may be down-sampled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<u64>>,
}

impl TimingStats {
    /// Calculate statistics from samples in nanoseconds.
    ///
    /// An empty sample set yields all-zero statistics.
    pub fn from_samples(samples: Vec<u64>, keep_raw: bool) -> Self {
        if samples.is_empty() {
            return Self {
                count: 0,
                mean_ns: 0.0,
                median_ns: 0.0,
                std_dev_ns: 0.0,
                min_ns: 0,
                max_ns: 0,
                throughput_per_sec: 0.0,
                samples: None,
            };
        }

        let len = samples.len();
        let mut sorted = samples.clone();
        sorted.sort_unstable();

        let min_ns = sorted[0];
        let max_ns = sorted[len - 1];
        let median_ns = if len % 2 == 1 {
            sorted[len / 2] as f64
        } else {
            (sorted[len / 2 - 1] as f64 + sorted[len / 2] as f64) / 2.0
        };

        let sum: u128 = sorted.iter().map(|&x| x as u128).sum();
        // Rounding can push the quotient a hair outside the observed range.
        let mean_ns = (sum as f64 / len as f64).clamp(min_ns as f64, max_ns as f64);

        let variance = sorted
            .iter()
            .map(|&x| {
                let diff = x as f64 - mean_ns;
                diff * diff
            })
            .sum::<f64>()
            / len as f64;

        let raw_samples = keep_raw.then(|| {
            if len > RAW_SAMPLE_LIMIT {
                samples
                    .iter()
                    .step_by(len / RAW_SAMPLE_TARGET)
                    .copied()
                    .collect()
            } else {
                samples
            }
        });

        Self {
            count: len,
            mean_ns,
            median_ns,
            std_dev_ns: variance.sqrt(),
            min_ns,
            max_ns,
            throughput_per_sec: throughput(mean_ns),
            samples: raw_samples,
        }
    }

    pub fn mean_ms(&self) -> f64 {
        self.mean_ns / 1_000_000.0
    }

    pub fn std_dev_ms(&self) -> f64 {
        self.std_dev_ns / 1_000_000.0
    }
}

fn throughput(mean_ns: f64) -> f64 {
    if mean_ns > 0.0 {
        1_000_000_000.0 / mean_ns
    } else {
        0.0
    }
}

/// Format a duration in nanoseconds (auto-selects ns/μs/ms/s).
pub fn format_latency(ns: f64) -> String {
    if ns < 1_000.0 {
        format!("{:.0}ns", ns)
    } else if ns < 1_000_000.0 {
        format!("{:.2}μs", ns / 1_000.0)
    } else if ns < 1_000_000_000.0 {
        format!("{:.2}ms", ns / 1_000_000.0)
    } else {
        format!("{:.2}s", ns / 1_000_000_000.0)
    }
}

/// Relative speed of the two bindings on one case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speedup {
    /// Slower mean divided by faster mean, always `>= 1`
    pub ratio: f64,
    /// Binding with the lower mean (linked on a tie)
    pub faster: BindingKind,
    /// Dynamic mean divided by linked mean
    pub dynamic_over_linked: f64,
}

impl Speedup {
    /// Compare two mean durations. `None` unless both are strictly positive.
    pub fn from_means(linked_ns: f64, dynamic_ns: f64) -> Option<Self> {
        if !(linked_ns > 0.0 && dynamic_ns > 0.0) {
            return None;
        }

        let (faster, ratio) = if dynamic_ns < linked_ns {
            (BindingKind::Dynamic, linked_ns / dynamic_ns)
        } else {
            (BindingKind::Linked, dynamic_ns / linked_ns)
        };

        Some(Self {
            ratio,
            faster,
            dynamic_over_linked: dynamic_ns / linked_ns,
        })
    }

    pub fn between(linked: &TimingStats, dynamic: &TimingStats) -> Option<Self> {
        Self::from_means(linked.mean_ns, dynamic.mean_ns)
    }
}

/// Statistics and speedup for a single case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name, e.g. `sum_array(size=1000)`
    pub name: String,
    pub category: Category,
    /// Case parameters as recorded by the registry
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, serde_json::Value>,
    pub iterations: u64,
    pub warmup: u64,
    /// CRC32 of the generated input, so two runs can be checked for equal work
    pub input_crc32: u32,
    pub linked: TimingStats,
    pub dynamic: TimingStats,
    #[serde(default)]
    pub speedup: Option<Speedup>,
}

impl CaseResult {
    pub fn stats(&self, kind: BindingKind) -> &TimingStats {
        match kind {
            BindingKind::Linked => &self.linked,
            BindingKind::Dynamic => &self.dynamic,
        }
    }
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name
    pub os: String,
    /// OS version
    pub os_version: String,
    /// Kernel version (Linux)
    pub kernel_version: Option<String>,
    /// CPU model name
    pub cpu_model: String,
    /// Number of logical CPUs
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// How the sweep was configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub iterations: u64,
    pub warmup: u64,
    /// Seed for generated inputs
    pub seed: u64,
    #[serde(default)]
    pub pinned_cpu: Option<usize>,
    /// Shared object the dynamic binding was loaded from
    #[serde(default)]
    pub library_path: Option<String>,
    /// Categories the sweep was restricted to, empty for all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
}

/// Complete result of one sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Suite identifier
    pub benchmark_suite: String,
    /// Framework version
    pub version: String,
    pub run_id: Uuid,
    /// Timestamp when the sweep started
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    pub metadata: RunMetadata,
    pub results: Vec<CaseResult>,
}

impl BenchmarkReport {
    /// Create an empty report for a new sweep.
    pub fn new(metadata: RunMetadata) -> Self {
        Self {
            benchmark_suite: "ffibench".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            metadata,
            results: Vec::new(),
        }
    }

    /// Add a result to the report.
    pub fn add_result(&mut self, result: CaseResult) {
        self.results.push(result);
    }

    /// Categories that have at least one result, in canonical order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.results.iter().any(|r| r.category == *c))
            .collect()
    }

    /// Results of one category, in sweep order.
    pub fn results_in(&self, category: Category) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(move |r| r.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_stats_from_samples() {
        let samples = vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];
        let stats = TimingStats::from_samples(samples, false);

        assert_eq!(stats.count, 10);
        assert_eq!(stats.min_ns, 100);
        assert_eq!(stats.max_ns, 1000);
        assert_eq!(stats.median_ns, 550.0);
        assert!((stats.mean_ns - 550.0).abs() < 0.01);
        assert!((stats.std_dev_ns - 287.228).abs() < 0.01);
        assert!((stats.throughput_per_sec - 1_818_181.8).abs() < 1.0);
        assert!(stats.samples.is_none());
    }

    #[test]
    fn test_odd_median_and_order_independence() {
        let stats = TimingStats::from_samples(vec![9, 1, 5], true);
        assert_eq!(stats.median_ns, 5.0);
        assert_eq!(stats.samples, Some(vec![9, 1, 5]));
    }

    #[test]
    fn test_bounds_hold() {
        let sets: [&[u64]; 4] = [&[7], &[3, 3, 3, 3], &[0, 0, 1], &[u64::MAX / 4, 1, 2, 3, 4]];
        for set in sets {
            let s = TimingStats::from_samples(set.to_vec(), false);
            assert!(s.min_ns as f64 <= s.median_ns && s.median_ns <= s.max_ns as f64);
            assert!(s.min_ns as f64 <= s.mean_ns && s.mean_ns <= s.max_ns as f64);
        }
    }

    #[test]
    fn test_empty_samples() {
        let stats = TimingStats::from_samples(Vec::new(), true);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.throughput_per_sec, 0.0);
        assert!(stats.samples.is_none());
    }

    #[test]
    fn test_zero_mean_has_zero_throughput() {
        let stats = TimingStats::from_samples(vec![0, 0, 0], false);
        assert_eq!(stats.mean_ns, 0.0);
        assert_eq!(stats.throughput_per_sec, 0.0);
    }

    #[test]
    fn test_large_sample_sets_are_downsampled() {
        let stats = TimingStats::from_samples((0..20_000).collect(), true);
        let kept = stats.samples.unwrap();
        assert_eq!(kept.len(), 1_000);
        assert_eq!(kept[1], 20);
    }

    #[test]
    fn test_speedup_orientation() {
        let s = Speedup::from_means(100.0, 250.0).unwrap();
        assert_eq!(s.faster, BindingKind::Linked);
        assert!((s.ratio - 2.5).abs() < 1e-12);
        assert!((s.dynamic_over_linked - 2.5).abs() < 1e-12);

        let r = Speedup::from_means(250.0, 100.0).unwrap();
        assert_eq!(r.faster, BindingKind::Dynamic);
        assert_eq!(r.ratio, s.ratio);
        assert!((r.dynamic_over_linked - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_speedup_requires_positive_means() {
        assert!(Speedup::from_means(0.0, 10.0).is_none());
        assert!(Speedup::from_means(10.0, 0.0).is_none());
        let tie = Speedup::from_means(10.0, 10.0).unwrap();
        assert_eq!(tie.ratio, 1.0);
        assert_eq!(tie.faster, BindingKind::Linked);
    }

    #[test]
    fn test_latency_format() {
        assert_eq!(format_latency(500.0), "500ns");
        assert_eq!(format_latency(1500.0), "1.50μs");
        assert_eq!(format_latency(1_500_000.0), "1.50ms");
        assert_eq!(format_latency(1_500_000_000.0), "1.50s");
    }

    #[test]
    fn test_system_info_collect() {
        let info = SystemInfo::collect();
        assert!(!info.os.is_empty());
        assert!(info.cpu_cores > 0);
    }

    #[test]
    fn test_report_categories_follow_canonical_order() {
        let stats = TimingStats::from_samples(vec![10, 20], false);
        let result = |name: &str, category| CaseResult {
            name: name.to_string(),
            category,
            params: BTreeMap::new(),
            iterations: 2,
            warmup: 0,
            input_crc32: 0,
            linked: stats.clone(),
            dynamic: stats.clone(),
            speedup: Speedup::between(&stats, &stats),
        };

        let mut report = BenchmarkReport::new(RunMetadata::default());
        report.add_result(result("popcount", Category::Bitwise));
        report.add_result(result("noop", Category::CallOverhead));
        report.add_result(result("add_numbers", Category::CallOverhead));

        assert_eq!(report.categories(), vec![Category::CallOverhead, Category::Bitwise]);
        assert_eq!(report.results_in(Category::CallOverhead).count(), 2);

        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("call_overhead"));
        assert!(json.contains("dynamic_over_linked"));
        let back: BenchmarkReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.run_id, report.run_id);
    }
}
