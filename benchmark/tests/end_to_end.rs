// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Sweep → results file → analysis → report and charts, on the real bindings.

use ffibench_benchmark::plots;
use ffibench_benchmark::{
    Analysis, BenchmarkHarness, BenchmarkRunner, CaseRegistry, JsonReporter, ParityChecker,
    RunMetadata,
};
use ffibench_core::{Binding, BindingKind, Category, DynamicBinding, LinkedBinding};
use tempfile::TempDir;

fn dynamic() -> Option<DynamicBinding> {
    let binding = DynamicBinding::load_default().ok();
    if binding.is_none() {
        eprintln!("shared object unavailable on this target, skipping");
    }
    binding
}

#[test]
fn test_noop_produces_one_sample_per_iteration() {
    let linked = LinkedBinding::new();
    let samples = BenchmarkHarness::new()
        .warmup(10)
        .iterations(1000)
        .run(|| linked.noop(0));

    assert_eq!(samples.len(), 1000);
}

#[test]
fn test_bindings_agree_on_every_registered_input() {
    let Some(dynamic) = dynamic() else { return };
    let linked = LinkedBinding::new();
    let checker = ParityChecker::new(&linked, &dynamic);

    for registry in [CaseRegistry::verification(42), CaseRegistry::standard(42)] {
        let report = checker.check(&registry);
        let failures: Vec<_> = report.failures().map(|c| c.name.clone()).collect();
        assert!(failures.is_empty(), "bindings disagree on {:?}", failures);
        assert_eq!(report.passed(), registry.len());
    }
}

#[test]
fn test_quick_sweep_round_trip() {
    let Some(dynamic) = dynamic() else { return };
    let linked = LinkedBinding::new();
    let dir = TempDir::new().unwrap();

    let categories = [Category::CallOverhead, Category::Bitwise, Category::PointerChasing];
    let registry = CaseRegistry::standard(7).filter(&categories);
    let harness = BenchmarkHarness::new().warmup(1).iterations(10);
    let runner = BenchmarkRunner::new(&linked, &dynamic, harness);

    let metadata = RunMetadata {
        iterations: 10,
        warmup: 1,
        seed: 7,
        pinned_cpu: None,
        library_path: Some(dynamic.path().display().to_string()),
        categories: categories.to_vec(),
    };
    let report = runner.run(&registry, metadata).unwrap();
    assert_eq!(report.results.len(), registry.len());

    for result in &report.results {
        for kind in BindingKind::ALL {
            let stats = result.stats(kind);
            assert_eq!(stats.count, 10);
            assert!(stats.min_ns as f64 <= stats.median_ns);
            assert!(stats.median_ns <= stats.max_ns as f64);
            assert!(stats.min_ns as f64 <= stats.mean_ns && stats.mean_ns <= stats.max_ns as f64);
        }
        if let Some(speedup) = result.speedup {
            assert!(speedup.ratio >= 1.0);
        }
    }

    let results_path = dir.path().join("benchmark_results.json");
    let reporter = JsonReporter::new(&results_path);
    reporter.save(&report).unwrap();
    let loaded = reporter.load_results().unwrap();
    assert_eq!(loaded.run_id, report.run_id);
    assert_eq!(loaded.metadata, report.metadata);
    assert_eq!(loaded.categories(), categories.to_vec());

    // Sub-microsecond calls can time at zero on coarse clocks.
    let Ok(analysis) = Analysis::from_report(&loaded) else {
        return;
    };
    let report_path = dir.path().join("benchmark_report.md");
    analysis.write_markdown(&loaded, &report_path).unwrap();
    let markdown = std::fs::read_to_string(&report_path).unwrap();
    assert!(markdown.contains("### Bitwise Operations"));

    let charts = plots::render_all(&analysis, dir.path().join("plots")).unwrap();
    assert_eq!(charts.len(), 3);
    for chart in charts {
        let svg = std::fs::read_to_string(&chart).unwrap();
        assert!(svg.contains("<svg"), "{} is not an SVG", chart.display());
    }
}
