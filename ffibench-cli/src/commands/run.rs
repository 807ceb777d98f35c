// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `ffibench run` command - Time every case on both bindings.

use anyhow::{bail, Context};
use ffibench_benchmark::metrics::format_latency;
use ffibench_benchmark::{
    BenchmarkHarness, BenchmarkReport, BenchmarkRunner, CaseRegistry, CaseResult, JsonReporter,
    RunMetadata,
};
use ffibench_core::{Category, Config, DynamicBinding, LinkedBinding};

use crate::cpu_affinity::CpuPinner;

const QUICK_ITERATIONS: u64 = 10;
const QUICK_WARMUP: u64 = 1;

pub fn execute(config: &Config, quick: bool, categories: &[Category]) -> anyhow::Result<()> {
    let (iterations, warmup) = if quick {
        (QUICK_ITERATIONS, QUICK_WARMUP)
    } else {
        (config.harness.iterations, config.harness.warmup)
    };

    let registry = CaseRegistry::standard(config.harness.seed).filter(categories);
    if registry.is_empty() {
        bail!("No benchmark cases match the selected categories");
    }

    let pinned_cpu = match config.harness.pin_cpu {
        Some(cpu) => {
            let pinner = CpuPinner::new();
            tracing::debug!(
                num_cpus = pinner.num_cpus(),
                allowed = ?pinner.allowed(),
                "Pinning benchmark thread"
            );
            Some(
                pinner
                    .pin_current(cpu)
                    .with_context(|| format!("Failed to pin to CPU {}", cpu))?,
            )
        }
        None => None,
    };

    let dynamic = DynamicBinding::load_from(config.library.path.as_deref())
        .context("Failed to load the native library")?;
    let linked = LinkedBinding::new();

    let harness = BenchmarkHarness::new()
        .warmup(warmup)
        .iterations(iterations)
        .keep_samples(config.harness.keep_samples);

    let metadata = RunMetadata {
        iterations,
        warmup,
        seed: config.harness.seed,
        pinned_cpu,
        library_path: Some(dynamic.path().display().to_string()),
        categories: categories.to_vec(),
    };

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 FFIBENCH: LINKED VS DYNAMIC                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "{} cases, {} timed calls after {} warmup calls per binding",
        registry.len(),
        iterations,
        warmup
    );
    println!();

    let runner = BenchmarkRunner::new(&linked, &dynamic, harness);
    let report = runner.run(&registry, metadata)?;

    print_summary(&report);

    let saved = JsonReporter::new(&config.output.results_file).save(&report)?;
    println!();
    println!("✓ Results saved to {}", saved.display());

    Ok(())
}

fn print_summary(report: &BenchmarkReport) {
    for category in report.categories() {
        println!("{}", category.title());
        for result in report.results_in(category) {
            println!("  {}", summary_line(result));
        }
        println!();
    }
}

fn summary_line(result: &CaseResult) -> String {
    let verdict = match &result.speedup {
        Some(s) => format!("{:.2}x, {} faster", s.ratio, s.faster),
        None => "n/a".to_string(),
    };
    format!(
        "{:<32} linked {:>10}  dynamic {:>10}  ({})",
        result.name,
        format_latency(result.linked.mean_ns),
        format_latency(result.dynamic.mean_ns),
        verdict
    )
}
