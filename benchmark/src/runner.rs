// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Sequential sweep over a [`CaseRegistry`].
//!
//! For each case: one untimed probe call per binding, then warmup and timed
//! calls for the linked binding, then the same for the dynamic binding.

use ffibench_core::{Binding, BindingError, BindingKind};
use thiserror::Error;

use crate::cases::{BenchmarkCase, CaseRegistry, Workload};
use crate::harness::BenchmarkHarness;
use crate::metrics::{BenchmarkReport, CaseResult, RunMetadata, Speedup, TimingStats};

/// Errors that abort a sweep.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("case '{case}' failed on the {binding} binding: {source}")]
    Binding {
        case: String,
        binding: BindingKind,
        #[source]
        source: BindingError,
    },

    #[error("no benchmark cases selected")]
    NoCases,
}

/// Drives both bindings through every case of a registry.
pub struct BenchmarkRunner<'a, L, D> {
    linked: &'a L,
    dynamic: &'a D,
    harness: BenchmarkHarness,
}

impl<'a, L, D> BenchmarkRunner<'a, L, D>
where
    L: Binding,
    D: Binding,
{
    pub fn new(linked: &'a L, dynamic: &'a D, harness: BenchmarkHarness) -> Self {
        Self {
            linked,
            dynamic,
            harness,
        }
    }

    pub fn harness(&self) -> &BenchmarkHarness {
        &self.harness
    }

    /// Run every case and collect the results into a report.
    ///
    /// Any binding error aborts the sweep; partial results are discarded.
    pub fn run(
        &self,
        registry: &CaseRegistry,
        metadata: RunMetadata,
    ) -> Result<BenchmarkReport, RunnerError> {
        if registry.is_empty() {
            return Err(RunnerError::NoCases);
        }

        tracing::info!(
            cases = registry.len(),
            iterations = self.harness.measurement_iterations(),
            warmup = self.harness.warmup_iterations(),
            "Starting benchmark sweep"
        );

        let mut report = BenchmarkReport::new(metadata);
        for case in registry.iter() {
            report.add_result(self.run_case(case)?);
        }

        tracing::info!(cases = report.results.len(), "Benchmark sweep finished");
        Ok(report)
    }

    /// Time one case on both bindings.
    pub fn run_case(&self, case: &BenchmarkCase) -> Result<CaseResult, RunnerError> {
        probe(case, self.linked)?;
        probe(case, self.dynamic)?;

        let keep = self.harness.should_keep_samples();
        let linked = TimingStats::from_samples(
            time_workload(&case.workload, self.linked, &self.harness),
            keep,
        );
        let dynamic = TimingStats::from_samples(
            time_workload(&case.workload, self.dynamic, &self.harness),
            keep,
        );
        let speedup = Speedup::between(&linked, &dynamic);

        match &speedup {
            Some(s) => tracing::info!(
                case = %case.name,
                linked_ns = linked.mean_ns,
                dynamic_ns = dynamic.mean_ns,
                speedup = s.ratio,
                faster = %s.faster,
                "Case finished"
            ),
            None => tracing::warn!(
                case = %case.name,
                "Case finished with a zero mean, no speedup recorded"
            ),
        }

        Ok(CaseResult {
            name: case.name.clone(),
            category: case.category,
            params: case.params.clone(),
            iterations: self.harness.measurement_iterations(),
            warmup: self.harness.warmup_iterations(),
            input_crc32: case.workload.fingerprint(),
            linked,
            dynamic,
            speedup,
        })
    }
}

/// One untimed call so marshalling errors surface before any timing.
fn probe<B: Binding>(case: &BenchmarkCase, binding: &B) -> Result<(), RunnerError> {
    case.workload
        .call(binding)
        .map(drop)
        .map_err(|source| RunnerError::Binding {
            case: case.name.clone(),
            binding: binding.kind(),
            source,
        })
}

/// Collect timing samples for one workload on one binding.
///
/// In-place workloads get a fresh copy of the pristine input before every
/// call; the copy is made outside the timed region.
pub fn time_workload<B: Binding>(
    workload: &Workload,
    binding: &B,
    harness: &BenchmarkHarness,
) -> Vec<u64> {
    match workload {
        Workload::ScaleArray { data, factor } => {
            harness.run_with_setup(|| data.clone(), |v| binding.scale_array(v, *factor))
        }
        Workload::ArrayReverse(data) => {
            harness.run_with_setup(|| data.clone(), |v| binding.array_reverse(v))
        }
        Workload::SortArray(data) => {
            harness.run_with_setup(|| data.clone(), |v| binding.sort_array(v))
        }
        Workload::ProcessBuffer(data) => {
            harness.run_with_setup(|| data.clone(), |v| binding.process_buffer(v))
        }
        other => harness.run(|| other.call(binding)),
    }
}
