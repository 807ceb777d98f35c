// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Pinning the benchmarking thread to one CPU core.
//!
//! Timing runs on the main thread, so restricting that thread to a single
//! core keeps the scheduler from migrating it mid-sweep.

#[cfg(target_os = "linux")]
use nix::sched::{sched_getaffinity, sched_setaffinity, CpuSet};
#[cfg(target_os = "linux")]
use nix::unistd::Pid;

#[derive(Debug, thiserror::Error)]
pub enum AffinityError {
    #[error("CPU {cpu} is not available to this process (allowed: {allowed:?})")]
    NotAllowed { cpu: usize, allowed: Vec<usize> },

    #[error("Failed to set affinity to CPU {cpu}: {source}")]
    Sys {
        cpu: usize,
        #[source]
        source: nix::Error,
    },

    #[cfg(not(target_os = "linux"))]
    #[error("CPU pinning is only supported on Linux")]
    Unsupported,
}

/// Validates core indices against the current affinity mask and pins to them.
#[derive(Debug, Clone)]
pub struct CpuPinner {
    num_cpus: usize,
    allowed: Vec<usize>,
}

impl CpuPinner {
    pub fn new() -> Self {
        let num_cpus = num_cpus::get();
        let allowed = allowed_cpus(num_cpus);

        tracing::debug!(
            num_cpus = num_cpus,
            allowed = allowed.len(),
            "CpuPinner initialized"
        );

        Self { num_cpus, allowed }
    }

    /// Number of logical CPUs usable by this process.
    pub fn num_cpus(&self) -> usize {
        self.num_cpus
    }

    /// Core indices in the current affinity mask, ascending.
    pub fn allowed(&self) -> &[usize] {
        &self.allowed
    }

    pub fn validate(&self, cpu: usize) -> Result<(), AffinityError> {
        if self.allowed.contains(&cpu) {
            Ok(())
        } else {
            Err(AffinityError::NotAllowed {
                cpu,
                allowed: self.allowed.clone(),
            })
        }
    }

    /// Restrict the calling thread to `cpu`.
    #[cfg(target_os = "linux")]
    pub fn pin_current(&self, cpu: usize) -> Result<usize, AffinityError> {
        self.validate(cpu)?;

        let mut cpuset = CpuSet::new();
        cpuset
            .set(cpu)
            .map_err(|source| AffinityError::Sys { cpu, source })?;
        // Pid 0 addresses the calling thread.
        sched_setaffinity(Pid::from_raw(0), &cpuset)
            .map_err(|source| AffinityError::Sys { cpu, source })?;

        tracing::info!(cpu = cpu, "Benchmark thread pinned to CPU");
        Ok(cpu)
    }

    #[cfg(not(target_os = "linux"))]
    pub fn pin_current(&self, cpu: usize) -> Result<usize, AffinityError> {
        self.validate(cpu)?;
        Err(AffinityError::Unsupported)
    }
}

impl Default for CpuPinner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "linux")]
fn allowed_cpus(num_cpus: usize) -> Vec<usize> {
    match sched_getaffinity(Pid::from_raw(0)) {
        Ok(set) => (0..CpuSet::count())
            .filter(|&cpu| set.is_set(cpu).unwrap_or(false))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "sched_getaffinity failed, assuming all CPUs");
            (0..num_cpus).collect()
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn allowed_cpus(num_cpus: usize) -> Vec<usize> {
    (0..num_cpus).collect()
}
