// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! FFIBench Benchmarking Framework
//!
//! Times the same native workloads through the linked and the dynamic
//! binding and compares them.
//!
//! # Pipeline
//!
//! - **Cases**: [`CaseRegistry`] builds seeded workloads in ten categories
//! - **Runner**: [`BenchmarkRunner`] warms up and times each case on both bindings
//! - **Verification**: [`ParityChecker`] checks both bindings agree on every input
//! - **Reporting**: [`JsonReporter`] writes the results file atomically
//! - **Analysis**: [`Analysis`] derives speedup statistics, a Markdown report
//!   and SVG charts
//!
//! # Data Output
//!
//! A sweep produces one pretty-printed JSON [`BenchmarkReport`].

pub mod analysis;
pub mod cases;
pub mod harness;
pub mod metrics;
pub mod plots;
pub mod reporter;
pub mod runner;
pub mod verify;

pub use analysis::{Analysis, AnalysisError};
pub use cases::{BenchmarkCase, CaseRegistry, Outcome, Workload};
pub use harness::BenchmarkHarness;
pub use metrics::{BenchmarkReport, CaseResult, RunMetadata, Speedup, SystemInfo, TimingStats};
pub use reporter::{JsonReporter, ReporterError};
pub use runner::{BenchmarkRunner, RunnerError};
pub use verify::{CaseCheck, CheckStatus, ParityChecker, ParityReport};
