// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! FFIBench Core Library
//!
//! Native workload library with two interchangeable FFI bindings: one
//! linked at build time and one loaded at run time. Also carries the shared
//! configuration, error and data types used by the benchmark suite and CLI.

pub mod binding;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use binding::{Binding, DynamicBinding, LinkedBinding, NATIVE_SYMBOLS};
pub use config::{Config, ConfigLoader, HarnessConfig, LibraryConfig, OutputConfig};
pub use error::{
    BindingError, BindingLoadError, BindingResult, FfiBenchError, FfiBenchResult,
    HardValidationError,
};
pub use types::{BindingKind, Category, DataPoint, Node};
