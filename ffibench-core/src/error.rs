// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for ffibench.
//!
//! Explicit enum error types only. Library code never returns
//! `Box<dyn Error>` or `anyhow::Result`.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Debug, Error)]
pub enum FfiBenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Binding Errors
    // =========================================================================
    #[error("Binding load error: {0}")]
    BindingLoad(#[from] BindingLoadError),

    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid configuration values. The process refuses to start a run.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Schema validation failed: {message}")]
    SchemaValidation { message: String },
}

/// Failures while opening the shared library or resolving its symbols.
/// There is no fallback: a dynamic binding either loads completely or not at all.
#[derive(Debug, Error)]
pub enum BindingLoadError {
    #[error("Shared library not found: {path}")]
    LibraryNotFound { path: PathBuf },

    #[error("No shared library configured: set FFIBENCH_LIBRARY or library.path")]
    NoLibraryConfigured,

    #[error("Failed to open shared library {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Symbol '{symbol}' not found in {path}: {reason}")]
    MissingSymbol {
        symbol: String,
        path: PathBuf,
        reason: String,
    },
}

/// Marshalling failures detected before a native call is made.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("{what} length {len} does not fit a C int")]
    LengthOverflow { what: &'static str, len: usize },

    #[error("{what} length mismatch: {left} != {right}")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("{what} expects {expected} elements, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Stride must be between 1 and i32::MAX, got {stride}")]
    InvalidStride { stride: usize },

    #[error("String contains an interior NUL byte at position {position}")]
    InteriorNul { position: usize },

    #[error("Native function '{function}' returned NULL")]
    NullReturn { function: &'static str },

    #[error("Native function '{function}' returned invalid UTF-8")]
    InvalidUtf8 { function: &'static str },
}

/// Result type alias using FfiBenchError.
pub type FfiBenchResult<T> = Result<T, FfiBenchError>;

/// Result type alias for binding calls.
pub type BindingResult<T> = Result<T, BindingError>;
