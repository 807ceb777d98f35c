// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! The two FFI bindings over the native workload library.
//!
//! [`LinkedBinding`] calls `extern "C"` declarations resolved by the linker
//! against the static archive built by `build.rs`. [`DynamicBinding`] opens the
//! shared object at run time and calls through resolved function pointers.
//! Both implement [`Binding`] and apply the same marshalling rules, so for any
//! input they must produce identical results.

mod dynamic;
mod linked;
mod marshal;

pub use dynamic::{default_library_path, platform_library_name, DynamicBinding, LIBRARY_ENV};
pub use linked::LinkedBinding;

use crate::error::BindingResult;
use crate::types::{BindingKind, DataPoint};

/// Every symbol the native library exports.
pub const NATIVE_SYMBOLS: [&str; 33] = [
    "noop",
    "add_numbers",
    "calculate_simple",
    "fibonacci_recursive",
    "fibonacci_iterative",
    "is_prime",
    "count_primes",
    "matrix_multiply",
    "compute_math_intensive",
    "sum_array",
    "scale_array",
    "copy_array",
    "dot_product",
    "array_reverse",
    "sum_strided",
    "string_length",
    "string_concat",
    "free_string",
    "process_datapoint",
    "sum_datapoints",
    "monte_carlo_pi",
    "blur_array",
    "sort_array",
    "allocate_array",
    "free_array",
    "apply_operation",
    "process_buffer",
    "checksum",
    "create_list",
    "sum_list",
    "free_list",
    "popcount",
    "bitwise_reduce",
];

/// Safe, language-level view of the native library.
///
/// Methods that take slices or strings validate their arguments before the
/// native call and report violations as [`crate::BindingError`]; scalar
/// methods cannot fail.
pub trait Binding {
    /// Which binding style this is.
    fn kind(&self) -> BindingKind;

    // Call overhead
    fn noop(&self, x: i32) -> i32;
    fn add_numbers(&self, a: i32, b: i32) -> i32;
    fn calculate_simple(&self, a: i32, b: f64, c: i32, d: f64) -> f64;

    // Compute
    fn fibonacci_recursive(&self, n: i32) -> i64;
    /// Wraps on overflow for `n > 92`.
    fn fibonacci_iterative(&self, n: i32) -> i64;
    fn is_prime(&self, n: i64) -> bool;
    /// Number of primes in the inclusive range `start..=end`.
    fn count_primes(&self, start: i32, end: i32) -> i32;
    /// Row-major `n x n` product of `a` and `b`.
    fn matrix_multiply(&self, a: &[f64], b: &[f64], n: usize) -> BindingResult<Vec<f64>>;
    fn compute_math_intensive(&self, x: f64, iterations: i32) -> f64;

    // Memory
    fn sum_array(&self, arr: &[f64]) -> BindingResult<f64>;
    fn scale_array(&self, arr: &mut [f64], factor: f64) -> BindingResult<()>;
    fn copy_array(&self, src: &[f64]) -> BindingResult<Vec<f64>>;
    fn dot_product(&self, a: &[f64], b: &[f64]) -> BindingResult<f64>;
    fn array_reverse(&self, arr: &mut [f64]) -> BindingResult<()>;
    fn sum_strided(&self, arr: &[f64], stride: usize) -> BindingResult<f64>;

    // Marshalling
    /// Length in bytes of the UTF-8 encoding of `s`.
    fn string_length(&self, s: &str) -> BindingResult<i32>;
    /// Concatenates in native memory, copies the result out and frees it.
    fn string_concat(&self, s1: &str, s2: &str) -> BindingResult<String>;
    fn process_datapoint(&self, point: &DataPoint) -> f64;
    fn sum_datapoints(&self, points: &[DataPoint]) -> BindingResult<f64>;

    // Mixed
    fn monte_carlo_pi(&self, iterations: i32) -> f64;
    /// 3x3 box blur of the interior of a row-major `width x height` grid.
    /// Border cells of the output are zero.
    fn blur_array(&self, input: &[f64], width: usize, height: usize) -> BindingResult<Vec<f64>>;
    fn sort_array(&self, arr: &mut [f64]) -> BindingResult<()>;

    // Allocation
    /// `allocate_array` + `sum_array` + `free_array`.
    fn allocate_and_sum(&self, size: usize) -> BindingResult<f64>;

    // Callback simulation
    fn apply_operation(&self, initial: f64, iterations: i32) -> f64;

    // Buffer processing
    fn process_buffer(&self, buf: &mut [u8]) -> BindingResult<()>;
    fn checksum(&self, buf: &[u8]) -> BindingResult<u32>;

    // Pointer chasing
    /// `create_list` + `sum_list` + `free_list`.
    fn list_operations(&self, size: usize) -> BindingResult<i32>;

    // Bitwise
    fn popcount(&self, n: u32) -> i32;
    fn bitwise_reduce(&self, arr: &[u32]) -> BindingResult<u32>;
}
