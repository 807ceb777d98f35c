// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Compile-time binding: `extern "C"` declarations resolved by the linker
//! against the static `ffibench_native` archive emitted by `build.rs`.

use libc::c_int;

use super::{marshal, Binding};
use crate::error::{BindingError, BindingResult};
use crate::types::{BindingKind, DataPoint};

mod ffi {
    use libc::{c_char, c_double, c_int, c_longlong, c_uchar, c_uint};

    use crate::types::{DataPoint, Node};

    extern "C" {
        pub fn noop(x: c_int) -> c_int;
        pub fn add_numbers(a: c_int, b: c_int) -> c_int;
        pub fn calculate_simple(a: c_int, b: c_double, c: c_int, d: c_double) -> c_double;

        pub fn fibonacci_recursive(n: c_int) -> c_longlong;
        pub fn fibonacci_iterative(n: c_int) -> c_longlong;
        pub fn is_prime(n: c_longlong) -> c_int;
        pub fn count_primes(start: c_int, end: c_int) -> c_int;
        pub fn matrix_multiply(a: *const c_double, b: *const c_double, c: *mut c_double, n: c_int);
        pub fn compute_math_intensive(x: c_double, iterations: c_int) -> c_double;

        pub fn sum_array(arr: *const c_double, size: c_int) -> c_double;
        pub fn scale_array(arr: *mut c_double, size: c_int, factor: c_double);
        pub fn copy_array(src: *const c_double, dst: *mut c_double, size: c_int);
        pub fn dot_product(a: *const c_double, b: *const c_double, size: c_int) -> c_double;
        pub fn array_reverse(arr: *mut c_double, size: c_int);
        pub fn sum_strided(arr: *const c_double, size: c_int, stride: c_int) -> c_double;

        pub fn string_length(s: *const c_char) -> c_int;
        pub fn string_concat(s1: *const c_char, s2: *const c_char) -> *mut c_char;
        pub fn free_string(s: *mut c_char);
        pub fn process_datapoint(dp: *const DataPoint) -> c_double;
        pub fn sum_datapoints(points: *const DataPoint, count: c_int) -> c_double;

        pub fn monte_carlo_pi(iterations: c_int) -> c_double;
        pub fn blur_array(input: *const c_double, output: *mut c_double, width: c_int, height: c_int);
        pub fn sort_array(arr: *mut c_double, size: c_int);

        pub fn allocate_array(size: c_int) -> *mut c_double;
        pub fn free_array(arr: *mut c_double);

        pub fn apply_operation(initial: c_double, iterations: c_int) -> c_double;

        pub fn process_buffer(buffer: *mut c_uchar, size: c_int);
        pub fn checksum(buffer: *const c_uchar, size: c_int) -> c_uint;

        pub fn create_list(size: c_int) -> *mut Node;
        pub fn sum_list(head: *const Node) -> c_int;
        pub fn free_list(head: *mut Node);

        pub fn popcount(n: c_uint) -> c_int;
        pub fn bitwise_reduce(arr: *const c_uint, size: c_int) -> c_uint;
    }
}

/// Binding resolved at build time. Zero-sized: there is nothing to load.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedBinding;

impl LinkedBinding {
    pub fn new() -> Self {
        Self
    }
}

impl Binding for LinkedBinding {
    fn kind(&self) -> BindingKind {
        BindingKind::Linked
    }

    fn noop(&self, x: i32) -> i32 {
        unsafe { ffi::noop(x) }
    }

    fn add_numbers(&self, a: i32, b: i32) -> i32 {
        unsafe { ffi::add_numbers(a, b) }
    }

    fn calculate_simple(&self, a: i32, b: f64, c: i32, d: f64) -> f64 {
        unsafe { ffi::calculate_simple(a, b, c, d) }
    }

    fn fibonacci_recursive(&self, n: i32) -> i64 {
        unsafe { ffi::fibonacci_recursive(n) }
    }

    fn fibonacci_iterative(&self, n: i32) -> i64 {
        unsafe { ffi::fibonacci_iterative(n) }
    }

    fn is_prime(&self, n: i64) -> bool {
        unsafe { ffi::is_prime(n) != 0 }
    }

    fn count_primes(&self, start: i32, end: i32) -> i32 {
        unsafe { ffi::count_primes(start, end) }
    }

    fn matrix_multiply(&self, a: &[f64], b: &[f64], n: usize) -> BindingResult<Vec<f64>> {
        let dim = marshal::square_dim(a.len(), b.len(), n)?;
        let mut c = vec![0.0; a.len()];
        unsafe { ffi::matrix_multiply(a.as_ptr(), b.as_ptr(), c.as_mut_ptr(), dim) };
        Ok(c)
    }

    fn compute_math_intensive(&self, x: f64, iterations: i32) -> f64 {
        unsafe { ffi::compute_math_intensive(x, iterations) }
    }

    fn sum_array(&self, arr: &[f64]) -> BindingResult<f64> {
        let len = marshal::c_len("sum_array", arr.len())?;
        Ok(unsafe { ffi::sum_array(arr.as_ptr(), len) })
    }

    fn scale_array(&self, arr: &mut [f64], factor: f64) -> BindingResult<()> {
        let len = marshal::c_len("scale_array", arr.len())?;
        unsafe { ffi::scale_array(arr.as_mut_ptr(), len, factor) };
        Ok(())
    }

    fn copy_array(&self, src: &[f64]) -> BindingResult<Vec<f64>> {
        let len = marshal::c_len("copy_array", src.len())?;
        let mut dst = vec![0.0; src.len()];
        unsafe { ffi::copy_array(src.as_ptr(), dst.as_mut_ptr(), len) };
        Ok(dst)
    }

    fn dot_product(&self, a: &[f64], b: &[f64]) -> BindingResult<f64> {
        let len = marshal::paired_len("dot_product", a.len(), b.len())?;
        Ok(unsafe { ffi::dot_product(a.as_ptr(), b.as_ptr(), len) })
    }

    fn array_reverse(&self, arr: &mut [f64]) -> BindingResult<()> {
        let len = marshal::c_len("array_reverse", arr.len())?;
        unsafe { ffi::array_reverse(arr.as_mut_ptr(), len) };
        Ok(())
    }

    fn sum_strided(&self, arr: &[f64], stride: usize) -> BindingResult<f64> {
        let len = marshal::c_len("sum_strided", arr.len())?;
        let stride = marshal::stride(stride)?;
        Ok(unsafe { ffi::sum_strided(arr.as_ptr(), len, stride) })
    }

    fn string_length(&self, s: &str) -> BindingResult<i32> {
        let s = marshal::c_string(s)?;
        Ok(unsafe { ffi::string_length(s.as_ptr()) })
    }

    fn string_concat(&self, s1: &str, s2: &str) -> BindingResult<String> {
        let left = marshal::c_string(s1)?;
        let right = marshal::c_string(s2)?;
        let ptr = unsafe { ffi::string_concat(left.as_ptr(), right.as_ptr()) };
        if ptr.is_null() {
            return Err(BindingError::NullReturn {
                function: "string_concat",
            });
        }
        let out = unsafe { marshal::copy_c_string(ptr, "string_concat") };
        unsafe { ffi::free_string(ptr) };
        out
    }

    fn process_datapoint(&self, point: &DataPoint) -> f64 {
        unsafe { ffi::process_datapoint(point) }
    }

    fn sum_datapoints(&self, points: &[DataPoint]) -> BindingResult<f64> {
        let count = marshal::c_len("sum_datapoints", points.len())?;
        Ok(unsafe { ffi::sum_datapoints(points.as_ptr(), count) })
    }

    fn monte_carlo_pi(&self, iterations: i32) -> f64 {
        unsafe { ffi::monte_carlo_pi(iterations) }
    }

    fn blur_array(&self, input: &[f64], width: usize, height: usize) -> BindingResult<Vec<f64>> {
        let (w, h) = marshal::grid_dims(input.len(), width, height)?;
        let mut output = vec![0.0; input.len()];
        unsafe { ffi::blur_array(input.as_ptr(), output.as_mut_ptr(), w, h) };
        Ok(output)
    }

    fn sort_array(&self, arr: &mut [f64]) -> BindingResult<()> {
        let len = marshal::c_len("sort_array", arr.len())?;
        unsafe { ffi::sort_array(arr.as_mut_ptr(), len) };
        Ok(())
    }

    fn allocate_and_sum(&self, size: usize) -> BindingResult<f64> {
        let len = marshal::c_len("allocate_array", size)?;
        let ptr = unsafe { ffi::allocate_array(len) };
        if ptr.is_null() {
            return Err(BindingError::NullReturn {
                function: "allocate_array",
            });
        }
        let total = unsafe { ffi::sum_array(ptr, len) };
        unsafe { ffi::free_array(ptr) };
        Ok(total)
    }

    fn apply_operation(&self, initial: f64, iterations: i32) -> f64 {
        unsafe { ffi::apply_operation(initial, iterations) }
    }

    fn process_buffer(&self, buf: &mut [u8]) -> BindingResult<()> {
        let len = marshal::c_len("process_buffer", buf.len())?;
        unsafe { ffi::process_buffer(buf.as_mut_ptr(), len) };
        Ok(())
    }

    fn checksum(&self, buf: &[u8]) -> BindingResult<u32> {
        let len = marshal::c_len("checksum", buf.len())?;
        Ok(unsafe { ffi::checksum(buf.as_ptr(), len) })
    }

    fn list_operations(&self, size: usize) -> BindingResult<i32> {
        let len: c_int = marshal::c_len("create_list", size)?;
        let head = unsafe { ffi::create_list(len) };
        if head.is_null() && len > 0 {
            return Err(BindingError::NullReturn {
                function: "create_list",
            });
        }
        let total = unsafe { ffi::sum_list(head) };
        unsafe { ffi::free_list(head) };
        Ok(total)
    }

    fn popcount(&self, n: u32) -> i32 {
        unsafe { ffi::popcount(n) }
    }

    fn bitwise_reduce(&self, arr: &[u32]) -> BindingResult<u32> {
        let len = marshal::c_len("bitwise_reduce", arr.len())?;
        Ok(unsafe { ffi::bitwise_reduce(arr.as_ptr(), len) })
    }
}
