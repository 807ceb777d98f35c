// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Run-time binding: the shared object is opened with `libloading` and every
//! symbol is resolved once, when the binding is loaded.

use std::path::{Path, PathBuf};

use libc::{c_char, c_double, c_int, c_longlong, c_uchar, c_uint, c_void};
use libloading::Library;

use super::{marshal, Binding, NATIVE_SYMBOLS};
use crate::error::{BindingError, BindingLoadError, BindingResult};
use crate::types::{BindingKind, DataPoint, Node};

/// Environment variable that overrides the shared library location.
pub const LIBRARY_ENV: &str = "FFIBENCH_LIBRARY";

/// Shared object produced by `build.rs`, if the target supported building one.
const BUILT_LIBRARY: Option<&str> = option_env!("FFIBENCH_NATIVE_DYLIB");

/// Platform-specific file name of the shared library.
pub fn platform_library_name() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "ffibench.dll"
    }
    #[cfg(target_os = "macos")]
    {
        "libffibench.dylib"
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        "libffibench.so"
    }
}

/// Library path used when none is configured: `FFIBENCH_LIBRARY` if set,
/// otherwise the shared object built alongside this crate.
pub fn default_library_path() -> Option<PathBuf> {
    std::env::var_os(LIBRARY_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| BUILT_LIBRARY.map(PathBuf::from))
}

/// Function pointers resolved from the shared object.
///
/// Only valid while the `Library` they came from is alive; [`DynamicBinding`]
/// owns both so they share a lifetime.
struct Symbols {
    noop: unsafe extern "C" fn(c_int) -> c_int,
    add_numbers: unsafe extern "C" fn(c_int, c_int) -> c_int,
    calculate_simple: unsafe extern "C" fn(c_int, c_double, c_int, c_double) -> c_double,

    fibonacci_recursive: unsafe extern "C" fn(c_int) -> c_longlong,
    fibonacci_iterative: unsafe extern "C" fn(c_int) -> c_longlong,
    is_prime: unsafe extern "C" fn(c_longlong) -> c_int,
    count_primes: unsafe extern "C" fn(c_int, c_int) -> c_int,
    matrix_multiply: unsafe extern "C" fn(*const c_double, *const c_double, *mut c_double, c_int),
    compute_math_intensive: unsafe extern "C" fn(c_double, c_int) -> c_double,

    sum_array: unsafe extern "C" fn(*const c_double, c_int) -> c_double,
    scale_array: unsafe extern "C" fn(*mut c_double, c_int, c_double),
    copy_array: unsafe extern "C" fn(*const c_double, *mut c_double, c_int),
    dot_product: unsafe extern "C" fn(*const c_double, *const c_double, c_int) -> c_double,
    array_reverse: unsafe extern "C" fn(*mut c_double, c_int),
    sum_strided: unsafe extern "C" fn(*const c_double, c_int, c_int) -> c_double,

    string_length: unsafe extern "C" fn(*const c_char) -> c_int,
    string_concat: unsafe extern "C" fn(*const c_char, *const c_char) -> *mut c_char,
    free_string: unsafe extern "C" fn(*mut c_char),
    process_datapoint: unsafe extern "C" fn(*const DataPoint) -> c_double,
    sum_datapoints: unsafe extern "C" fn(*const DataPoint, c_int) -> c_double,

    monte_carlo_pi: unsafe extern "C" fn(c_int) -> c_double,
    blur_array: unsafe extern "C" fn(*const c_double, *mut c_double, c_int, c_int),
    sort_array: unsafe extern "C" fn(*mut c_double, c_int),

    allocate_array: unsafe extern "C" fn(c_int) -> *mut c_double,
    free_array: unsafe extern "C" fn(*mut c_double),

    apply_operation: unsafe extern "C" fn(c_double, c_int) -> c_double,

    process_buffer: unsafe extern "C" fn(*mut c_uchar, c_int),
    checksum: unsafe extern "C" fn(*const c_uchar, c_int) -> c_uint,

    create_list: unsafe extern "C" fn(c_int) -> *mut Node,
    sum_list: unsafe extern "C" fn(*const Node) -> c_int,
    free_list: unsafe extern "C" fn(*mut Node),

    popcount: unsafe extern "C" fn(c_uint) -> c_int,
    bitwise_reduce: unsafe extern "C" fn(*const c_uint, c_int) -> c_uint,
}

/// Look up one symbol and copy the function pointer out of the `Symbol` guard.
///
/// # Safety
///
/// `T` must match the native signature of `name`.
unsafe fn resolve<T: Copy>(library: &Library, path: &Path, name: &str) -> Result<T, BindingLoadError> {
    library
        .get::<T>(name.as_bytes())
        .map(|symbol| *symbol)
        .map_err(|e| BindingLoadError::MissingSymbol {
            symbol: name.to_string(),
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

impl Symbols {
    /// # Safety
    ///
    /// `library` must be the ffibench native library, whose exported
    /// signatures match the field types above.
    unsafe fn resolve_all(library: &Library, path: &Path) -> Result<Self, BindingLoadError> {
        Ok(Self {
            noop: resolve(library, path, "noop")?,
            add_numbers: resolve(library, path, "add_numbers")?,
            calculate_simple: resolve(library, path, "calculate_simple")?,
            fibonacci_recursive: resolve(library, path, "fibonacci_recursive")?,
            fibonacci_iterative: resolve(library, path, "fibonacci_iterative")?,
            is_prime: resolve(library, path, "is_prime")?,
            count_primes: resolve(library, path, "count_primes")?,
            matrix_multiply: resolve(library, path, "matrix_multiply")?,
            compute_math_intensive: resolve(library, path, "compute_math_intensive")?,
            sum_array: resolve(library, path, "sum_array")?,
            scale_array: resolve(library, path, "scale_array")?,
            copy_array: resolve(library, path, "copy_array")?,
            dot_product: resolve(library, path, "dot_product")?,
            array_reverse: resolve(library, path, "array_reverse")?,
            sum_strided: resolve(library, path, "sum_strided")?,
            string_length: resolve(library, path, "string_length")?,
            string_concat: resolve(library, path, "string_concat")?,
            free_string: resolve(library, path, "free_string")?,
            process_datapoint: resolve(library, path, "process_datapoint")?,
            sum_datapoints: resolve(library, path, "sum_datapoints")?,
            monte_carlo_pi: resolve(library, path, "monte_carlo_pi")?,
            blur_array: resolve(library, path, "blur_array")?,
            sort_array: resolve(library, path, "sort_array")?,
            allocate_array: resolve(library, path, "allocate_array")?,
            free_array: resolve(library, path, "free_array")?,
            apply_operation: resolve(library, path, "apply_operation")?,
            process_buffer: resolve(library, path, "process_buffer")?,
            checksum: resolve(library, path, "checksum")?,
            create_list: resolve(library, path, "create_list")?,
            sum_list: resolve(library, path, "sum_list")?,
            free_list: resolve(library, path, "free_list")?,
            popcount: resolve(library, path, "popcount")?,
            bitwise_reduce: resolve(library, path, "bitwise_reduce")?,
        })
    }
}

/// Binding resolved at run time from a shared object.
pub struct DynamicBinding {
    symbols: Symbols,
    path: PathBuf,
    // Declared last so the pointers above are never outlived by the mapping.
    library: Library,
}

impl DynamicBinding {
    /// Open the shared object at `path` and resolve every native symbol.
    ///
    /// Fails if the file is missing, cannot be opened, or lacks any symbol.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BindingLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BindingLoadError::LibraryNotFound {
                path: path.to_path_buf(),
            });
        }

        let library = unsafe { Library::new(path) }.map_err(|e| BindingLoadError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let symbols = unsafe { Symbols::resolve_all(&library, path) }?;

        tracing::debug!(
            path = %path.display(),
            symbols = NATIVE_SYMBOLS.len(),
            "Dynamic binding loaded"
        );

        Ok(Self {
            symbols,
            path: path.to_path_buf(),
            library,
        })
    }

    /// Load from an explicit path if given, else from [`default_library_path`].
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, BindingLoadError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        }
    }

    /// Load from [`default_library_path`].
    pub fn load_default() -> Result<Self, BindingLoadError> {
        let path = default_library_path().ok_or(BindingLoadError::NoLibraryConfigured)?;
        Self::load(path)
    }

    /// Path the library was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of symbols resolved at load time.
    pub fn symbol_count(&self) -> usize {
        NATIVE_SYMBOLS.len()
    }

    /// Address of an exported symbol, for diagnostics.
    pub fn symbol_address(&self, name: &str) -> Result<usize, BindingLoadError> {
        unsafe { resolve::<*const c_void>(&self.library, &self.path, name) }.map(|p| p as usize)
    }
}

impl std::fmt::Debug for DynamicBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicBinding")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Binding for DynamicBinding {
    fn kind(&self) -> BindingKind {
        BindingKind::Dynamic
    }

    fn noop(&self, x: i32) -> i32 {
        unsafe { (self.symbols.noop)(x) }
    }

    fn add_numbers(&self, a: i32, b: i32) -> i32 {
        unsafe { (self.symbols.add_numbers)(a, b) }
    }

    fn calculate_simple(&self, a: i32, b: f64, c: i32, d: f64) -> f64 {
        unsafe { (self.symbols.calculate_simple)(a, b, c, d) }
    }

    fn fibonacci_recursive(&self, n: i32) -> i64 {
        unsafe { (self.symbols.fibonacci_recursive)(n) }
    }

    fn fibonacci_iterative(&self, n: i32) -> i64 {
        unsafe { (self.symbols.fibonacci_iterative)(n) }
    }

    fn is_prime(&self, n: i64) -> bool {
        unsafe { (self.symbols.is_prime)(n) != 0 }
    }

    fn count_primes(&self, start: i32, end: i32) -> i32 {
        unsafe { (self.symbols.count_primes)(start, end) }
    }

    fn matrix_multiply(&self, a: &[f64], b: &[f64], n: usize) -> BindingResult<Vec<f64>> {
        let dim = marshal::square_dim(a.len(), b.len(), n)?;
        let mut c = vec![0.0; a.len()];
        unsafe { (self.symbols.matrix_multiply)(a.as_ptr(), b.as_ptr(), c.as_mut_ptr(), dim) };
        Ok(c)
    }

    fn compute_math_intensive(&self, x: f64, iterations: i32) -> f64 {
        unsafe { (self.symbols.compute_math_intensive)(x, iterations) }
    }

    fn sum_array(&self, arr: &[f64]) -> BindingResult<f64> {
        let len = marshal::c_len("sum_array", arr.len())?;
        Ok(unsafe { (self.symbols.sum_array)(arr.as_ptr(), len) })
    }

    fn scale_array(&self, arr: &mut [f64], factor: f64) -> BindingResult<()> {
        let len = marshal::c_len("scale_array", arr.len())?;
        unsafe { (self.symbols.scale_array)(arr.as_mut_ptr(), len, factor) };
        Ok(())
    }

    fn copy_array(&self, src: &[f64]) -> BindingResult<Vec<f64>> {
        let len = marshal::c_len("copy_array", src.len())?;
        let mut dst = vec![0.0; src.len()];
        unsafe { (self.symbols.copy_array)(src.as_ptr(), dst.as_mut_ptr(), len) };
        Ok(dst)
    }

    fn dot_product(&self, a: &[f64], b: &[f64]) -> BindingResult<f64> {
        let len = marshal::paired_len("dot_product", a.len(), b.len())?;
        Ok(unsafe { (self.symbols.dot_product)(a.as_ptr(), b.as_ptr(), len) })
    }

    fn array_reverse(&self, arr: &mut [f64]) -> BindingResult<()> {
        let len = marshal::c_len("array_reverse", arr.len())?;
        unsafe { (self.symbols.array_reverse)(arr.as_mut_ptr(), len) };
        Ok(())
    }

    fn sum_strided(&self, arr: &[f64], stride: usize) -> BindingResult<f64> {
        let len = marshal::c_len("sum_strided", arr.len())?;
        let stride = marshal::stride(stride)?;
        Ok(unsafe { (self.symbols.sum_strided)(arr.as_ptr(), len, stride) })
    }

    fn string_length(&self, s: &str) -> BindingResult<i32> {
        let s = marshal::c_string(s)?;
        Ok(unsafe { (self.symbols.string_length)(s.as_ptr()) })
    }

    fn string_concat(&self, s1: &str, s2: &str) -> BindingResult<String> {
        let left = marshal::c_string(s1)?;
        let right = marshal::c_string(s2)?;
        let ptr = unsafe { (self.symbols.string_concat)(left.as_ptr(), right.as_ptr()) };
        if ptr.is_null() {
            return Err(BindingError::NullReturn {
                function: "string_concat",
            });
        }
        let out = unsafe { marshal::copy_c_string(ptr, "string_concat") };
        unsafe { (self.symbols.free_string)(ptr) };
        out
    }

    fn process_datapoint(&self, point: &DataPoint) -> f64 {
        unsafe { (self.symbols.process_datapoint)(point) }
    }

    fn sum_datapoints(&self, points: &[DataPoint]) -> BindingResult<f64> {
        let count = marshal::c_len("sum_datapoints", points.len())?;
        Ok(unsafe { (self.symbols.sum_datapoints)(points.as_ptr(), count) })
    }

    fn monte_carlo_pi(&self, iterations: i32) -> f64 {
        unsafe { (self.symbols.monte_carlo_pi)(iterations) }
    }

    fn blur_array(&self, input: &[f64], width: usize, height: usize) -> BindingResult<Vec<f64>> {
        let (w, h) = marshal::grid_dims(input.len(), width, height)?;
        let mut output = vec![0.0; input.len()];
        unsafe { (self.symbols.blur_array)(input.as_ptr(), output.as_mut_ptr(), w, h) };
        Ok(output)
    }

    fn sort_array(&self, arr: &mut [f64]) -> BindingResult<()> {
        let len = marshal::c_len("sort_array", arr.len())?;
        unsafe { (self.symbols.sort_array)(arr.as_mut_ptr(), len) };
        Ok(())
    }

    fn allocate_and_sum(&self, size: usize) -> BindingResult<f64> {
        let len = marshal::c_len("allocate_array", size)?;
        let ptr = unsafe { (self.symbols.allocate_array)(len) };
        if ptr.is_null() {
            return Err(BindingError::NullReturn {
                function: "allocate_array",
            });
        }
        let total = unsafe { (self.symbols.sum_array)(ptr, len) };
        unsafe { (self.symbols.free_array)(ptr) };
        Ok(total)
    }

    fn apply_operation(&self, initial: f64, iterations: i32) -> f64 {
        unsafe { (self.symbols.apply_operation)(initial, iterations) }
    }

    fn process_buffer(&self, buf: &mut [u8]) -> BindingResult<()> {
        let len = marshal::c_len("process_buffer", buf.len())?;
        unsafe { (self.symbols.process_buffer)(buf.as_mut_ptr(), len) };
        Ok(())
    }

    fn checksum(&self, buf: &[u8]) -> BindingResult<u32> {
        let len = marshal::c_len("checksum", buf.len())?;
        Ok(unsafe { (self.symbols.checksum)(buf.as_ptr(), len) })
    }

    fn list_operations(&self, size: usize) -> BindingResult<i32> {
        let len = marshal::c_len("create_list", size)?;
        let head = unsafe { (self.symbols.create_list)(len) };
        if head.is_null() && len > 0 {
            return Err(BindingError::NullReturn {
                function: "create_list",
            });
        }
        let total = unsafe { (self.symbols.sum_list)(head) };
        unsafe { (self.symbols.free_list)(head) };
        Ok(total)
    }

    fn popcount(&self, n: u32) -> i32 {
        unsafe { (self.symbols.popcount)(n) }
    }

    fn bitwise_reduce(&self, arr: &[u32]) -> BindingResult<u32> {
        let len = marshal::c_len("bitwise_reduce", arr.len())?;
        Ok(unsafe { (self.symbols.bitwise_reduce)(arr.as_ptr(), len) })
    }
}
