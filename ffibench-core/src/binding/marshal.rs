// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Argument conversion shared by both bindings.
//!
//! Both bindings call these helpers in the same order so their error
//! behaviour is identical and any marshalling cost is paid equally.

use std::ffi::{CStr, CString};

use libc::{c_char, c_int};

use crate::error::{BindingError, BindingResult};

/// Convert a Rust length to a C `int`.
pub(crate) fn c_len(what: &'static str, len: usize) -> BindingResult<c_int> {
    c_int::try_from(len).map_err(|_| BindingError::LengthOverflow { what, len })
}

/// Length of two slices that must be processed pairwise.
pub(crate) fn paired_len(what: &'static str, left: usize, right: usize) -> BindingResult<c_int> {
    if left != right {
        return Err(BindingError::LengthMismatch { what, left, right });
    }
    c_len(what, left)
}

/// Validate two `n x n` operands and return `n` as a C `int`.
pub(crate) fn square_dim(a_len: usize, b_len: usize, n: usize) -> BindingResult<c_int> {
    let expected = n
        .checked_mul(n)
        .ok_or(BindingError::LengthOverflow {
            what: "matrix_multiply",
            len: n,
        })?;
    for actual in [a_len, b_len] {
        if actual != expected {
            return Err(BindingError::DimensionMismatch {
                what: "matrix_multiply",
                expected,
                actual,
            });
        }
    }
    c_len("matrix_multiply", expected)?;
    c_len("matrix_multiply", n)
}

/// Validate a `width x height` grid and return both dimensions.
pub(crate) fn grid_dims(len: usize, width: usize, height: usize) -> BindingResult<(c_int, c_int)> {
    let expected = width
        .checked_mul(height)
        .ok_or(BindingError::LengthOverflow {
            what: "blur_array",
            len: width,
        })?;
    if len != expected {
        return Err(BindingError::DimensionMismatch {
            what: "blur_array",
            expected,
            actual: len,
        });
    }
    c_len("blur_array", expected)?;
    Ok((c_len("blur_array", width)?, c_len("blur_array", height)?))
}

/// A stride must be positive, otherwise the native loop never terminates.
pub(crate) fn stride(stride: usize) -> BindingResult<c_int> {
    match c_int::try_from(stride) {
        Ok(s) if s > 0 => Ok(s),
        _ => Err(BindingError::InvalidStride { stride }),
    }
}

/// Copy a Rust string into a NUL-terminated buffer.
pub(crate) fn c_string(s: &str) -> BindingResult<CString> {
    CString::new(s).map_err(|e| BindingError::InteriorNul {
        position: e.nul_position(),
    })
}

/// Copy a native NUL-terminated string into an owned `String`.
///
/// # Safety
///
/// `ptr` must be non-null and point to a NUL-terminated buffer that stays
/// valid for the duration of the call.
pub(crate) unsafe fn copy_c_string(
    ptr: *const c_char,
    function: &'static str,
) -> BindingResult<String> {
    CStr::from_ptr(ptr)
        .to_str()
        .map(str::to_owned)
        .map_err(|_| BindingError::InvalidUtf8 { function })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_len_overflow() {
        assert_eq!(c_len("sum_array", 3).unwrap(), 3);
        let too_big = c_int::MAX as usize + 1;
        assert!(matches!(
            c_len("sum_array", too_big),
            Err(BindingError::LengthOverflow { len, .. }) if len == too_big
        ));
    }

    #[test]
    fn test_paired_len_mismatch() {
        assert_eq!(paired_len("dot_product", 4, 4).unwrap(), 4);
        assert!(matches!(
            paired_len("dot_product", 4, 5),
            Err(BindingError::LengthMismatch { left: 4, right: 5, .. })
        ));
    }

    #[test]
    fn test_square_dim() {
        assert_eq!(square_dim(9, 9, 3).unwrap(), 3);
        assert!(square_dim(9, 8, 3).is_err());
        assert!(square_dim(4, 4, 3).is_err());
        assert_eq!(square_dim(0, 0, 0).unwrap(), 0);
    }

    #[test]
    fn test_grid_dims() {
        assert_eq!(grid_dims(12, 4, 3).unwrap(), (4, 3));
        assert!(matches!(
            grid_dims(11, 4, 3),
            Err(BindingError::DimensionMismatch { expected: 12, actual: 11, .. })
        ));
    }

    #[test]
    fn test_stride_rejects_zero() {
        assert_eq!(stride(10).unwrap(), 10);
        assert!(matches!(stride(0), Err(BindingError::InvalidStride { stride: 0 })));
    }

    #[test]
    fn test_c_string_interior_nul() {
        assert_eq!(c_string("abc").unwrap().as_bytes(), b"abc");
        assert!(matches!(
            c_string("ab\0c"),
            Err(BindingError::InteriorNul { position: 2 })
        ));
    }
}
