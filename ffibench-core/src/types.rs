// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Shared vocabulary types and the `#[repr(C)]` records passed across the FFI
//! boundary.
//!
//! Record layouts must match `native/ffibench.h` field for field.

use std::fmt;
use std::str::FromStr;

use libc::{c_char, c_double, c_int};
use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Which binding style performed a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// `extern "C"` declarations resolved by the linker at build time.
    Linked,
    /// Shared object opened at run time, symbols resolved with `dlsym`.
    Dynamic,
}

impl BindingKind {
    pub const ALL: [BindingKind; 2] = [BindingKind::Linked, BindingKind::Dynamic];

    /// Human-readable label used in reports.
    pub fn title(&self) -> &'static str {
        match self {
            BindingKind::Linked => "Linked",
            BindingKind::Dynamic => "Dynamic",
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Linked => write!(f, "linked"),
            BindingKind::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Workload categories of the native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CallOverhead,
    Compute,
    Memory,
    Marshalling,
    Mixed,
    Allocation,
    CallbackSimulation,
    BufferProcessing,
    PointerChasing,
    Bitwise,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::CallOverhead,
        Category::Compute,
        Category::Memory,
        Category::Marshalling,
        Category::Mixed,
        Category::Allocation,
        Category::CallbackSimulation,
        Category::BufferProcessing,
        Category::PointerChasing,
        Category::Bitwise,
    ];

    /// Stable identifier, identical to the serialized form.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::CallOverhead => "call_overhead",
            Category::Compute => "compute",
            Category::Memory => "memory",
            Category::Marshalling => "marshalling",
            Category::Mixed => "mixed",
            Category::Allocation => "allocation",
            Category::CallbackSimulation => "callback_simulation",
            Category::BufferProcessing => "buffer_processing",
            Category::PointerChasing => "pointer_chasing",
            Category::Bitwise => "bitwise",
        }
    }

    /// Heading used in summaries and reports.
    pub fn title(&self) -> &'static str {
        match self {
            Category::CallOverhead => "Function Call Overhead",
            Category::Compute => "Compute-Intensive",
            Category::Memory => "Memory-Intensive",
            Category::Marshalling => "Data Marshalling",
            Category::Mixed => "Mixed Workload",
            Category::Allocation => "Memory Allocation",
            Category::CallbackSimulation => "Callback Simulation",
            Category::BufferProcessing => "Buffer Processing",
            Category::PointerChasing => "Pointer-Intensive",
            Category::Bitwise => "Bitwise Operations",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = HardValidationError;

    /// Accepts the slug (`call_overhead`), its kebab form or the title,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Category::ALL
            .into_iter()
            .find(|c| {
                c.slug() == wanted
                    || c.title().to_ascii_lowercase().replace('-', "_") == wanted
            })
            .ok_or_else(|| HardValidationError::InvalidFieldValue {
                field: "category",
                value: s.to_string(),
                reason: format!(
                    "expected one of: {}",
                    Category::ALL
                        .iter()
                        .map(Category::slug)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}

/// Capacity of the fixed `name` buffer in [`DataPoint`], terminator included.
pub const DATAPOINT_NAME_CAPACITY: usize = 32;

/// Fixed-layout record mirrored from the native `DataPoint` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub id: c_int,
    pub value: c_double,
    pub name: [c_char; DATAPOINT_NAME_CAPACITY],
}

impl DataPoint {
    /// Build a record, truncating `name` to 31 bytes (or its first NUL) so the
    /// buffer always stays NUL-terminated.
    pub fn new(id: i32, value: f64, name: &str) -> Self {
        let mut buf = [0 as c_char; DATAPOINT_NAME_CAPACITY];
        let bytes = name.as_bytes();
        let limit = bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(bytes.len())
            .min(DATAPOINT_NAME_CAPACITY - 1);
        for (slot, &byte) in buf.iter_mut().zip(&bytes[..limit]) {
            *slot = byte as c_char;
        }
        Self {
            id,
            value,
            name: buf,
        }
    }

    /// Name bytes up to the terminator, decoded lossily.
    pub fn name(&self) -> String {
        let bytes: Vec<u8> = self
            .name
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Linked-list node mirrored from the native `Node` struct. Only ever seen
/// behind pointers returned by `create_list`.
#[repr(C)]
#[derive(Debug)]
pub struct Node {
    pub data: c_int,
    pub next: *mut Node,
}
