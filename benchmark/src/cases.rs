// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark cases and the registry that builds them.
//!
//! A [`Workload`] names one native operation and owns its pre-generated
//! input, so both bindings are always handed exactly the same data.

use std::collections::BTreeMap;
use std::fmt;

use ffibench_core::{Binding, BindingResult, Category, DataPoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

/// Absolute or relative tolerance for floating-point outcomes.
pub const FLOAT_TOLERANCE: f64 = 1e-9;

/// One native operation together with its input.
#[derive(Debug, Clone)]
pub enum Workload {
    Noop(i32),
    AddNumbers(i32, i32),
    CalculateSimple { a: i32, b: f64, c: i32, d: f64 },
    FibonacciRecursive(i32),
    FibonacciIterative(i32),
    IsPrime(i64),
    CountPrimes { start: i32, end: i32 },
    MatrixMultiply { a: Vec<f64>, b: Vec<f64>, n: usize },
    ComputeMathIntensive { x: f64, iterations: i32 },
    SumArray(Vec<f64>),
    ScaleArray { data: Vec<f64>, factor: f64 },
    CopyArray(Vec<f64>),
    DotProduct(Vec<f64>, Vec<f64>),
    ArrayReverse(Vec<f64>),
    SumStrided { data: Vec<f64>, stride: usize },
    StringLength(String),
    StringConcat(String, String),
    ProcessDatapoint(DataPoint),
    SumDatapoints(Vec<DataPoint>),
    MonteCarloPi(i32),
    BlurArray { data: Vec<f64>, width: usize, height: usize },
    SortArray(Vec<f64>),
    AllocateAndSum(usize),
    ApplyOperation { initial: f64, iterations: i32 },
    ProcessBuffer(Vec<u8>),
    Checksum(Vec<u8>),
    ListOperations(usize),
    Popcount(u32),
    BitwiseReduce(Vec<u32>),
}

impl Workload {
    /// Name of the binding method this workload calls.
    pub fn function(&self) -> &'static str {
        match self {
            Workload::Noop(_) => "noop",
            Workload::AddNumbers(..) => "add_numbers",
            Workload::CalculateSimple { .. } => "calculate_simple",
            Workload::FibonacciRecursive(_) => "fibonacci_recursive",
            Workload::FibonacciIterative(_) => "fibonacci_iterative",
            Workload::IsPrime(_) => "is_prime",
            Workload::CountPrimes { .. } => "count_primes",
            Workload::MatrixMultiply { .. } => "matrix_multiply",
            Workload::ComputeMathIntensive { .. } => "compute_math_intensive",
            Workload::SumArray(_) => "sum_array",
            Workload::ScaleArray { .. } => "scale_array",
            Workload::CopyArray(_) => "copy_array",
            Workload::DotProduct(..) => "dot_product",
            Workload::ArrayReverse(_) => "array_reverse",
            Workload::SumStrided { .. } => "sum_strided",
            Workload::StringLength(_) => "string_length",
            Workload::StringConcat(..) => "string_concat",
            Workload::ProcessDatapoint(_) => "process_datapoint",
            Workload::SumDatapoints(_) => "sum_datapoints",
            Workload::MonteCarloPi(_) => "monte_carlo_pi",
            Workload::BlurArray { .. } => "blur_array",
            Workload::SortArray(_) => "sort_array",
            Workload::AllocateAndSum(_) => "allocate_and_sum",
            Workload::ApplyOperation { .. } => "apply_operation",
            Workload::ProcessBuffer(_) => "process_buffer",
            Workload::Checksum(_) => "checksum",
            Workload::ListOperations(_) => "list_operations",
            Workload::Popcount(_) => "popcount",
            Workload::BitwiseReduce(_) => "bitwise_reduce",
        }
    }

    /// Category the workload belongs to.
    pub fn category(&self) -> Category {
        match self {
            Workload::Noop(_) | Workload::AddNumbers(..) | Workload::CalculateSimple { .. } => {
                Category::CallOverhead
            }
            Workload::FibonacciRecursive(_)
            | Workload::FibonacciIterative(_)
            | Workload::IsPrime(_)
            | Workload::CountPrimes { .. }
            | Workload::MatrixMultiply { .. }
            | Workload::ComputeMathIntensive { .. } => Category::Compute,
            Workload::SumArray(_)
            | Workload::ScaleArray { .. }
            | Workload::CopyArray(_)
            | Workload::DotProduct(..)
            | Workload::ArrayReverse(_)
            | Workload::SumStrided { .. } => Category::Memory,
            Workload::StringLength(_)
            | Workload::StringConcat(..)
            | Workload::ProcessDatapoint(_)
            | Workload::SumDatapoints(_) => Category::Marshalling,
            Workload::MonteCarloPi(_) | Workload::BlurArray { .. } | Workload::SortArray(_) => {
                Category::Mixed
            }
            Workload::AllocateAndSum(_) => Category::Allocation,
            Workload::ApplyOperation { .. } => Category::CallbackSimulation,
            Workload::ProcessBuffer(_) | Workload::Checksum(_) => Category::BufferProcessing,
            Workload::ListOperations(_) => Category::PointerChasing,
            Workload::Popcount(_) | Workload::BitwiseReduce(_) => Category::Bitwise,
        }
    }

    /// Whether the native call mutates its input.
    ///
    /// Such workloads are handed a fresh copy of the input on every call.
    pub fn is_in_place(&self) -> bool {
        matches!(
            self,
            Workload::ScaleArray { .. }
                | Workload::ArrayReverse(_)
                | Workload::SortArray(_)
                | Workload::ProcessBuffer(_)
        )
    }

    /// Call the workload once through `binding`.
    ///
    /// In-place workloads operate on a copy and return the mutated copy.
    pub fn call<B: Binding + ?Sized>(&self, binding: &B) -> BindingResult<Outcome> {
        Ok(match self {
            Workload::Noop(x) => Outcome::Int(binding.noop(*x).into()),
            Workload::AddNumbers(a, b) => Outcome::Int(binding.add_numbers(*a, *b).into()),
            Workload::CalculateSimple { a, b, c, d } => {
                Outcome::Float(binding.calculate_simple(*a, *b, *c, *d))
            }
            Workload::FibonacciRecursive(n) => Outcome::Int(binding.fibonacci_recursive(*n)),
            Workload::FibonacciIterative(n) => Outcome::Int(binding.fibonacci_iterative(*n)),
            Workload::IsPrime(n) => Outcome::Bool(binding.is_prime(*n)),
            Workload::CountPrimes { start, end } => {
                Outcome::Int(binding.count_primes(*start, *end).into())
            }
            Workload::MatrixMultiply { a, b, n } => {
                Outcome::Floats(binding.matrix_multiply(a, b, *n)?)
            }
            Workload::ComputeMathIntensive { x, iterations } => {
                Outcome::Float(binding.compute_math_intensive(*x, *iterations))
            }
            Workload::SumArray(data) => Outcome::Float(binding.sum_array(data)?),
            Workload::ScaleArray { data, factor } => {
                let mut data = data.clone();
                binding.scale_array(&mut data, *factor)?;
                Outcome::Floats(data)
            }
            Workload::CopyArray(data) => Outcome::Floats(binding.copy_array(data)?),
            Workload::DotProduct(a, b) => Outcome::Float(binding.dot_product(a, b)?),
            Workload::ArrayReverse(data) => {
                let mut data = data.clone();
                binding.array_reverse(&mut data)?;
                Outcome::Floats(data)
            }
            Workload::SumStrided { data, stride } => {
                Outcome::Float(binding.sum_strided(data, *stride)?)
            }
            Workload::StringLength(s) => Outcome::Int(binding.string_length(s)?.into()),
            Workload::StringConcat(a, b) => Outcome::Text(binding.string_concat(a, b)?),
            Workload::ProcessDatapoint(point) => Outcome::Float(binding.process_datapoint(point)),
            Workload::SumDatapoints(points) => Outcome::Float(binding.sum_datapoints(points)?),
            Workload::MonteCarloPi(iterations) => Outcome::Float(binding.monte_carlo_pi(*iterations)),
            Workload::BlurArray {
                data,
                width,
                height,
            } => Outcome::Floats(binding.blur_array(data, *width, *height)?),
            Workload::SortArray(data) => {
                let mut data = data.clone();
                binding.sort_array(&mut data)?;
                Outcome::Floats(data)
            }
            Workload::AllocateAndSum(size) => Outcome::Float(binding.allocate_and_sum(*size)?),
            Workload::ApplyOperation {
                initial,
                iterations,
            } => Outcome::Float(binding.apply_operation(*initial, *iterations)),
            Workload::ProcessBuffer(data) => {
                let mut data = data.clone();
                binding.process_buffer(&mut data)?;
                Outcome::Bytes(data)
            }
            Workload::Checksum(data) => Outcome::Word(binding.checksum(data)?),
            Workload::ListOperations(size) => {
                Outcome::Int(binding.list_operations(*size)?.into())
            }
            Workload::Popcount(n) => Outcome::Int(binding.popcount(*n).into()),
            Workload::BitwiseReduce(data) => Outcome::Word(binding.bitwise_reduce(data)?),
        })
    }

    /// CRC32 over the function name and the raw input bytes.
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(self.function().as_bytes());

        match self {
            Workload::Noop(x) | Workload::FibonacciRecursive(x) | Workload::FibonacciIterative(x) => {
                hasher.update(&x.to_le_bytes())
            }
            Workload::MonteCarloPi(x) => hasher.update(&x.to_le_bytes()),
            Workload::AddNumbers(a, b) => {
                hasher.update(&a.to_le_bytes());
                hasher.update(&b.to_le_bytes());
            }
            Workload::CalculateSimple { a, b, c, d } => {
                hasher.update(&a.to_le_bytes());
                hasher.update(&b.to_le_bytes());
                hasher.update(&c.to_le_bytes());
                hasher.update(&d.to_le_bytes());
            }
            Workload::IsPrime(n) => hasher.update(&n.to_le_bytes()),
            Workload::CountPrimes { start, end } => {
                hasher.update(&start.to_le_bytes());
                hasher.update(&end.to_le_bytes());
            }
            Workload::MatrixMultiply { a, b, n } => {
                hasher.update(&(*n as u64).to_le_bytes());
                hash_floats(&mut hasher, a);
                hash_floats(&mut hasher, b);
            }
            Workload::ComputeMathIntensive { x, iterations } => {
                hasher.update(&x.to_le_bytes());
                hasher.update(&iterations.to_le_bytes());
            }
            Workload::SumArray(data)
            | Workload::CopyArray(data)
            | Workload::ArrayReverse(data)
            | Workload::SortArray(data) => hash_floats(&mut hasher, data),
            Workload::ScaleArray { data, factor } => {
                hash_floats(&mut hasher, data);
                hasher.update(&factor.to_le_bytes());
            }
            Workload::DotProduct(a, b) => {
                hash_floats(&mut hasher, a);
                hash_floats(&mut hasher, b);
            }
            Workload::SumStrided { data, stride } => {
                hash_floats(&mut hasher, data);
                hasher.update(&(*stride as u64).to_le_bytes());
            }
            Workload::StringLength(s) => hasher.update(s.as_bytes()),
            Workload::StringConcat(a, b) => {
                hasher.update(a.as_bytes());
                hasher.update(&[0]);
                hasher.update(b.as_bytes());
            }
            Workload::ProcessDatapoint(point) => datapoint_bytes(&mut hasher, point),
            Workload::SumDatapoints(points) => {
                for point in points {
                    datapoint_bytes(&mut hasher, point);
                }
            }
            Workload::BlurArray {
                data,
                width,
                height,
            } => {
                hasher.update(&(*width as u64).to_le_bytes());
                hasher.update(&(*height as u64).to_le_bytes());
                hash_floats(&mut hasher, data);
            }
            Workload::AllocateAndSum(size) | Workload::ListOperations(size) => {
                hasher.update(&(*size as u64).to_le_bytes())
            }
            Workload::ApplyOperation {
                initial,
                iterations,
            } => {
                hasher.update(&initial.to_le_bytes());
                hasher.update(&iterations.to_le_bytes());
            }
            Workload::ProcessBuffer(data) | Workload::Checksum(data) => hasher.update(data),
            Workload::Popcount(n) => hasher.update(&n.to_le_bytes()),
            Workload::BitwiseReduce(data) => {
                for w in data {
                    hasher.update(&w.to_le_bytes());
                }
            }
        }

        hasher.finalize()
    }
}

fn hash_floats(hasher: &mut crc32fast::Hasher, values: &[f64]) {
    for x in values {
        hasher.update(&x.to_le_bytes());
    }
}

fn datapoint_bytes(hasher: &mut crc32fast::Hasher, point: &DataPoint) {
    hasher.update(&point.id.to_le_bytes());
    hasher.update(&point.value.to_le_bytes());
    hasher.update(point.name().as_bytes());
}

/// Comparable value produced by a workload.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Floats(Vec<f64>),
    Bytes(Vec<u8>),
    Word(u32),
}

impl Outcome {
    /// Exact comparison, except floats which may differ by [`FLOAT_TOLERANCE`].
    pub fn matches(&self, other: &Outcome) -> bool {
        match (self, other) {
            (Outcome::Float(a), Outcome::Float(b)) => floats_close(*a, *b),
            (Outcome::Floats(a), Outcome::Floats(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| floats_close(*x, *y))
            }
            _ => self == other,
        }
    }
}

fn floats_close(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    diff <= FLOAT_TOLERANCE || diff <= FLOAT_TOLERANCE * a.abs().max(b.abs())
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Int(v) => write!(f, "{}", v),
            Outcome::Float(v) => write!(f, "{}", v),
            Outcome::Bool(v) => write!(f, "{}", v),
            Outcome::Text(v) if v.len() > 32 => {
                let head: String = v.chars().take(32).collect();
                write!(f, "{:?}... ({} bytes)", head, v.len())
            }
            Outcome::Text(v) => write!(f, "{:?}", v),
            Outcome::Floats(v) => write!(f, "[f64; {}] sum={}", v.len(), v.iter().sum::<f64>()),
            Outcome::Bytes(v) => write!(f, "[u8; {}] crc32={:08x}", v.len(), crc32fast::hash(v)),
            Outcome::Word(v) => write!(f, "{:#010x}", v),
        }
    }
}

/// A named workload registered for timing or verification.
#[derive(Debug, Clone)]
pub struct BenchmarkCase {
    pub name: String,
    pub category: Category,
    /// Parameters recorded alongside the result
    pub params: BTreeMap<String, Value>,
    pub workload: Workload,
}

impl BenchmarkCase {
    pub fn new(name: impl Into<String>, workload: Workload) -> Self {
        Self {
            name: name.into(),
            category: workload.category(),
            params: BTreeMap::new(),
            workload,
        }
    }

    /// Record a parameter.
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// Ordered set of benchmark cases.
#[derive(Debug, Clone, Default)]
pub struct CaseRegistry {
    cases: Vec<BenchmarkCase>,
}

impl CaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a case. Later registrations keep their order.
    pub fn register(&mut self, case: BenchmarkCase) {
        self.cases.push(case);
    }

    /// The full benchmark sweep, inputs drawn from an RNG seeded with `seed`.
    pub fn standard(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut r = Self::new();

        // Call overhead
        r.register(BenchmarkCase::new("noop(42)", Workload::Noop(42)));
        r.register(BenchmarkCase::new("add_numbers(100, 200)", Workload::AddNumbers(100, 200)));
        r.register(BenchmarkCase::new(
            "calculate_simple(1, 2.5, 3, 4.5)",
            Workload::CalculateSimple {
                a: 1,
                b: 2.5,
                c: 3,
                d: 4.5,
            },
        ));

        // Compute
        r.register(
            BenchmarkCase::new("fibonacci_recursive(20)", Workload::FibonacciRecursive(20))
                .param("n", 20),
        );
        r.register(
            BenchmarkCase::new("fibonacci_iterative(1000)", Workload::FibonacciIterative(1000))
                .param("n", 1000),
        );
        r.register(
            BenchmarkCase::new("is_prime(1000003)", Workload::IsPrime(1_000_003))
                .param("n", 1_000_003),
        );
        r.register(
            BenchmarkCase::new(
                "count_primes(1, 10000)",
                Workload::CountPrimes { start: 1, end: 10_000 },
            )
            .param("range", vec![1, 10_000]),
        );
        let n = 50;
        r.register(
            BenchmarkCase::new(
                format!("matrix_multiply({}x{})", n, n),
                Workload::MatrixMultiply {
                    a: random_floats(&mut rng, n * n),
                    b: random_floats(&mut rng, n * n),
                    n,
                },
            )
            .param("size", n),
        );
        r.register(
            BenchmarkCase::new(
                "compute_math_intensive(1.5, 10000)",
                Workload::ComputeMathIntensive {
                    x: 1.5,
                    iterations: 10_000,
                },
            )
            .param("iterations", 10_000),
        );

        // Memory
        for size in [1_000, 10_000, 100_000] {
            r.register(
                BenchmarkCase::new(
                    format!("sum_array(size={})", size),
                    Workload::SumArray(random_floats(&mut rng, size)),
                )
                .param("size", size),
            );
        }
        let arr = random_floats(&mut rng, 100_000);
        r.register(
            BenchmarkCase::new(
                "scale_array(size=100000)",
                Workload::ScaleArray {
                    data: arr.clone(),
                    factor: 2.5,
                },
            )
            .param("size", 100_000),
        );
        r.register(
            BenchmarkCase::new("copy_array(size=100000)", Workload::CopyArray(arr.clone()))
                .param("size", 100_000),
        );
        r.register(
            BenchmarkCase::new(
                "dot_product(size=100000)",
                Workload::DotProduct(random_floats(&mut rng, 100_000), random_floats(&mut rng, 100_000)),
            )
            .param("size", 100_000),
        );
        r.register(
            BenchmarkCase::new("array_reverse(size=100000)", Workload::ArrayReverse(arr.clone()))
                .param("size", 100_000),
        );
        for stride in [1, 10, 100] {
            r.register(
                BenchmarkCase::new(
                    format!("sum_strided(stride={})", stride),
                    Workload::SumStrided {
                        data: arr.clone(),
                        stride,
                    },
                )
                .param("stride", stride),
            );
        }

        // Marshalling
        let text = "Hello, World! ".repeat(10);
        let len = text.len();
        r.register(
            BenchmarkCase::new(
                format!("string_length({} chars)", len),
                Workload::StringLength(text),
            )
            .param("length", len),
        );
        let (s1, s2) = ("Hello".repeat(20), "World".repeat(20));
        let len = s1.len() + s2.len();
        r.register(
            BenchmarkCase::new("string_concat(100+100 chars)", Workload::StringConcat(s1, s2))
                .param("length", len),
        );
        r.register(BenchmarkCase::new(
            "process_datapoint",
            Workload::ProcessDatapoint(DataPoint::new(42, 3.14, "test")),
        ));
        r.register(
            BenchmarkCase::new(
                "sum_datapoints(100 structs)",
                Workload::SumDatapoints(datapoints(100)),
            )
            .param("count", 100),
        );

        // Mixed
        r.register(
            BenchmarkCase::new("monte_carlo_pi(100000)", Workload::MonteCarloPi(100_000))
                .param("iterations", 100_000),
        );
        r.register(
            BenchmarkCase::new(
                "blur_array(100x100)",
                Workload::BlurArray {
                    data: random_floats(&mut rng, 100 * 100),
                    width: 100,
                    height: 100,
                },
            )
            .param("size", vec![100, 100]),
        );
        r.register(
            BenchmarkCase::new(
                "sort_array(10000)",
                Workload::SortArray(random_floats(&mut rng, 10_000)),
            )
            .param("size", 10_000),
        );

        // Allocation
        r.register(
            BenchmarkCase::new("allocate_and_sum(100000)", Workload::AllocateAndSum(100_000))
                .param("size", 100_000),
        );

        // Callback simulation
        r.register(
            BenchmarkCase::new(
                "apply_operation(1.0, 10000)",
                Workload::ApplyOperation {
                    initial: 1.0,
                    iterations: 10_000,
                },
            )
            .param("iterations", 10_000),
        );

        // Buffer processing
        let buffer = random_bytes(&mut rng, 100_000);
        r.register(
            BenchmarkCase::new("process_buffer(100000)", Workload::ProcessBuffer(buffer.clone()))
                .param("size", 100_000),
        );
        r.register(
            BenchmarkCase::new("checksum(100000)", Workload::Checksum(buffer))
                .param("size", 100_000),
        );

        // Pointer chasing
        r.register(
            BenchmarkCase::new("list_operations(1000)", Workload::ListOperations(1_000))
                .param("size", 1_000),
        );

        // Bitwise
        r.register(BenchmarkCase::new("popcount(0xFFFFFFFF)", Workload::Popcount(u32::MAX)));
        r.register(
            BenchmarkCase::new(
                "bitwise_reduce(10000)",
                Workload::BitwiseReduce((0..10_000).map(|_| rng.gen()).collect()),
            )
            .param("size", 10_000),
        );

        r
    }

    /// Small hand-picked inputs used to check the bindings agree, including
    /// edge cases (empty inputs, overflow, unicode).
    pub fn verification(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut r = Self::new();

        for x in [0, 1, 42, -10, 1000] {
            r.register(BenchmarkCase::new(format!("noop({})", x), Workload::Noop(x)));
        }
        for (a, b) in [(1, 2), (100, 200), (-5, 10), (0, 0), (2, 3), (-7, 7)] {
            r.register(BenchmarkCase::new(
                format!("add_numbers({}, {})", a, b),
                Workload::AddNumbers(a, b),
            ));
        }
        for (a, b, c, d) in [(1, 2.5, 3, 4.5), (10, 1.1, 5, 2.2)] {
            r.register(BenchmarkCase::new(
                format!("calculate_simple({}, {}, {}, {})", a, b, c, d),
                Workload::CalculateSimple { a, b, c, d },
            ));
        }
        for n in [0, 1, 5, 10, 15] {
            r.register(BenchmarkCase::new(
                format!("fibonacci_recursive({})", n),
                Workload::FibonacciRecursive(n),
            ));
        }
        for n in [0, 1, 10, 100, 1000] {
            r.register(BenchmarkCase::new(
                format!("fibonacci_iterative({})", n),
                Workload::FibonacciIterative(n),
            ));
        }
        for n in [2, 3, 4, 17, 100, 1_000_003] {
            r.register(BenchmarkCase::new(format!("is_prime({})", n), Workload::IsPrime(n)));
        }
        for end in [10, 100, 1000] {
            r.register(BenchmarkCase::new(
                format!("count_primes(1, {})", end),
                Workload::CountPrimes { start: 1, end },
            ));
        }
        for n in [2, 5, 10] {
            r.register(BenchmarkCase::new(
                format!("matrix_multiply({}x{})", n, n),
                Workload::MatrixMultiply {
                    a: random_floats(&mut rng, n * n),
                    b: random_floats(&mut rng, n * n),
                    n,
                },
            ));
        }
        for (x, iterations) in [(1.5, 100), (2.0, 1000)] {
            r.register(BenchmarkCase::new(
                format!("compute_math_intensive({}, {})", x, iterations),
                Workload::ComputeMathIntensive { x, iterations },
            ));
        }
        r.register(BenchmarkCase::new(
            "sum_array([1, 2, 3])",
            Workload::SumArray(vec![1.0, 2.0, 3.0]),
        ));
        r.register(BenchmarkCase::new("sum_array([])", Workload::SumArray(Vec::new())));
        for size in [10, 100, 1000] {
            r.register(BenchmarkCase::new(
                format!("sum_array(size={})", size),
                Workload::SumArray(random_floats(&mut rng, size)),
            ));
            r.register(BenchmarkCase::new(
                format!("dot_product(size={})", size),
                Workload::DotProduct(random_floats(&mut rng, size), random_floats(&mut rng, size)),
            ));
        }
        let arr = random_floats(&mut rng, 100);
        r.register(BenchmarkCase::new(
            "scale_array(size=100)",
            Workload::ScaleArray {
                data: arr.clone(),
                factor: 2.5,
            },
        ));
        r.register(BenchmarkCase::new("copy_array(size=100)", Workload::CopyArray(arr.clone())));
        r.register(BenchmarkCase::new(
            "array_reverse(size=100)",
            Workload::ArrayReverse(arr.clone()),
        ));
        for stride in [1, 2, 5, 10] {
            r.register(BenchmarkCase::new(
                format!("sum_strided(stride={})", stride),
                Workload::SumStrided {
                    data: arr.clone(),
                    stride,
                },
            ));
        }
        for s in ["", "hello", "Hello, World!", "héllo wörld"] {
            r.register(BenchmarkCase::new(
                format!("string_length({:?})", s),
                Workload::StringLength(s.to_string()),
            ));
        }
        r.register(BenchmarkCase::new(
            "string_length(100 chars)",
            Workload::StringLength("x".repeat(100)),
        ));
        for (a, b) in [("hello", "world"), ("foo", "bar"), ("", "test")] {
            r.register(BenchmarkCase::new(
                format!("string_concat({:?}, {:?})", a, b),
                Workload::StringConcat(a.to_string(), b.to_string()),
            ));
        }
        for (id, value, name) in [(1, 2.5, "test"), (42, 3.14, "foo")] {
            r.register(BenchmarkCase::new(
                format!("process_datapoint({}, {}, {:?})", id, value, name),
                Workload::ProcessDatapoint(DataPoint::new(id, value, name)),
            ));
        }
        r.register(BenchmarkCase::new(
            "sum_datapoints(10 structs)",
            Workload::SumDatapoints(datapoints(10)),
        ));
        for iterations in [100, 10_000] {
            r.register(BenchmarkCase::new(
                format!("monte_carlo_pi({})", iterations),
                Workload::MonteCarloPi(iterations),
            ));
        }
        r.register(BenchmarkCase::new(
            "blur_array(10x10)",
            Workload::BlurArray {
                data: random_floats(&mut rng, 100),
                width: 10,
                height: 10,
            },
        ));
        r.register(BenchmarkCase::new(
            "blur_array(1x1)",
            Workload::BlurArray {
                data: vec![1.0],
                width: 1,
                height: 1,
            },
        ));
        r.register(BenchmarkCase::new(
            "sort_array(size=100)",
            Workload::SortArray(random_floats(&mut rng, 100)),
        ));
        for size in [0, 1, 100, 1000] {
            r.register(BenchmarkCase::new(
                format!("allocate_and_sum({})", size),
                Workload::AllocateAndSum(size),
            ));
        }
        for (initial, iterations) in [(1.0, 100), (0.5, 1000)] {
            r.register(BenchmarkCase::new(
                format!("apply_operation({}, {})", initial, iterations),
                Workload::ApplyOperation {
                    initial,
                    iterations,
                },
            ));
        }
        let buffer = random_bytes(&mut rng, 1000);
        r.register(BenchmarkCase::new(
            "process_buffer(1000)",
            Workload::ProcessBuffer(buffer.clone()),
        ));
        r.register(BenchmarkCase::new("checksum(1000)", Workload::Checksum(buffer)));
        for size in [0, 1, 10, 100, 1000] {
            r.register(BenchmarkCase::new(
                format!("list_operations({})", size),
                Workload::ListOperations(size),
            ));
        }
        for n in [0u32, 1, 255, 0xDEAD_BEEF, u32::MAX] {
            r.register(BenchmarkCase::new(format!("popcount({:#x})", n), Workload::Popcount(n)));
        }
        r.register(BenchmarkCase::new(
            "bitwise_reduce(1000)",
            Workload::BitwiseReduce((0..1000).map(|_| rng.gen()).collect()),
        ));

        r
    }

    /// Keep only cases in `categories`. An empty slice keeps everything.
    pub fn filter(mut self, categories: &[Category]) -> Self {
        if !categories.is_empty() {
            self.cases.retain(|c| categories.contains(&c.category));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&BenchmarkCase> {
        self.cases.iter().find(|c| c.name == name)
    }

    pub fn cases(&self) -> &[BenchmarkCase] {
        &self.cases
    }

    pub fn iter(&self) -> impl Iterator<Item = &BenchmarkCase> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

fn random_floats(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.gen::<f64>()).collect()
}

fn random_bytes(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen::<u8>()).collect()
}

fn datapoints(count: i32) -> Vec<DataPoint> {
    (0..count)
        .map(|i| DataPoint::new(i, i as f64, &format!("point_{}", i)))
        .collect()
}
