// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark harness for timing native calls.
//!
//! Every call runs on the calling thread with a monotonic clock
//! (`Instant`). Return values pass through `black_box` so the optimizer
//! cannot drop a call whose result is unused.

use std::hint::black_box;
use std::time::{Duration, Instant};

/// A benchmark harness for measuring per-call latency.
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    /// Number of untimed warmup calls
    warmup_iterations: u64,
    /// Number of timed calls
    measurement_iterations: u64,
    /// Whether to keep raw sample data in results
    keep_raw_samples: bool,
}

impl BenchmarkHarness {
    /// Create a harness with 50 warmup and 1000 timed calls.
    pub fn new() -> Self {
        Self {
            warmup_iterations: 50,
            measurement_iterations: 1000,
            keep_raw_samples: false,
        }
    }

    /// Set the number of warmup iterations.
    pub fn warmup(mut self, iterations: u64) -> Self {
        self.warmup_iterations = iterations;
        self
    }

    /// Set the number of measurement iterations.
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.measurement_iterations = iterations;
        self
    }

    /// Set whether to keep raw sample data.
    pub fn keep_samples(mut self, keep: bool) -> Self {
        self.keep_raw_samples = keep;
        self
    }

    pub fn warmup_iterations(&self) -> u64 {
        self.warmup_iterations
    }

    pub fn measurement_iterations(&self) -> u64 {
        self.measurement_iterations
    }

    /// Run a benchmark and collect latency samples.
    ///
    /// The closure performs one call of the operation being measured.
    /// Returns one sample per timed call, in nanoseconds, in call order.
    pub fn run<F, R>(&self, mut operation: F) -> Vec<u64>
    where
        F: FnMut() -> R,
    {
        for _ in 0..self.warmup_iterations {
            black_box(operation());
        }

        let mut samples = Vec::with_capacity(self.measurement_iterations as usize);
        for _ in 0..self.measurement_iterations {
            let start = Instant::now();
            let out = operation();
            let elapsed = start.elapsed();
            black_box(out);
            samples.push(elapsed.as_nanos() as u64);
        }

        samples
    }

    /// Run a benchmark whose operation consumes fresh state on every call.
    ///
    /// `setup` builds the state before each call and is not timed; neither is
    /// dropping the state afterwards. Used for operations that mutate their
    /// input in place.
    pub fn run_with_setup<S, I, O, R>(&self, mut setup: S, mut operation: O) -> Vec<u64>
    where
        S: FnMut() -> I,
        O: FnMut(&mut I) -> R,
    {
        for _ in 0..self.warmup_iterations {
            let mut state = setup();
            black_box(operation(&mut state));
        }

        let mut samples = Vec::with_capacity(self.measurement_iterations as usize);
        for _ in 0..self.measurement_iterations {
            let mut state = setup();

            let start = Instant::now();
            let out = operation(&mut state);
            let elapsed = start.elapsed();

            black_box(out);
            drop(state);
            samples.push(elapsed.as_nanos() as u64);
        }

        samples
    }

    /// Check if raw samples should be kept.
    pub fn should_keep_samples(&self) -> bool {
        self.keep_raw_samples
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer for measuring individual operations.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed nanoseconds.
    pub fn stop(self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    /// Stop the timer and return elapsed duration.
    pub fn elapsed(self) -> Duration {
        self.start.elapsed()
    }
}

/// Measure the execution time of a closure.
pub fn measure<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    (result, elapsed)
}
