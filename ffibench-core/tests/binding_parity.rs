// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Both bindings must agree on every native function.
//!
//! Inputs follow the spot checks used when the library was first validated:
//! small hand-picked scalars plus seeded pseudo-random arrays.

use ffibench_core::{Binding, BindingError, DataPoint, DynamicBinding, LinkedBinding};

const TOLERANCE: f64 = 1e-9;

fn dynamic() -> Option<DynamicBinding> {
    match option_env!("FFIBENCH_NATIVE_DYLIB") {
        Some(path) => Some(DynamicBinding::load(path).expect("built shared object should load")),
        None => DynamicBinding::load_default().ok(),
    }
}

/// Run `check` against both bindings; skip when no shared object was built.
fn with_bindings(check: impl Fn(&LinkedBinding, &DynamicBinding)) {
    let Some(dynamic) = dynamic() else {
        eprintln!("shared object unavailable on this target, skipping");
        return;
    };
    check(&LinkedBinding::new(), &dynamic);
}

fn close(a: f64, b: f64) -> bool {
    let diff = (a - b).abs();
    diff <= TOLERANCE || diff <= TOLERANCE * a.abs().max(b.abs())
}

fn assert_close(a: f64, b: f64) {
    assert!(close(a, b), "{} != {}", a, b);
}

fn assert_all_close(a: &[f64], b: &[f64]) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_close(*x, *y);
    }
}

/// Deterministic values in [0, 1) without pulling in an RNG crate.
fn seeded(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

#[test]
fn test_call_overhead() {
    with_bindings(|l, d| {
        for x in [0, 1, 42, -10, 1000] {
            assert_eq!(l.noop(x), x);
            assert_eq!(d.noop(x), x);
        }
        for (a, b) in [(1, 2), (100, 200), (-5, 10), (0, 0), (2, 3)] {
            assert_eq!(l.add_numbers(a, b), a + b);
            assert_eq!(d.add_numbers(a, b), a + b);
        }
        for (a, b, c, e) in [(1, 2.5, 3, 4.5), (10, 1.1, 5, 2.2)] {
            let expected = (a as f64 + b) * (c as f64 - e);
            assert_close(l.calculate_simple(a, b, c, e), expected);
            assert_close(d.calculate_simple(a, b, c, e), expected);
        }
    });
}

#[test]
fn test_compute() {
    with_bindings(|l, d| {
        for n in [0, 1, 5, 10, 15] {
            assert_eq!(l.fibonacci_recursive(n), d.fibonacci_recursive(n));
        }
        assert_eq!(l.fibonacci_recursive(10), 55);

        for n in [0, 1, 10, 90, 100, 1000] {
            assert_eq!(l.fibonacci_iterative(n), d.fibonacci_iterative(n));
        }
        assert_eq!(d.fibonacci_iterative(90), 2_880_067_194_370_816_120);

        for n in [2, 3, 4, 17, 100, 1_000_003] {
            assert_eq!(l.is_prime(n), d.is_prime(n));
        }
        assert!(l.is_prime(17) && d.is_prime(17));
        assert!(!l.is_prime(1) && !d.is_prime(100));

        for (start, end, expected) in [(1, 10, 4), (1, 100, 25), (1, 1000, 168)] {
            assert_eq!(l.count_primes(start, end), expected);
            assert_eq!(d.count_primes(start, end), expected);
        }

        for (x, iterations) in [(1.5, 100), (2.0, 1000)] {
            assert_close(
                l.compute_math_intensive(x, iterations),
                d.compute_math_intensive(x, iterations),
            );
        }
    });
}

#[test]
fn test_matrix_multiply() {
    with_bindings(|l, d| {
        for n in [2usize, 5, 10] {
            let a = seeded(n * n, 1);
            let b = seeded(n * n, 2);
            assert_all_close(
                &l.matrix_multiply(&a, &b, n).unwrap(),
                &d.matrix_multiply(&a, &b, n).unwrap(),
            );
        }

        let identity = [1.0, 0.0, 0.0, 1.0];
        let m = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(l.matrix_multiply(&m, &identity, 2).unwrap(), m.to_vec());

        let err = d.matrix_multiply(&m, &identity, 3).unwrap_err();
        assert!(matches!(err, BindingError::DimensionMismatch { .. }));
    });
}

#[test]
fn test_memory() {
    with_bindings(|l, d| {
        assert_close(l.sum_array(&[1.0, 2.0, 3.0]).unwrap(), 6.0);
        assert_close(d.sum_array(&[1.0, 2.0, 3.0]).unwrap(), 6.0);
        assert_eq!(l.sum_array(&[]).unwrap(), 0.0);

        for size in [10, 100, 1000] {
            let a = seeded(size, 3);
            let b = seeded(size, 4);
            assert_close(l.sum_array(&a).unwrap(), d.sum_array(&a).unwrap());
            assert_close(l.dot_product(&a, &b).unwrap(), d.dot_product(&a, &b).unwrap());
        }

        let original = seeded(100, 5);

        let mut linked = original.clone();
        let mut dynamic = original.clone();
        l.scale_array(&mut linked, 2.5).unwrap();
        d.scale_array(&mut dynamic, 2.5).unwrap();
        assert_all_close(&linked, &dynamic);
        assert_close(linked[7], original[7] * 2.5);

        assert_eq!(l.copy_array(&original).unwrap(), original);
        assert_eq!(d.copy_array(&original).unwrap(), original);

        let mut linked = original.clone();
        let mut dynamic = original.clone();
        l.array_reverse(&mut linked).unwrap();
        d.array_reverse(&mut dynamic).unwrap();
        let reversed: Vec<f64> = original.iter().rev().copied().collect();
        assert_eq!(linked, reversed);
        assert_eq!(dynamic, reversed);

        for stride in [1, 2, 5, 10] {
            assert_close(
                l.sum_strided(&original, stride).unwrap(),
                d.sum_strided(&original, stride).unwrap(),
            );
        }
        assert_close(l.sum_strided(&[1.0, 2.0, 3.0, 4.0, 5.0], 2).unwrap(), 9.0);
        assert!(matches!(
            d.sum_strided(&original, 0),
            Err(BindingError::InvalidStride { stride: 0 })
        ));
    });
}

#[test]
fn test_marshalling() {
    with_bindings(|l, d| {
        let long = "x".repeat(100);
        for s in ["", "hello", "Hello, World!", long.as_str(), "héllo"] {
            assert_eq!(l.string_length(s).unwrap(), s.len() as i32);
            assert_eq!(d.string_length(s).unwrap(), s.len() as i32);
        }

        for (a, b) in [("hello", "world"), ("foo", "bar"), ("", "test")] {
            let expected = format!("{}{}", a, b);
            assert_eq!(l.string_concat(a, b).unwrap(), expected);
            assert_eq!(d.string_concat(a, b).unwrap(), expected);
        }
        assert!(matches!(
            d.string_concat("a\0b", "c"),
            Err(BindingError::InteriorNul { position: 1 })
        ));

        for (id, value, name) in [(1, 2.5, "test"), (42, 3.14, "foo")] {
            let point = DataPoint::new(id, value, name);
            assert_close(l.process_datapoint(&point), id as f64 * value);
            assert_close(d.process_datapoint(&point), id as f64 * value);
        }

        let points: Vec<DataPoint> = (0..10)
            .map(|i| DataPoint::new(i, i as f64, &format!("point_{}", i)))
            .collect();
        assert_close(l.sum_datapoints(&points).unwrap(), 45.0);
        assert_close(d.sum_datapoints(&points).unwrap(), 45.0);
    });
}

#[test]
fn test_mixed() {
    with_bindings(|l, d| {
        for iterations in [100, 10_000] {
            let a = l.monte_carlo_pi(iterations);
            let b = d.monte_carlo_pi(iterations);
            assert_eq!(a, b);
            assert!((0.0..=4.0).contains(&a));
        }
        assert!((l.monte_carlo_pi(100_000) - std::f64::consts::PI).abs() < 0.05);

        let grid = seeded(100, 6);
        let linked = l.blur_array(&grid, 10, 10).unwrap();
        assert_all_close(&linked, &d.blur_array(&grid, 10, 10).unwrap());
        assert_eq!(linked[0], 0.0);

        let ones = vec![1.0; 9];
        let blurred = l.blur_array(&ones, 3, 3).unwrap();
        assert_close(blurred[4], 1.0);

        let original = seeded(100, 7);
        let mut linked = original.clone();
        let mut dynamic = original.clone();
        l.sort_array(&mut linked).unwrap();
        d.sort_array(&mut dynamic).unwrap();
        assert_eq!(linked, dynamic);
        assert!(linked.windows(2).all(|w| w[0] <= w[1]));
    });
}

#[test]
fn test_allocation_and_callbacks() {
    with_bindings(|l, d| {
        for size in [0usize, 1, 100, 1000] {
            let expected = (size * size.saturating_sub(1) / 2) as f64;
            assert_close(l.allocate_and_sum(size).unwrap(), expected);
            assert_close(d.allocate_and_sum(size).unwrap(), expected);
        }

        for (initial, iterations) in [(1.0, 100), (0.5, 1000)] {
            assert_close(
                l.apply_operation(initial, iterations),
                d.apply_operation(initial, iterations),
            );
        }
        assert_close(l.apply_operation(1.0, 1), 1.6);
    });
}

#[test]
fn test_buffers() {
    with_bindings(|l, d| {
        let original: Vec<u8> = (0..=255).collect();
        let mut linked = original.clone();
        let mut dynamic = original.clone();
        l.process_buffer(&mut linked).unwrap();
        d.process_buffer(&mut dynamic).unwrap();
        assert_eq!(linked, dynamic);
        assert_eq!(linked[0], 13);
        assert_eq!(linked[250], 7);

        assert_eq!(l.checksum(&original).unwrap(), 32_640);
        assert_eq!(d.checksum(&original).unwrap(), 32_640);
        assert_eq!(l.checksum(&[]).unwrap(), 0);
    });
}

#[test]
fn test_pointers_and_bits() {
    with_bindings(|l, d| {
        for (size, expected) in [(0usize, 0), (1, 0), (10, 45), (1000, 499_500)] {
            assert_eq!(l.list_operations(size).unwrap(), expected);
            assert_eq!(d.list_operations(size).unwrap(), expected);
        }

        for n in [0u32, 1, 0xFF, 0xDEAD_BEEF, u32::MAX] {
            assert_eq!(l.popcount(n), n.count_ones() as i32);
            assert_eq!(d.popcount(n), n.count_ones() as i32);
        }

        let words: Vec<u32> = (0..1000u32).map(|i| i.wrapping_mul(2_654_435_761)).collect();
        let expected = words.iter().fold(0, |acc, w| acc ^ w);
        assert_eq!(l.bitwise_reduce(&words).unwrap(), expected);
        assert_eq!(d.bitwise_reduce(&words).unwrap(), expected);
    });
}
