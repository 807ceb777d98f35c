// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Correctness check: both bindings must produce the same outcome.

use ffibench_core::{Binding, BindingKind, Category};

use crate::cases::{CaseRegistry, Outcome};

/// Result of checking one case.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    Passed,
    /// Both calls succeeded but the outcomes differ.
    Mismatch { linked: Outcome, dynamic: Outcome },
    /// A binding rejected the input or the native call failed.
    Failed { binding: BindingKind, error: String },
}

#[derive(Debug, Clone)]
pub struct CaseCheck {
    pub name: String,
    pub category: Category,
    pub status: CheckStatus,
}

impl CaseCheck {
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Passed
    }
}

/// Per-case results of a parity run.
#[derive(Debug, Clone, Default)]
pub struct ParityReport {
    pub checks: Vec<CaseCheck>,
}

impl ParityReport {
    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.passed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseCheck> {
        self.checks.iter().filter(|c| !c.passed())
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(CaseCheck::passed)
    }
}

/// Runs every case of a registry through both bindings.
pub struct ParityChecker<'a, L, D> {
    linked: &'a L,
    dynamic: &'a D,
}

impl<'a, L: Binding, D: Binding> ParityChecker<'a, L, D> {
    pub fn new(linked: &'a L, dynamic: &'a D) -> Self {
        Self { linked, dynamic }
    }

    /// Check every case. A failing case is recorded and the run continues.
    pub fn check(&self, registry: &CaseRegistry) -> ParityReport {
        let mut report = ParityReport::default();

        for case in registry.iter() {
            let linked = case.workload.call(self.linked);
            let dynamic = case.workload.call(self.dynamic);

            let status = match (linked, dynamic) {
                (Ok(l), Ok(d)) if l.matches(&d) => CheckStatus::Passed,
                (Ok(l), Ok(d)) => CheckStatus::Mismatch {
                    linked: l,
                    dynamic: d,
                },
                (Err(e), _) => CheckStatus::Failed {
                    binding: BindingKind::Linked,
                    error: e.to_string(),
                },
                (_, Err(e)) => CheckStatus::Failed {
                    binding: BindingKind::Dynamic,
                    error: e.to_string(),
                },
            };

            if status != CheckStatus::Passed {
                tracing::warn!(case = %case.name, status = ?status, "Bindings disagree");
            }

            report.checks.push(CaseCheck {
                name: case.name.clone(),
                category: case.category,
                status,
            });
        }

        tracing::info!(
            passed = report.passed(),
            total = report.checks.len(),
            "Parity check finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{BenchmarkCase, Workload};
    use ffibench_core::LinkedBinding;

    #[test]
    fn test_same_binding_always_passes() {
        let linked = LinkedBinding::new();
        let checker = ParityChecker::new(&linked, &linked);

        let report = checker.check(&CaseRegistry::verification(42));
        assert!(report.all_passed());
        assert_eq!(report.passed(), report.checks.len());
    }

    #[test]
    fn test_failures_are_recorded_and_do_not_abort() {
        let linked = LinkedBinding::new();
        let checker = ParityChecker::new(&linked, &linked);

        let mut registry = CaseRegistry::new();
        registry.register(BenchmarkCase::new(
            "dot_product(mismatched)",
            Workload::DotProduct(vec![1.0], vec![1.0, 2.0]),
        ));
        registry.register(BenchmarkCase::new("noop(3)", Workload::Noop(3)));

        let report = checker.check(&registry);
        assert!(!report.all_passed());
        assert_eq!(report.passed(), 1);

        let failure = report.failures().next().unwrap();
        assert_eq!(failure.name, "dot_product(mismatched)");
        assert!(matches!(
            &failure.status,
            CheckStatus::Failed { binding: BindingKind::Linked, error } if error.contains("length mismatch")
        ));
    }
}
