//! Forward-chaining matcher.
//!
//! Each pass scans the registry in order and fires every rule whose conditions are all in
//! the fact store. Firing asserts the rule's diagnosis; because assertion is idempotent a
//! rule that already fired adds nothing on later passes. The loop stops at the first pass
//! that adds no fact, or when the pass limit is reached.
//!
//! Each productive pass fires at least one rule that has not fired before, so a limit equal
//! to the number of rules always reaches the fixpoint.

use crate::facts::FactStore;
use crate::rules::RuleRegistry;
use cardio_types::DiagnosisId;
use std::num::NonZeroUsize;

/// Record of one rule firing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Firing {
    /// Name of the rule that fired.
    pub rule: String,
    /// Diagnosis the rule asserted.
    pub diagnosis: DiagnosisId,
    /// 1-based pass in which the rule fired.
    pub pass: usize,
}

/// Outcome of running the matcher to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRun {
    /// Firings in assertion order.
    pub firings: Vec<Firing>,
    /// Number of passes executed, including the final unproductive one.
    pub passes: usize,
    /// False only if the pass limit cut the run short.
    pub reached_fixpoint: bool,
}

/// Runs forward chaining over `store` until no rule can add a fact.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    registry: &'a RuleRegistry,
    max_passes: usize,
}

impl<'a> Matcher<'a> {
    /// Creates a matcher bounded by the number of rules in `registry`.
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self {
            registry,
            max_passes: registry.len(),
        }
    }

    /// Replaces the default pass limit. A zero limit would never run a pass, so the type
    /// rules it out.
    pub fn with_max_passes(mut self, max_passes: NonZeroUsize) -> Self {
        self.max_passes = max_passes.get();
        self
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Runs to fixpoint, asserting derived diagnoses into `store`.
    pub fn run(&self, store: &mut FactStore) -> MatchRun {
        let mut run = MatchRun::default();

        while run.passes < self.max_passes {
            run.passes += 1;
            let added = self.pass(store, run.passes, &mut run.firings);
            tracing::debug!(pass = run.passes, added, "matcher pass complete");

            if added == 0 {
                run.reached_fixpoint = true;
                return run;
            }
        }

        // The limit can coincide with the fixpoint: check whether anything could still fire.
        run.reached_fixpoint = !self.any_rule_pending(store);
        if !run.reached_fixpoint {
            tracing::warn!(
                max_passes = self.max_passes,
                "matcher stopped at pass limit before reaching a fixpoint"
            );
        }
        run
    }

    fn pass(&self, store: &mut FactStore, pass: usize, firings: &mut Vec<Firing>) -> usize {
        let mut added = 0;
        for rule in self.registry.rules() {
            if !store.contains_all(rule.conditions()) {
                continue;
            }
            if store.assert(rule.conclusion()) {
                tracing::debug!(rule = rule.name(), diagnosis = %rule.diagnosis(), pass, "rule fired");
                firings.push(Firing {
                    rule: rule.name().to_string(),
                    diagnosis: rule.diagnosis().clone(),
                    pass,
                });
                added += 1;
            }
        }
        added
    }

    fn any_rule_pending(&self, store: &FactStore) -> bool {
        self.registry.rules().iter().any(|rule| {
            store.contains_all(rule.conditions()) && !store.contains(&rule.conclusion())
        })
    }
}
