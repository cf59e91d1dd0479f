//! Rule group interpreter.
//!
//! # Evaluation Semantics
//!
//! - Rules run in insertion order against the same borrowed input
//! - Every finding becomes a decision message tagged with the group and rule
//! - The first blocking verdict rejects the group and skips its remaining rules
//! - Warnings and info emitted before the rejection are kept

use crate::domain::decision::{Decision, Message};
use crate::domain::rule::{Rule, Scope};
use std::marker::PhantomData;

pub struct RuleGroup<S: Scope> {
    rules: Vec<Box<dyn Rule<S>>>,
    _scope: PhantomData<fn() -> S>,
}

impl<S: Scope> RuleGroup<S> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            _scope: PhantomData,
        }
    }

    /// Builder form of [`RuleGroup::add_rule`].
    pub fn with_rule(mut self, rule: impl Rule<S> + 'static) -> Self {
        self.add_rule(rule);
        self
    }

    pub fn add_rule(&mut self, rule: impl Rule<S> + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Inserts a rule at `index`, clamped to the end of the group.
    pub fn insert_rule(&mut self, index: usize, rule: impl Rule<S> + 'static) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, Box::new(rule));
    }

    /// Removes every rule with the given name. Returns how many were removed.
    pub fn remove_rule(&mut self, name: &str) -> usize {
        let before = self.rules.len();
        self.rules.retain(|r| r.name() != name);
        before - self.rules.len()
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn evaluate(&self, input: &S::Input<'_>) -> Decision {
        let mut decision = Decision::approved();

        for rule in &self.rules {
            let verdict = rule.check(input);
            let blocking = verdict.is_blocking();

            for finding in verdict.into_findings() {
                tracing::debug!(
                    group = %S::GROUP,
                    rule = rule.name(),
                    severity = %finding.severity,
                    "{}",
                    finding.text
                );
                decision.push(Message {
                    severity: finding.severity,
                    group: S::GROUP,
                    rule: rule.name(),
                    text: finding.text,
                });
            }

            if blocking {
                tracing::warn!(group = %S::GROUP, rule = rule.name(), "rule group rejected");
                break;
            }
        }

        tracing::info!(
            group = %S::GROUP,
            outcome = %decision.outcome(),
            messages = decision.messages().len(),
            "rule group evaluated"
        );
        decision
    }
}

impl<S: Scope> Default for RuleGroup<S> {
    fn default() -> Self {
        Self::new()
    }
}
