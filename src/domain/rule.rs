//! Rule primitive: a predicate over one slice of state producing a verdict.
//!
//! - `Scope`: names a rule group and the input its rules read
//! - `Rule`: an independent check within a scope
//! - `Verdict`: zero or more findings; pass is the empty verdict

use crate::domain::decision::{GroupKind, Severity};

/// A rule group's input shape. Implemented by uninhabited marker types so a
/// group can borrow its input for exactly one evaluation.
pub trait Scope: 'static {
    const GROUP: GroupKind;
    type Input<'a>;
}

pub trait Rule<S: Scope>: Send + Sync {
    /// Stable identifier used in decision messages and logs.
    fn name(&self) -> &'static str;

    fn check(&self, input: &S::Input<'_>) -> Verdict;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub severity: Severity,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Verdict {
    findings: Vec<Finding>,
}

impl Verdict {
    pub fn pass() -> Self {
        Verdict::default()
    }

    pub fn info(text: impl Into<String>) -> Self {
        Verdict::pass().with(Severity::Info, text)
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Verdict::pass().with(Severity::Warning, text)
    }

    pub fn violation(text: impl Into<String>) -> Self {
        Verdict::pass().with(Severity::Violation, text)
    }

    pub fn reject(text: impl Into<String>) -> Self {
        Verdict::pass().with(Severity::Rejected, text)
    }

    pub fn with(mut self, severity: Severity, text: impl Into<String>) -> Self {
        self.findings.push(Finding {
            severity,
            text: text.into(),
        });
        self
    }

    pub fn is_pass(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn is_blocking(&self) -> bool {
        self.findings.iter().any(|f| f.severity.is_blocking())
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}
