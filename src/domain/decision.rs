//! Decision object returned by every rule group.

use std::fmt;

labelled_enum! {
    /// Message severity, in increasing order of seriousness.
    pub enum Severity("severity") {
        Info => "INFO",
        Warning => "WARNING",
        Violation => "VIOLATION",
        Rejected => "REJECTED",
    }
}

impl Severity {
    /// Violations and rejections block the order.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Violation | Severity::Rejected)
    }
}

labelled_enum! {
    pub enum Outcome("outcome") {
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

labelled_enum! {
    /// The rule groups a decision can draw messages from.
    pub enum GroupKind("rule group") {
        Eligibility => "ELIGIBILITY",
        OrderValidation => "ORDER_VALIDATION",
        PortfolioRisk => "PORTFOLIO_RISK",
        MarketConditions => "MARKET_CONDITIONS",
        DailyLoss => "DAILY_LOSS",
        Suitability => "SUITABILITY",
        ExecutionVenue => "EXECUTION_VENUE",
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Message {
    pub severity: Severity,
    pub group: GroupKind,
    pub rule: &'static str,
    pub text: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}/{}: {}",
            self.severity, self.group, self.rule, self.text
        )
    }
}

/// Outcome plus ordered diagnostics.
///
/// The outcome is `Rejected` iff at least one message has a blocking severity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Decision {
    outcome: Outcome,
    messages: Vec<Message>,
}

impl Decision {
    pub fn approved() -> Self {
        Decision {
            outcome: Outcome::Approved,
            messages: Vec::new(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_approved(&self) -> bool {
        self.outcome == Outcome::Approved
    }

    pub fn is_rejected(&self) -> bool {
        self.outcome == Outcome::Rejected
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push(&mut self, message: Message) {
        if message.severity.is_blocking() {
            self.outcome = Outcome::Rejected;
        }
        self.messages.push(message);
    }

    /// Appends another decision's messages; its rejection carries over.
    pub fn merge(&mut self, other: Decision) {
        for message in other.messages {
            self.push(message);
        }
    }

    /// First blocking message, if any.
    pub fn rejection(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.severity.is_blocking())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Warning)
    }

    pub fn has_rule(&self, rule: &str) -> bool {
        self.messages.iter().any(|m| m.rule == rule)
    }

    pub fn groups(&self) -> Vec<GroupKind> {
        let mut groups: Vec<GroupKind> = Vec::new();
        for m in &self.messages {
            if !groups.contains(&m.group) {
                groups.push(m.group);
            }
        }
        groups
    }
}

impl Default for Decision {
    fn default() -> Self {
        Decision::approved()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.messages {
            writeln!(f, "{m}")?;
        }
        write!(f, "ORDER {}", self.outcome)
    }
}
