//! Trader identity and profile snapshot.

use crate::domain::error::{ensure_non_negative, RiskGateError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraderId(pub u64);

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

labelled_enum! {
    /// Self-declared appetite for risk.
    pub enum RiskTolerance("risk tolerance") {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
    }
}

labelled_enum! {
    pub enum TraderCategory("trader category") {
        Retail => "RETAIL",
        Institutional => "INSTITUTIONAL",
        Proprietary => "PROPRIETARY",
    }
}

/// Read-only snapshot of a trader, owned by the caller for one evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraderProfile {
    pub id: TraderId,
    pub name: String,
    pub experience_years: u32,
    pub risk_tolerance: RiskTolerance,
    pub account_balance: f64,
    pub available_margin: f64,
    pub category: TraderCategory,
    pub accredited: bool,
    pub jurisdiction: String,
}

impl TraderProfile {
    pub fn is_retail(&self) -> bool {
        self.category == TraderCategory::Retail
    }

    /// Case-insensitive jurisdiction membership test.
    pub fn in_jurisdiction(&self, codes: &[String]) -> bool {
        let own = self.jurisdiction.trim();
        codes.iter().any(|c| c.eq_ignore_ascii_case(own))
    }

    pub fn validate(&self) -> Result<(), RiskGateError> {
        ensure_non_negative("trader.account_balance", self.account_balance)?;
        ensure_non_negative("trader.available_margin", self.available_margin)?;
        if self.jurisdiction.trim().is_empty() {
            return Err(RiskGateError::invalid_input(
                "trader.jurisdiction",
                "must not be empty",
            ));
        }
        Ok(())
    }
}
