//! Portfolio position snapshot and derived aggregates.

use crate::domain::error::{ensure_finite, ensure_non_negative, RiskGateError};

labelled_enum! {
    pub enum RiskCategory("risk category") {
        LowRisk => "LOW_RISK",
        MediumRisk => "MEDIUM_RISK",
        HighRisk => "HIGH_RISK",
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioPosition {
    pub symbol: String,
    pub current_value: f64,
    pub unrealized_pnl: f64,
    /// Fraction of the portfolio held in this position's sector.
    pub sector_exposure: f64,
    pub risk_category: RiskCategory,
}

impl PortfolioPosition {
    pub fn is_losing(&self) -> bool {
        self.unrealized_pnl < 0.0
    }

    pub fn validate(&self) -> Result<(), RiskGateError> {
        if self.symbol.trim().is_empty() {
            return Err(RiskGateError::invalid_input(
                "position.symbol",
                "must not be empty",
            ));
        }
        ensure_non_negative("position.current_value", self.current_value)?;
        ensure_finite("position.unrealized_pnl", self.unrealized_pnl)?;
        ensure_non_negative("position.sector_exposure", self.sector_exposure)?;
        Ok(())
    }
}

/// Aggregates computed once per portfolio evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortfolioSummary {
    pub total_value: f64,
    /// Sum of absolute unrealized P&L over losing positions.
    pub total_unrealized_loss: f64,
    pub high_risk_exposure: f64,
}

impl PortfolioSummary {
    pub fn from_positions(positions: &[PortfolioPosition]) -> Self {
        positions
            .iter()
            .fold(PortfolioSummary::default(), |mut acc, p| {
                acc.total_value += p.current_value;
                if p.is_losing() {
                    acc.total_unrealized_loss += p.unrealized_pnl.abs();
                }
                if p.risk_category == RiskCategory::HighRisk {
                    acc.high_risk_exposure += p.current_value;
                }
                acc
            })
    }

    /// Total value over account balance. `None` for an empty (zero value)
    /// portfolio; infinite when the balance is zero and the portfolio is not.
    pub fn leverage_ratio(&self, account_balance: f64) -> Option<f64> {
        if self.total_value == 0.0 {
            return None;
        }
        if account_balance == 0.0 {
            return Some(f64::INFINITY);
        }
        Some(self.total_value / account_balance)
    }

    /// Account balance over total value. `None` for a zero value portfolio.
    pub fn margin_equity_ratio(&self, account_balance: f64) -> Option<f64> {
        if self.total_value == 0.0 {
            return None;
        }
        Some(account_balance / self.total_value)
    }
}
