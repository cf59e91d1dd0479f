//! Market-wide conditions at evaluation time.

use crate::domain::error::{ensure_non_negative, RiskGateError};

labelled_enum! {
    pub enum MarketStatus("market status") {
        Open => "OPEN",
        Closed => "CLOSED",
        PreMarket => "PRE_MARKET",
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketSnapshot {
    /// VIX-equivalent volatility index.
    pub volatility_index: f64,
    pub status: MarketStatus,
}

impl MarketSnapshot {
    pub fn new(volatility_index: f64, status: MarketStatus) -> Self {
        Self {
            volatility_index,
            status,
        }
    }

    pub fn validate(&self) -> Result<(), RiskGateError> {
        ensure_non_negative("market.vix", self.volatility_index)
    }
}
