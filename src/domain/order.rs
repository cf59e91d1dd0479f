//! Proposed trade order.

use crate::domain::error::{ensure_non_negative, ensure_positive, RiskGateError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

labelled_enum! {
    pub enum Side("side") {
        Buy => "BUY",
        Sell => "SELL",
        Short => "SHORT",
    }
}

labelled_enum! {
    pub enum OrderType("order type") {
        Market => "MARKET",
        Limit => "LIMIT",
    }
}

labelled_enum! {
    pub enum TimeInForce("time in force") {
        Day => "DAY",
        Gtc => "GTC",
        Ioc => "IOC",
        ExtendedHours => "EXTENDED_HOURS",
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeOrder {
    pub id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: f64,
    pub price: f64,
    pub time_in_force: TimeInForce,
    pub margin: bool,
    pub sector: String,
    /// Instrument volatility, nominally 0.0 to 1.0 but not capped.
    pub volatility: f64,
}

impl TradeOrder {
    /// Notional value: quantity times price.
    pub fn order_value(&self) -> f64 {
        self.quantity * self.price
    }

    pub fn in_sector(&self, sectors: &[String]) -> bool {
        let own = self.sector.trim();
        sectors.iter().any(|s| s.eq_ignore_ascii_case(own))
    }

    pub fn validate(&self) -> Result<(), RiskGateError> {
        if self.symbol.trim().is_empty() {
            return Err(RiskGateError::invalid_input("order.symbol", "must not be empty"));
        }
        ensure_positive("order.quantity", self.quantity)?;
        ensure_positive("order.price", self.price)?;
        ensure_non_negative("order.volatility", self.volatility)?;
        Ok(())
    }
}
