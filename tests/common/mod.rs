#![allow(dead_code)]

use chrono::NaiveDate;
use riskgate::domain::counters::DailyCounters;
use riskgate::domain::error::RiskGateError;
use riskgate::domain::order::{OrderId, OrderType, Side, TimeInForce, TradeOrder};
use riskgate::domain::position::{PortfolioPosition, RiskCategory};
use riskgate::domain::trader::{RiskTolerance, TraderCategory, TraderId, TraderProfile};
use riskgate::ports::position_port::PositionPort;
use std::collections::HashMap;
use std::io::Write;

pub struct MockPositionPort {
    pub positions: HashMap<TraderId, Vec<PortfolioPosition>>,
    pub errors: HashMap<TraderId, String>,
}

impl MockPositionPort {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_positions(mut self, trader: TraderId, positions: Vec<PortfolioPosition>) -> Self {
        self.positions.insert(trader, positions);
        self
    }

    pub fn with_error(mut self, trader: TraderId, reason: &str) -> Self {
        self.errors.insert(trader, reason.to_string());
        self
    }
}

impl PositionPort for MockPositionPort {
    fn load_positions(&self, trader: TraderId) -> Result<Vec<PortfolioPosition>, RiskGateError> {
        if let Some(reason) = self.errors.get(&trader) {
            return Err(RiskGateError::PositionData {
                reason: reason.clone(),
            });
        }
        Ok(self.positions.get(&trader).cloned().unwrap_or_default())
    }
}

/// The desk's reference trader: eligible, retail, medium tolerance.
pub fn sample_trader() -> TraderProfile {
    TraderProfile {
        id: TraderId(123),
        name: "John Trader".into(),
        experience_years: 5,
        risk_tolerance: RiskTolerance::Medium,
        account_balance: 250_000.0,
        available_margin: 100_000.0,
        category: TraderCategory::Retail,
        accredited: true,
        jurisdiction: "US".into(),
    }
}

pub fn sample_order() -> TradeOrder {
    TradeOrder {
        id: OrderId(1001),
        symbol: "AAPL".into(),
        side: Side::Buy,
        order_type: OrderType::Limit,
        quantity: 1000.0,
        price: 150.0,
        time_in_force: TimeInForce::Day,
        margin: false,
        sector: "TECHNOLOGY".into(),
        volatility: 0.3,
    }
}

pub fn make_position(symbol: &str, value: f64, pnl: f64, category: RiskCategory) -> PortfolioPosition {
    PortfolioPosition {
        symbol: symbol.into(),
        current_value: value,
        unrealized_pnl: pnl,
        sector_exposure: 0.15,
        risk_category: category,
    }
}

pub fn sample_positions() -> Vec<PortfolioPosition> {
    vec![
        make_position("AAPL", 500_000.0, -25_000.0, RiskCategory::MediumRisk),
        make_position("TSLA", 300_000.0, 15_000.0, RiskCategory::HighRisk),
        make_position("MSFT", 400_000.0, 10_000.0, RiskCategory::LowRisk),
        make_position("JNJ", 350_000.0, 5_000.0, RiskCategory::LowRisk),
        make_position("XOM", 300_000.0, -2_000.0, RiskCategory::MediumRisk),
    ]
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn counters() -> DailyCounters {
    DailyCounters::new(date(2024, 1, 15))
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
