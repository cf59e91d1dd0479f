//! Informational risk score for a trader and order.
//!
//! The score is a sum of weighted factors and is unbounded. It never affects
//! a decision.

use crate::domain::limits::ScoringWeights;
use crate::domain::order::TradeOrder;
use crate::domain::trader::TraderProfile;
use std::fmt;

labelled_enum! {
    pub enum ScoreFactor("score factor") {
        JuniorExperience => "JUNIOR_EXPERIENCE",
        SmallAccount => "SMALL_ACCOUNT",
        LargeOrder => "LARGE_ORDER",
        Volatility => "VOLATILITY",
        RiskySector => "RISKY_SECTOR",
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RiskScore {
    /// Contributing factors in evaluation order. Zero contributions are omitted.
    pub factors: Vec<(ScoreFactor, f64)>,
}

impl RiskScore {
    pub fn total(&self) -> f64 {
        self.factors.iter().map(|(_, w)| w).sum()
    }

    pub fn contribution(&self, factor: ScoreFactor) -> f64 {
        self.factors
            .iter()
            .filter(|(f, _)| *f == factor)
            .map(|(_, w)| w)
            .sum()
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (factor, weight) in &self.factors {
            writeln!(f, "  {:<20} {:>8.3}", factor.as_str(), weight)?;
        }
        write!(f, "  {:<20} {:>8.3}", "TOTAL", self.total())
    }
}

#[derive(Debug, Clone)]
pub struct RiskScorer {
    weights: ScoringWeights,
}

impl RiskScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn breakdown(&self, trader: &TraderProfile, order: &TradeOrder) -> RiskScore {
        let w = &self.weights;
        let mut factors = Vec::new();

        if trader.experience_years < w.junior_experience_years {
            factors.push((ScoreFactor::JuniorExperience, w.junior_experience_weight));
        }
        if trader.account_balance < w.small_account_balance {
            factors.push((ScoreFactor::SmallAccount, w.small_account_weight));
        }
        if order.order_value() > trader.account_balance * w.large_order_ratio {
            factors.push((ScoreFactor::LargeOrder, w.large_order_weight));
        }
        let volatility = order.volatility * w.volatility_weight;
        if volatility != 0.0 {
            factors.push((ScoreFactor::Volatility, volatility));
        }
        if order.in_sector(&w.risky_sectors) {
            factors.push((ScoreFactor::RiskySector, w.risky_sector_weight));
        }

        RiskScore { factors }
    }

    pub fn score(&self, trader: &TraderProfile, order: &TradeOrder) -> f64 {
        self.breakdown(trader, order).total()
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderId, OrderType, Side, TimeInForce};
    use crate::domain::trader::{RiskTolerance, TraderCategory, TraderId};
    use approx::assert_relative_eq;

    fn trader() -> TraderProfile {
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

    fn order() -> TradeOrder {
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

    #[test]
    fn sample_score() {
        // 150k order on a 250k balance is large; volatility adds 0.15.
        let score = RiskScorer::default().breakdown(&trader(), &order());
        assert_eq!(
            score.factors.iter().map(|(f, _)| *f).collect::<Vec<_>>(),
            vec![ScoreFactor::LargeOrder, ScoreFactor::Volatility]
        );
        assert_relative_eq!(score.total(), 0.55);
    }

    #[test]
    fn every_factor_contributes() {
        let t = TraderProfile {
            experience_years: 1,
            account_balance: 60_000.0,
            ..trader()
        };
        let o = TradeOrder {
            sector: "biotech".into(),
            volatility: 1.2,
            ..order()
        };
        let score = RiskScorer::default().breakdown(&t, &o);
        assert_eq!(score.factors.len(), 5);
        assert_relative_eq!(score.total(), 0.3 + 0.2 + 0.4 + 0.6 + 0.3);
        assert_relative_eq!(score.contribution(ScoreFactor::RiskySector), 0.3);
    }

    #[test]
    fn zero_volatility_small_order_scores_zero() {
        let o = TradeOrder {
            quantity: 10.0,
            volatility: 0.0,
            ..order()
        };
        let score = RiskScorer::default().breakdown(&trader(), &o);
        assert!(score.factors.is_empty());
        assert_relative_eq!(score.total(), 0.0);
    }

    #[test]
    fn custom_weights() {
        let scorer = RiskScorer::new(ScoringWeights {
            volatility_weight: 2.0,
            large_order_weight: 0.0,
            ..ScoringWeights::default()
        });
        assert_relative_eq!(scorer.score(&trader(), &order()), 0.6);
    }

    #[test]
    fn display_ends_with_total() {
        let text = RiskScorer::default().breakdown(&trader(), &order()).to_string();
        assert!(text.lines().last().unwrap().contains("TOTAL"));
        assert!(text.contains("VOLATILITY"));
    }
}
