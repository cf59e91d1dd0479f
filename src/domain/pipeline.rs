//! Trade risk pipeline.
//!
//! [`RiskGate`] owns one rule group per concern, built once from a
//! [`RiskLimits`]. Every group is independently invocable. Inputs are
//! validated before any rule runs; a contract violation is an error, a rule
//! failure is a rejected [`Decision`].
//!
//! Counters are the only mutable state and are passed in explicitly, so one
//! gate can serve many counter stores (and many threads).

use crate::domain::counters::DailyCounters;
use crate::domain::decision::Decision;
use crate::domain::error::{ensure_finite, RiskGateError};
use crate::domain::limits::RiskLimits;
use crate::domain::market::{MarketSnapshot, MarketStatus};
use crate::domain::order::TradeOrder;
use crate::domain::position::PortfolioPosition;
use crate::domain::product::{ProductType, Venue};
use crate::domain::rule_eval::RuleGroup;
use crate::domain::rules::{
    self, DailyLossScope, EligibilityScope, ExecutionCheck, ExecutionScope, LossCheck,
    MarketScope, OrderCheck, OrderScope, PortfolioCheck, PortfolioScope, SuitabilityCheck,
    SuitabilityScope,
};
use crate::domain::scorer::{RiskScore, RiskScorer};
use crate::domain::trader::{TraderId, TraderProfile};

/// Everything known about a proposed trade. Optional snapshots select which
/// groups run in [`RiskGate::evaluate_request`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeRequest {
    pub trader: TraderProfile,
    pub order: TradeOrder,
    pub positions: Option<Vec<PortfolioPosition>>,
    pub market: Option<MarketSnapshot>,
    pub product: Option<ProductType>,
    pub venue: Option<Venue>,
}

impl TradeRequest {
    pub fn new(trader: TraderProfile, order: TradeOrder) -> Self {
        Self {
            trader,
            order,
            positions: None,
            market: None,
            product: None,
            venue: None,
        }
    }

    pub fn with_positions(mut self, positions: Vec<PortfolioPosition>) -> Self {
        self.positions = Some(positions);
        self
    }

    pub fn with_market(mut self, market: MarketSnapshot) -> Self {
        self.market = Some(market);
        self
    }

    pub fn with_product(mut self, product: ProductType) -> Self {
        self.product = Some(product);
        self
    }

    pub fn with_venue(mut self, venue: Venue) -> Self {
        self.venue = Some(venue);
        self
    }
}

pub struct RiskGate {
    limits: RiskLimits,
    eligibility: RuleGroup<EligibilityScope>,
    order: RuleGroup<OrderScope>,
    portfolio: RuleGroup<PortfolioScope>,
    market: RuleGroup<MarketScope>,
    daily_loss: RuleGroup<DailyLossScope>,
    suitability: RuleGroup<SuitabilityScope>,
    execution: RuleGroup<ExecutionScope>,
    scorer: RiskScorer,
}

impl RiskGate {
    pub fn new(limits: RiskLimits) -> Self {
        Self {
            eligibility: rules::eligibility::group(&limits.eligibility),
            order: rules::order_validation::group(&limits.order),
            portfolio: rules::portfolio_risk::group(&limits.portfolio),
            market: rules::market_conditions::group(&limits.market),
            daily_loss: rules::daily_loss::group(&limits.daily_loss),
            suitability: rules::suitability::group(&limits.suitability),
            execution: rules::execution_venue::group(&limits.execution),
            scorer: RiskScorer::new(limits.scoring.clone()),
            limits,
        }
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    pub fn evaluate_eligibility(&self, trader: &TraderProfile) -> Result<Decision, RiskGateError> {
        trader.validate()?;
        Ok(self.eligibility.evaluate(trader))
    }

    /// Reads, but never updates, the trader's trade count.
    pub fn evaluate_order(
        &self,
        order: &TradeOrder,
        trader: &TraderProfile,
        counters: &DailyCounters,
    ) -> Result<Decision, RiskGateError> {
        order.validate()?;
        trader.validate()?;
        Ok(self.order.evaluate(&OrderCheck {
            order,
            trader,
            trades_today: counters.trades_today(trader.id),
        }))
    }

    pub fn evaluate_portfolio(
        &self,
        positions: &[PortfolioPosition],
        trader: &TraderProfile,
    ) -> Result<Decision, RiskGateError> {
        trader.validate()?;
        for p in positions {
            p.validate()?;
        }
        Ok(self.portfolio.evaluate(&PortfolioCheck::new(positions, trader)))
    }

    pub fn evaluate_market(
        &self,
        vix_index: f64,
        status: MarketStatus,
    ) -> Result<Decision, RiskGateError> {
        self.evaluate_market_snapshot(&MarketSnapshot::new(vix_index, status))
    }

    pub fn evaluate_market_snapshot(
        &self,
        market: &MarketSnapshot,
    ) -> Result<Decision, RiskGateError> {
        market.validate()?;
        Ok(self.market.evaluate(market))
    }

    /// Adds `loss` to the trader's cumulative loss for the day, then checks
    /// the new total. The loss stays recorded even when the result rejects.
    /// Negative losses (gains) reduce the total.
    pub fn record_trade_loss(
        &self,
        trader: TraderId,
        loss: f64,
        counters: &DailyCounters,
    ) -> Result<Decision, RiskGateError> {
        ensure_finite("loss_amount", loss)?;
        let cumulative_loss = counters.add_loss(trader, loss);
        let decision = self.daily_loss.evaluate(&LossCheck {
            trader,
            cumulative_loss,
        });
        if decision.is_rejected() {
            tracing::warn!(%trader, cumulative_loss, "daily loss limit tripped");
        }
        Ok(decision)
    }

    /// Checks the trader's cumulative loss for the day as it stands, without
    /// recording anything.
    pub fn evaluate_daily_loss(&self, trader: TraderId, counters: &DailyCounters) -> Decision {
        self.daily_loss.evaluate(&LossCheck {
            trader,
            cumulative_loss: counters.loss_today(trader),
        })
    }

    /// Counts an executed trade against the trader's daily limit.
    pub fn record_trade(&self, trader: TraderId, counters: &DailyCounters) -> u32 {
        let trades = counters.record_trade(trader);
        tracing::debug!(%trader, trades, "trade recorded");
        trades
    }

    pub fn evaluate_suitability(
        &self,
        trader: &TraderProfile,
        product: &ProductType,
    ) -> Result<Decision, RiskGateError> {
        trader.validate()?;
        Ok(self.suitability.evaluate(&SuitabilityCheck { trader, product }))
    }

    pub fn evaluate_execution(
        &self,
        order: &TradeOrder,
        venue: &Venue,
    ) -> Result<Decision, RiskGateError> {
        order.validate()?;
        Ok(self.execution.evaluate(&ExecutionCheck { order, venue }))
    }

    pub fn risk_score(
        &self,
        trader: &TraderProfile,
        order: &TradeOrder,
    ) -> Result<f64, RiskGateError> {
        Ok(self.risk_breakdown(trader, order)?.total())
    }

    pub fn risk_breakdown(
        &self,
        trader: &TraderProfile,
        order: &TradeOrder,
    ) -> Result<RiskScore, RiskGateError> {
        trader.validate()?;
        order.validate()?;
        Ok(self.scorer.breakdown(trader, order))
    }

    /// Eligibility then order validation, stopping after the first group
    /// that rejects.
    pub fn evaluate_trade(
        &self,
        trader: &TraderProfile,
        order: &TradeOrder,
        counters: &DailyCounters,
    ) -> Result<Decision, RiskGateError> {
        let mut decision = self.evaluate_eligibility(trader)?;
        if decision.is_approved() {
            decision.merge(self.evaluate_order(order, trader, counters)?);
        }
        tracing::info!(
            trader = %trader.id,
            order = %order.id,
            outcome = %decision.outcome(),
            "trade evaluated"
        );
        Ok(decision)
    }

    /// Every group the request has a snapshot for, in pipeline order:
    /// eligibility, order, daily loss, portfolio, market, suitability,
    /// execution. Stops after the first group that rejects. Counters are read
    /// only; the daily-loss check sees the loss already recorded today.
    pub fn evaluate_request(
        &self,
        request: &TradeRequest,
        counters: &DailyCounters,
    ) -> Result<Decision, RiskGateError> {
        let trader = &request.trader;
        let order = &request.order;

        // Validate the whole request up front so a bad late snapshot is an
        // error even when an earlier group would have rejected.
        trader.validate()?;
        order.validate()?;
        if let Some(positions) = &request.positions {
            for p in positions {
                p.validate()?;
            }
        }
        if let Some(market) = &request.market {
            market.validate()?;
        }

        let mut decision = self.eligibility.evaluate(trader);
        if decision.is_approved() {
            decision.merge(self.order.evaluate(&OrderCheck {
                order,
                trader,
                trades_today: counters.trades_today(trader.id),
            }));
        }
        if decision.is_approved() {
            decision.merge(self.evaluate_daily_loss(trader.id, counters));
        }
        if decision.is_approved() {
            if let Some(positions) = request.positions.as_deref() {
                decision.merge(self.portfolio.evaluate(&PortfolioCheck::new(positions, trader)));
            }
        }
        if decision.is_approved() {
            if let Some(market) = &request.market {
                decision.merge(self.market.evaluate(market));
            }
        }
        if decision.is_approved() {
            if let Some(product) = &request.product {
                decision.merge(self.suitability.evaluate(&SuitabilityCheck { trader, product }));
            }
        }
        if decision.is_approved() {
            if let Some(venue) = &request.venue {
                decision.merge(self.execution.evaluate(&ExecutionCheck { order, venue }));
            }
        }

        tracing::info!(
            trader = %trader.id,
            order = %order.id,
            outcome = %decision.outcome(),
            messages = decision.messages().len(),
            "request evaluated"
        );
        Ok(decision)
    }
}

impl Default for RiskGate {
    fn default() -> Self {
        Self::new(RiskLimits::default())
    }
}
