//! Order validation rules.
//!
//! Checks run in a fixed order and the first rejection ends the group. The
//! sector note is informational; concentration itself is enforced by the
//! portfolio rules.

use super::money;
use crate::domain::decision::GroupKind;
use crate::domain::limits::OrderLimits;
use crate::domain::order::{Side, TimeInForce, TradeOrder};
use crate::domain::rule::{Rule, Scope, Verdict};
use crate::domain::rule_eval::RuleGroup;
use crate::domain::trader::{RiskTolerance, TraderProfile};

pub enum OrderScope {}

impl Scope for OrderScope {
    const GROUP: GroupKind = GroupKind::OrderValidation;
    type Input<'a> = OrderCheck<'a>;
}

#[derive(Debug, Clone, Copy)]
pub struct OrderCheck<'a> {
    pub order: &'a TradeOrder,
    pub trader: &'a TraderProfile,
    /// Trades already executed today by this trader.
    pub trades_today: u32,
}

pub struct MaxOrderValue {
    pub max_value: f64,
}

impl Rule<OrderScope> for MaxOrderValue {
    fn name(&self) -> &'static str {
        "max_order_value"
    }

    fn check(&self, input: &OrderCheck<'_>) -> Verdict {
        let value = input.order.order_value();
        if value > self.max_value {
            return Verdict::reject(format!(
                "order size {} exceeds maximum {}",
                money(value),
                money(self.max_value)
            ));
        }
        Verdict::pass()
    }
}

pub struct VolatilityTolerance {
    pub max_volatility: f64,
}

impl Rule<OrderScope> for VolatilityTolerance {
    fn name(&self) -> &'static str {
        "volatility_tolerance"
    }

    fn check(&self, input: &OrderCheck<'_>) -> Verdict {
        if input.order.volatility > self.max_volatility
            && input.trader.risk_tolerance == RiskTolerance::Low
        {
            return Verdict::reject(format!(
                "volatility {:.2} not allowed for low-risk trader",
                input.order.volatility
            ));
        }
        Verdict::pass()
    }
}

pub struct RetailShortLimit {
    pub max_value: f64,
}

impl Rule<OrderScope> for RetailShortLimit {
    fn name(&self) -> &'static str {
        "retail_short_limit"
    }

    fn check(&self, input: &OrderCheck<'_>) -> Verdict {
        let value = input.order.order_value();
        if input.order.side == Side::Short && input.trader.is_retail() && value > self.max_value {
            return Verdict::reject(format!(
                "short position {} exceeds retail limit {}",
                money(value),
                money(self.max_value)
            ));
        }
        Verdict::pass()
    }
}

pub struct MarginCoverage {
    /// Fraction of order value that must be available as margin.
    pub requirement: f64,
}

impl Rule<OrderScope> for MarginCoverage {
    fn name(&self) -> &'static str {
        "margin_coverage"
    }

    fn check(&self, input: &OrderCheck<'_>) -> Verdict {
        if !input.order.margin {
            return Verdict::pass();
        }
        let required = input.order.order_value() * self.requirement;
        if input.trader.available_margin < required {
            return Verdict::reject(format!(
                "insufficient margin: {} available, {} required",
                money(input.trader.available_margin),
                money(required)
            ));
        }
        Verdict::pass()
    }
}

pub struct DailyTradeLimit {
    pub max_trades: u32,
}

impl Rule<OrderScope> for DailyTradeLimit {
    fn name(&self) -> &'static str {
        "daily_trade_limit"
    }

    fn check(&self, input: &OrderCheck<'_>) -> Verdict {
        if input.trades_today >= self.max_trades {
            return Verdict::reject(format!(
                "daily trade limit exceeded: {} of {} trades used",
                input.trades_today, self.max_trades
            ));
        }
        Verdict::pass()
    }
}

pub struct SectorConcentrationNote {
    pub diversified: String,
}

impl Rule<OrderScope> for SectorConcentrationNote {
    fn name(&self) -> &'static str {
        "sector_concentration_note"
    }

    fn check(&self, input: &OrderCheck<'_>) -> Verdict {
        if input.order.sector != self.diversified {
            return Verdict::info(format!(
                "checking sector concentration limits for {}",
                input.order.sector
            ));
        }
        Verdict::pass()
    }
}

pub struct ExtendedHoursExperience {
    pub min_years: u32,
}

impl Rule<OrderScope> for ExtendedHoursExperience {
    fn name(&self) -> &'static str {
        "extended_hours_experience"
    }

    fn check(&self, input: &OrderCheck<'_>) -> Verdict {
        if input.order.time_in_force == TimeInForce::ExtendedHours
            && input.trader.experience_years < self.min_years
        {
            return Verdict::reject(format!(
                "insufficient experience for after-hours trading: {} years, minimum {}",
                input.trader.experience_years, self.min_years
            ));
        }
        Verdict::pass()
    }
}

pub fn group(limits: &OrderLimits) -> RuleGroup<OrderScope> {
    RuleGroup::new()
        .with_rule(MaxOrderValue {
            max_value: limits.max_order_value,
        })
        .with_rule(VolatilityTolerance {
            max_volatility: limits.low_risk_max_volatility,
        })
        .with_rule(RetailShortLimit {
            max_value: limits.max_retail_short_value,
        })
        .with_rule(MarginCoverage {
            requirement: limits.margin_requirement,
        })
        .with_rule(DailyTradeLimit {
            max_trades: limits.max_trades_per_day,
        })
        .with_rule(SectorConcentrationNote {
            diversified: limits.diversified_sector.clone(),
        })
        .with_rule(ExtendedHoursExperience {
            min_years: limits.extended_hours_min_experience,
        })
}
