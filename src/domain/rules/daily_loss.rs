//! Daily loss limits, checked against the cumulative loss after a trade's
//! loss has been recorded.

use super::money;
use crate::domain::decision::GroupKind;
use crate::domain::limits::DailyLossLimits;
use crate::domain::rule::{Rule, Scope, Verdict};
use crate::domain::rule_eval::RuleGroup;
use crate::domain::trader::TraderId;

pub enum DailyLossScope {}

impl Scope for DailyLossScope {
    const GROUP: GroupKind = GroupKind::DailyLoss;
    type Input<'a> = LossCheck;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossCheck {
    pub trader: TraderId,
    /// Cumulative loss for the trading day, including the loss just recorded.
    pub cumulative_loss: f64,
}

pub struct MaxDailyLoss {
    pub max_loss: f64,
}

impl Rule<DailyLossScope> for MaxDailyLoss {
    fn name(&self) -> &'static str {
        "max_daily_loss"
    }

    fn check(&self, input: &LossCheck) -> Verdict {
        if input.cumulative_loss > self.max_loss {
            return Verdict::reject(format!(
                "daily loss limit exceeded for trader {}: {} over {}",
                input.trader,
                money(input.cumulative_loss),
                money(self.max_loss)
            ));
        }
        Verdict::pass()
    }
}

pub struct DailyLossWarning {
    pub max_loss: f64,
    pub warning_ratio: f64,
}

impl Rule<DailyLossScope> for DailyLossWarning {
    fn name(&self) -> &'static str {
        "daily_loss_warning"
    }

    fn check(&self, input: &LossCheck) -> Verdict {
        if input.cumulative_loss > self.max_loss * self.warning_ratio {
            return Verdict::warn(format!(
                "trader {} approaching daily loss limit: {} of {}",
                input.trader,
                money(input.cumulative_loss),
                money(self.max_loss)
            ));
        }
        Verdict::pass()
    }
}

pub fn group(limits: &DailyLossLimits) -> RuleGroup<DailyLossScope> {
    RuleGroup::new()
        .with_rule(MaxDailyLoss {
            max_loss: limits.max_daily_loss,
        })
        .with_rule(DailyLossWarning {
            max_loss: limits.max_daily_loss,
            warning_ratio: limits.warning_ratio,
        })
}
