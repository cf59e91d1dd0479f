//! Market-wide trading conditions.

use crate::domain::decision::GroupKind;
use crate::domain::limits::MarketLimits;
use crate::domain::market::{MarketSnapshot, MarketStatus};
use crate::domain::rule::{Rule, Scope, Verdict};
use crate::domain::rule_eval::RuleGroup;

pub enum MarketScope {}

impl Scope for MarketScope {
    const GROUP: GroupKind = GroupKind::MarketConditions;
    type Input<'a> = MarketSnapshot;
}

pub struct VolatilityHalt {
    pub threshold: f64,
}

impl Rule<MarketScope> for VolatilityHalt {
    fn name(&self) -> &'static str {
        "volatility_halt"
    }

    fn check(&self, market: &MarketSnapshot) -> Verdict {
        if market.volatility_index > self.threshold {
            return Verdict::reject(format!(
                "trading halt: volatility index {:.2} above {:.2}",
                market.volatility_index, self.threshold
            ));
        }
        Verdict::pass()
    }
}

pub struct MarketSession;

impl Rule<MarketScope> for MarketSession {
    fn name(&self) -> &'static str {
        "market_session"
    }

    fn check(&self, market: &MarketSnapshot) -> Verdict {
        match market.status {
            MarketStatus::Closed => Verdict::reject("market closed"),
            MarketStatus::PreMarket => Verdict::warn("pre-market trading: reduced liquidity"),
            MarketStatus::Open => Verdict::pass(),
        }
    }
}

pub fn group(limits: &MarketLimits) -> RuleGroup<MarketScope> {
    RuleGroup::new()
        .with_rule(VolatilityHalt {
            threshold: limits.vix_halt_threshold,
        })
        .with_rule(MarketSession)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::{Decision, Severity};

    fn evaluate(vix: f64, status: MarketStatus) -> Decision {
        group(&MarketLimits::default()).evaluate(&MarketSnapshot::new(vix, status))
    }

    #[test]
    fn calm_open_market_approved() {
        let d = evaluate(18.5, MarketStatus::Open);
        assert!(d.is_approved());
        assert!(d.messages().is_empty());
    }

    #[test]
    fn vix_threshold_is_exclusive() {
        assert!(evaluate(40.0, MarketStatus::Open).is_approved());
        let d = evaluate(40.01, MarketStatus::Open);
        assert!(d.is_rejected());
        assert!(d.rejection().unwrap().text.starts_with("trading halt"));
    }

    #[test]
    fn halt_stops_before_session_check() {
        let d = evaluate(55.0, MarketStatus::Closed);
        assert_eq!(d.messages().len(), 1);
        assert_eq!(d.messages()[0].rule, "volatility_halt");
    }

    #[test]
    fn closed_market_rejected() {
        let d = evaluate(12.0, MarketStatus::Closed);
        assert!(d.is_rejected());
        assert_eq!(d.rejection().unwrap().rule, "market_session");
    }

    #[test]
    fn pre_market_warns() {
        let d = evaluate(12.0, MarketStatus::PreMarket);
        assert!(d.is_approved());
        assert_eq!(d.messages()[0].severity, Severity::Warning);
    }
}
