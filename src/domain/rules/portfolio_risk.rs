//! Portfolio risk rules.
//!
//! Aggregates are computed once into a [`PortfolioSummary`] before the rules
//! run. Leverage and margin ratios are skipped for a zero-value portfolio.

use super::money;
use crate::domain::decision::{GroupKind, Severity};
use crate::domain::limits::PortfolioLimits;
use crate::domain::position::{PortfolioPosition, PortfolioSummary};
use crate::domain::rule::{Rule, Scope, Verdict};
use crate::domain::rule_eval::RuleGroup;
use crate::domain::trader::TraderProfile;

pub enum PortfolioScope {}

impl Scope for PortfolioScope {
    const GROUP: GroupKind = GroupKind::PortfolioRisk;
    type Input<'a> = PortfolioCheck<'a>;
}

#[derive(Debug, Clone, Copy)]
pub struct PortfolioCheck<'a> {
    pub positions: &'a [PortfolioPosition],
    pub trader: &'a TraderProfile,
    pub summary: PortfolioSummary,
}

impl<'a> PortfolioCheck<'a> {
    pub fn new(positions: &'a [PortfolioPosition], trader: &'a TraderProfile) -> Self {
        Self {
            positions,
            trader,
            summary: PortfolioSummary::from_positions(positions),
        }
    }
}

pub struct UnrealizedLoss {
    pub max_ratio: f64,
}

impl Rule<PortfolioScope> for UnrealizedLoss {
    fn name(&self) -> &'static str {
        "unrealized_loss"
    }

    fn check(&self, input: &PortfolioCheck<'_>) -> Verdict {
        let limit = input.trader.account_balance * self.max_ratio;
        if input.summary.total_unrealized_loss > limit {
            return Verdict::warn(format!(
                "portfolio losses {} exceed {:.0}% of account balance",
                money(input.summary.total_unrealized_loss),
                self.max_ratio * 100.0
            ));
        }
        Verdict::pass()
    }
}

/// Per position, in portfolio order: hard size cap, then single-position
/// concentration. A position over the cap ends the scan.
pub struct PositionLimits {
    pub max_value: f64,
    pub max_concentration: f64,
}

impl Rule<PortfolioScope> for PositionLimits {
    fn name(&self) -> &'static str {
        "position_limits"
    }

    fn check(&self, input: &PortfolioCheck<'_>) -> Verdict {
        let concentration_limit = input.summary.total_value * self.max_concentration;
        let mut verdict = Verdict::pass();

        for p in input.positions {
            if p.current_value > self.max_value {
                return verdict.with(
                    Severity::Violation,
                    format!(
                        "position {} size {} exceeds maximum {}",
                        p.symbol,
                        money(p.current_value),
                        money(self.max_value)
                    ),
                );
            }
            if p.current_value > concentration_limit {
                verdict = verdict.with(
                    Severity::Warning,
                    format!(
                        "position {} exceeds {:.0}% of portfolio",
                        p.symbol,
                        self.max_concentration * 100.0
                    ),
                );
            }
        }
        verdict
    }
}

pub struct SectorExposure {
    pub max_exposure: f64,
}

impl Rule<PortfolioScope> for SectorExposure {
    fn name(&self) -> &'static str {
        "sector_exposure"
    }

    fn check(&self, input: &PortfolioCheck<'_>) -> Verdict {
        input
            .positions
            .iter()
            .filter(|p| p.sector_exposure > self.max_exposure)
            .fold(Verdict::pass(), |v, p| {
                v.with(
                    Severity::Warning,
                    format!(
                        "position {} sector exposure {:.0}% exceeds {:.0}%",
                        p.symbol,
                        p.sector_exposure * 100.0,
                        self.max_exposure * 100.0
                    ),
                )
            })
    }
}

pub struct HighRiskExposure {
    pub max_ratio: f64,
}

impl Rule<PortfolioScope> for HighRiskExposure {
    fn name(&self) -> &'static str {
        "high_risk_exposure"
    }

    fn check(&self, input: &PortfolioCheck<'_>) -> Verdict {
        let s = &input.summary;
        if s.high_risk_exposure > s.total_value * self.max_ratio {
            return Verdict::violation(format!(
                "high-risk exposure {} exceeds {:.0}% of portfolio",
                money(s.high_risk_exposure),
                self.max_ratio * 100.0
            ));
        }
        Verdict::pass()
    }
}

pub struct MaxLeverage {
    pub max_ratio: f64,
}

impl Rule<PortfolioScope> for MaxLeverage {
    fn name(&self) -> &'static str {
        "max_leverage"
    }

    fn check(&self, input: &PortfolioCheck<'_>) -> Verdict {
        match input.summary.leverage_ratio(input.trader.account_balance) {
            Some(ratio) if ratio > self.max_ratio => Verdict::violation(format!(
                "leverage ratio {ratio:.2} exceeds maximum {:.2}",
                self.max_ratio
            )),
            _ => Verdict::pass(),
        }
    }
}

pub struct MarginCall {
    pub min_ratio: f64,
}

impl Rule<PortfolioScope> for MarginCall {
    fn name(&self) -> &'static str {
        "margin_call"
    }

    fn check(&self, input: &PortfolioCheck<'_>) -> Verdict {
        match input.summary.margin_equity_ratio(input.trader.account_balance) {
            Some(ratio) if ratio < self.min_ratio => Verdict::warn(format!(
                "margin call: equity ratio {ratio:.3} below maintenance {:.2}",
                self.min_ratio
            )),
            _ => Verdict::pass(),
        }
    }
}

pub struct ForcedLiquidation {
    pub min_ratio: f64,
}

impl Rule<PortfolioScope> for ForcedLiquidation {
    fn name(&self) -> &'static str {
        "forced_liquidation"
    }

    fn check(&self, input: &PortfolioCheck<'_>) -> Verdict {
        match input.summary.margin_equity_ratio(input.trader.account_balance) {
            Some(ratio) if ratio < self.min_ratio => Verdict::reject(format!(
                "forced liquidation: equity ratio {ratio:.3} below {:.2}",
                self.min_ratio
            )),
            _ => Verdict::pass(),
        }
    }
}

pub fn group(limits: &PortfolioLimits) -> RuleGroup<PortfolioScope> {
    RuleGroup::new()
        .with_rule(UnrealizedLoss {
            max_ratio: limits.max_unrealized_loss_ratio,
        })
        .with_rule(PositionLimits {
            max_value: limits.max_position_value,
            max_concentration: limits.max_position_concentration,
        })
        .with_rule(SectorExposure {
            max_exposure: limits.max_sector_exposure,
        })
        .with_rule(HighRiskExposure {
            max_ratio: limits.max_high_risk_ratio,
        })
        .with_rule(MaxLeverage {
            max_ratio: limits.max_leverage,
        })
        .with_rule(MarginCall {
            min_ratio: limits.margin_call_ratio,
        })
        .with_rule(ForcedLiquidation {
            min_ratio: limits.forced_liquidation_ratio,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::Decision;
    use crate::domain::position::RiskCategory;
    use crate::domain::trader::{RiskTolerance, TraderCategory, TraderId};

    fn trader(balance: f64) -> TraderProfile {
        TraderProfile {
            id: TraderId(7),
            name: "Desk Seven".into(),
            experience_years: 10,
            risk_tolerance: RiskTolerance::Medium,
            account_balance: balance,
            available_margin: 0.0,
            category: TraderCategory::Institutional,
            accredited: true,
            jurisdiction: "US".into(),
        }
    }

    fn pos(symbol: &str, value: f64) -> PortfolioPosition {
        PortfolioPosition {
            symbol: symbol.into(),
            current_value: value,
            unrealized_pnl: 0.0,
            sector_exposure: 0.1,
            risk_category: RiskCategory::LowRisk,
        }
    }

    /// Five equal positions: no concentration warnings.
    fn balanced(each: f64) -> Vec<PortfolioPosition> {
        ["A", "B", "C", "D", "E"].iter().map(|s| pos(s, each)).collect()
    }

    fn evaluate(positions: &[PortfolioPosition], balance: f64) -> Decision {
        let t = trader(balance);
        group(&PortfolioLimits::default()).evaluate(&PortfolioCheck::new(positions, &t))
    }

    fn rules(d: &Decision) -> Vec<&'static str> {
        d.messages().iter().map(|m| m.rule).collect()
    }

    #[test]
    fn healthy_portfolio_approved() {
        let d = evaluate(&balanced(100_000.0), 1_000_000.0);
        assert!(d.is_approved());
        assert!(d.messages().is_empty());
    }

    #[test]
    fn unrealized_loss_warns() {
        let mut positions = balanced(100_000.0);
        positions[0].unrealized_pnl = -150_000.0;
        positions[1].unrealized_pnl = 500_000.0;
        let d = evaluate(&positions, 500_000.0);
        assert!(d.is_approved());
        assert_eq!(rules(&d), vec!["unrealized_loss"]);
    }

    #[test]
    fn oversized_position_is_violation() {
        let positions = vec![
            pos("A", 1_000_000.0),
            pos("B", 10_000_001.0),
            pos("C", 1_000_000.0),
        ];
        let d = evaluate(&positions, 10_000_000.0);
        assert!(d.is_rejected());
        let last = d.messages().last().unwrap();
        assert_eq!(last.severity, Severity::Violation);
        assert_eq!(last.rule, "position_limits");
        assert!(last.text.contains("B"));
    }

    #[test]
    fn concentration_warning_before_cap_violation_is_kept() {
        let positions = vec![pos("BIG", 9_000_000.0), pos("HUGE", 12_000_000.0)];
        let d = evaluate(&positions, 10_000_000.0);
        let severities: Vec<_> = d.messages().iter().map(|m| m.severity).collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Violation]);
    }

    #[test]
    fn concentration_warns_per_position() {
        let positions = vec![pos("A", 50_000.0), pos("B", 30_000.0), pos("C", 20_000.0)];
        let d = evaluate(&positions, 1_000_000.0);
        assert!(d.is_approved());
        // A is 50% and B is 30%; C sits exactly on 20%.
        assert_eq!(d.warnings().count(), 2);
    }

    #[test]
    fn sector_exposure_warns() {
        let mut positions = balanced(100_000.0);
        positions[2].sector_exposure = 0.45;
        let d = evaluate(&positions, 1_000_000.0);
        assert!(d.is_approved());
        assert_eq!(rules(&d), vec!["sector_exposure"]);
    }

    #[test]
    fn high_risk_exposure_violation() {
        let mut positions = balanced(100_000.0);
        for p in positions.iter_mut().take(4) {
            p.risk_category = RiskCategory::HighRisk;
        }
        let d = evaluate(&positions, 1_000_000.0);
        assert!(d.is_rejected());
        assert_eq!(d.rejection().unwrap().rule, "high_risk_exposure");
    }

    #[test]
    fn high_risk_at_threshold_passes() {
        let positions = vec![
            PortfolioPosition {
                risk_category: RiskCategory::HighRisk,
                ..pos("A", 75.0)
            },
            pos("B", 25.0),
        ];
        let d = evaluate(&positions, 1_000.0);
        assert!(!d.has_rule("high_risk_exposure"));
    }

    #[test]
    fn leverage_over_ten_is_violation() {
        let d = evaluate(&balanced(220_000.0), 100_000.0);
        assert!(d.is_rejected());
        assert_eq!(d.rejection().unwrap().rule, "max_leverage");
    }

    #[test]
    fn margin_call_warns_without_rejecting() {
        // Equity ratio 0.2: below 0.25, above 0.10.
        let d = evaluate(&balanced(100_000.0), 100_000.0);
        assert!(d.is_approved());
        assert_eq!(rules(&d), vec!["margin_call"]);
    }

    #[test]
    fn forced_liquidation_emits_both_messages() {
        // Equity ratio 0.0952, leverage 10.5 would trip first, so allow more leverage.
        let limits = PortfolioLimits {
            max_leverage: 20.0,
            ..PortfolioLimits::default()
        };
        let positions = balanced(210_000.0);
        let t = trader(100_000.0);
        let d = group(&limits).evaluate(&PortfolioCheck::new(&positions, &t));
        assert!(d.is_rejected());
        assert_eq!(rules(&d), vec!["margin_call", "forced_liquidation"]);
        assert_eq!(d.messages()[1].severity, Severity::Rejected);
    }

    #[test]
    fn empty_portfolio_skips_ratio_checks() {
        let d = evaluate(&[], 100_000.0);
        assert!(d.is_approved());
        assert!(d.messages().is_empty());
    }

    #[test]
    fn zero_value_positions_skip_ratio_checks_but_run_others() {
        let positions = vec![
            PortfolioPosition {
                unrealized_pnl: -40_000.0,
                sector_exposure: 0.5,
                ..pos("A", 0.0)
            },
            pos("B", 0.0),
        ];
        let d = evaluate(&positions, 100_000.0);
        assert!(d.is_approved());
        assert_eq!(rules(&d), vec!["unrealized_loss", "sector_exposure"]);
    }

    #[test]
    fn zero_balance_with_positions_rejects_on_leverage() {
        let d = evaluate(&balanced(1_000.0), 0.0);
        assert!(d.is_rejected());
        assert_eq!(d.rejection().unwrap().rule, "max_leverage");
    }
}
