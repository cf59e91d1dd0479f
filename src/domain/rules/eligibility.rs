//! Trader eligibility rules.

use super::money;
use crate::domain::decision::GroupKind;
use crate::domain::limits::EligibilityLimits;
use crate::domain::rule::{Rule, Scope, Verdict};
use crate::domain::rule_eval::RuleGroup;
use crate::domain::trader::{RiskTolerance, TraderProfile};

pub enum EligibilityScope {}

impl Scope for EligibilityScope {
    const GROUP: GroupKind = GroupKind::Eligibility;
    type Input<'a> = TraderProfile;
}

pub struct MinExperience {
    pub min_years: u32,
}

impl Rule<EligibilityScope> for MinExperience {
    fn name(&self) -> &'static str {
        "min_experience"
    }

    fn check(&self, trader: &TraderProfile) -> Verdict {
        if trader.experience_years < self.min_years {
            return Verdict::reject(format!(
                "insufficient experience: {} years, minimum {}",
                trader.experience_years, self.min_years
            ));
        }
        Verdict::pass()
    }
}

pub struct MinAccountBalance {
    pub min_balance: f64,
}

impl Rule<EligibilityScope> for MinAccountBalance {
    fn name(&self) -> &'static str {
        "min_account_balance"
    }

    fn check(&self, trader: &TraderProfile) -> Verdict {
        if trader.account_balance < self.min_balance {
            return Verdict::reject(format!(
                "insufficient balance: {} below minimum {}",
                money(trader.account_balance),
                money(self.min_balance)
            ));
        }
        Verdict::pass()
    }
}

pub struct RestrictedJurisdiction {
    pub jurisdictions: Vec<String>,
}

impl Rule<EligibilityScope> for RestrictedJurisdiction {
    fn name(&self) -> &'static str {
        "restricted_jurisdiction"
    }

    fn check(&self, trader: &TraderProfile) -> Verdict {
        if trader.in_jurisdiction(&self.jurisdictions) {
            return Verdict::reject(format!(
                "trader from restricted jurisdiction {}",
                trader.jurisdiction
            ));
        }
        Verdict::pass()
    }
}

/// HIGH risk tolerance requires accredited-investor status.
pub struct HighRiskAccreditation;

impl Rule<EligibilityScope> for HighRiskAccreditation {
    fn name(&self) -> &'static str {
        "high_risk_accreditation"
    }

    fn check(&self, trader: &TraderProfile) -> Verdict {
        if trader.risk_tolerance == RiskTolerance::High && !trader.accredited {
            return Verdict::reject("high-risk trading requires accreditation");
        }
        Verdict::pass()
    }
}

pub struct PatternDayTrader {
    pub min_balance: f64,
}

impl Rule<EligibilityScope> for PatternDayTrader {
    fn name(&self) -> &'static str {
        "pattern_day_trader"
    }

    fn check(&self, trader: &TraderProfile) -> Verdict {
        if trader.is_retail() && trader.account_balance < self.min_balance {
            return Verdict::warn("pattern-day-trader restrictions apply");
        }
        Verdict::pass()
    }
}

pub fn group(limits: &EligibilityLimits) -> RuleGroup<EligibilityScope> {
    RuleGroup::new()
        .with_rule(MinExperience {
            min_years: limits.min_experience_years,
        })
        .with_rule(MinAccountBalance {
            min_balance: limits.min_account_balance,
        })
        .with_rule(RestrictedJurisdiction {
            jurisdictions: limits.restricted_jurisdictions.clone(),
        })
        .with_rule(HighRiskAccreditation)
        .with_rule(PatternDayTrader {
            min_balance: limits.pdt_min_balance,
        })
}
