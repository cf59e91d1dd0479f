//! Client suitability for a product class.

use crate::domain::decision::GroupKind;
use crate::domain::limits::SuitabilityLimits;
use crate::domain::product::ProductType;
use crate::domain::rule::{Rule, Scope, Verdict};
use crate::domain::rule_eval::RuleGroup;
use crate::domain::trader::{TraderCategory, TraderProfile};

pub enum SuitabilityScope {}

impl Scope for SuitabilityScope {
    const GROUP: GroupKind = GroupKind::Suitability;
    type Input<'a> = SuitabilityCheck<'a>;
}

#[derive(Debug, Clone, Copy)]
pub struct SuitabilityCheck<'a> {
    pub trader: &'a TraderProfile,
    pub product: &'a ProductType,
}

/// Derivatives and structured products need accreditation for retail clients.
pub struct ComplexProductAccreditation;

impl Rule<SuitabilityScope> for ComplexProductAccreditation {
    fn name(&self) -> &'static str {
        "complex_product_accreditation"
    }

    fn check(&self, input: &SuitabilityCheck<'_>) -> Verdict {
        if input.product.is_complex() && input.trader.is_retail() && !input.trader.accredited {
            return Verdict::reject(format!(
                "{} not suitable for non-accredited retail client",
                input.product
            ));
        }
        Verdict::pass()
    }
}

pub struct HftProprietaryOnly;

impl Rule<SuitabilityScope> for HftProprietaryOnly {
    fn name(&self) -> &'static str {
        "hft_proprietary_only"
    }

    fn check(&self, input: &SuitabilityCheck<'_>) -> Verdict {
        if *input.product == ProductType::HftAlgorithms
            && input.trader.category != TraderCategory::Proprietary
        {
            return Verdict::reject("HFT algorithms restricted to proprietary traders");
        }
        Verdict::pass()
    }
}

pub struct InternationalExperience {
    pub min_years: u32,
}

impl Rule<SuitabilityScope> for InternationalExperience {
    fn name(&self) -> &'static str {
        "international_experience"
    }

    fn check(&self, input: &SuitabilityCheck<'_>) -> Verdict {
        if *input.product == ProductType::InternationalEquities
            && input.trader.experience_years < self.min_years
        {
            return Verdict::reject(format!(
                "international equities require {} years experience, trader has {}",
                self.min_years, input.trader.experience_years
            ));
        }
        Verdict::pass()
    }
}

pub struct CryptoJurisdiction {
    pub jurisdictions: Vec<String>,
}

impl Rule<SuitabilityScope> for CryptoJurisdiction {
    fn name(&self) -> &'static str {
        "crypto_jurisdiction"
    }

    fn check(&self, input: &SuitabilityCheck<'_>) -> Verdict {
        if *input.product == ProductType::Cryptocurrency
            && input.trader.in_jurisdiction(&self.jurisdictions)
        {
            return Verdict::reject(format!(
                "cryptocurrency trading not permitted in {}",
                input.trader.jurisdiction
            ));
        }
        Verdict::pass()
    }
}

pub fn group(limits: &SuitabilityLimits) -> RuleGroup<SuitabilityScope> {
    RuleGroup::new()
        .with_rule(ComplexProductAccreditation)
        .with_rule(HftProprietaryOnly)
        .with_rule(InternationalExperience {
            min_years: limits.international_min_experience,
        })
        .with_rule(CryptoJurisdiction {
            jurisdictions: limits.crypto_restricted_jurisdictions.clone(),
        })
}
