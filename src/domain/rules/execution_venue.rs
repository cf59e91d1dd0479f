//! Execution venue checks for a routed order.

use super::money;
use crate::domain::decision::GroupKind;
use crate::domain::limits::ExecutionLimits;
use crate::domain::order::{OrderType, TradeOrder};
use crate::domain::product::Venue;
use crate::domain::rule::{Rule, Scope, Verdict};
use crate::domain::rule_eval::RuleGroup;

pub enum ExecutionScope {}

impl Scope for ExecutionScope {
    const GROUP: GroupKind = GroupKind::ExecutionVenue;
    type Input<'a> = ExecutionCheck<'a>;
}

#[derive(Debug, Clone, Copy)]
pub struct ExecutionCheck<'a> {
    pub order: &'a TradeOrder,
    pub venue: &'a Venue,
}

/// Large orders should be routed to a block venue.
pub struct LargeOrderRouting {
    pub large_value: f64,
    pub block_venues: Vec<String>,
}

impl Rule<ExecutionScope> for LargeOrderRouting {
    fn name(&self) -> &'static str {
        "large_order_routing"
    }

    fn check(&self, input: &ExecutionCheck<'_>) -> Verdict {
        let value = input.order.order_value();
        if value > self.large_value && !input.venue.is_any_of(&self.block_venues) {
            return Verdict::warn(format!(
                "large order {} routed to {}; consider a block venue",
                money(value),
                input.venue
            ));
        }
        Verdict::pass()
    }
}

pub struct MarketImpact {
    pub max_quantity: f64,
}

impl Rule<ExecutionScope> for MarketImpact {
    fn name(&self) -> &'static str {
        "market_impact"
    }

    fn check(&self, input: &ExecutionCheck<'_>) -> Verdict {
        if input.order.order_type == OrderType::Market && input.order.quantity > self.max_quantity {
            return Verdict::warn(format!(
                "market order for {} shares may cause significant market impact",
                input.order.quantity
            ));
        }
        Verdict::pass()
    }
}

pub struct RetailVenueSize {
    pub venue: String,
    pub max_quantity: f64,
}

impl Rule<ExecutionScope> for RetailVenueSize {
    fn name(&self) -> &'static str {
        "retail_venue_size"
    }

    fn check(&self, input: &ExecutionCheck<'_>) -> Verdict {
        if input.venue.is(&self.venue) && input.order.quantity > self.max_quantity {
            return Verdict::reject("order too large for retail venue");
        }
        Verdict::pass()
    }
}

pub fn group(limits: &ExecutionLimits) -> RuleGroup<ExecutionScope> {
    RuleGroup::new()
        .with_rule(LargeOrderRouting {
            large_value: limits.large_order_value,
            block_venues: limits.block_venues.clone(),
        })
        .with_rule(MarketImpact {
            max_quantity: limits.market_impact_quantity,
        })
        .with_rule(RetailVenueSize {
            venue: limits.retail_venue.clone(),
            max_quantity: limits.max_retail_venue_quantity,
        })
}
