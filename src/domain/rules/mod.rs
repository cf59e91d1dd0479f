//! Rule groups. Each module defines its scope, its rules, and a `group`
//! constructor wiring the rules in their evaluation order.

pub mod eligibility;
pub mod order_validation;
pub mod portfolio_risk;
pub mod market_conditions;
pub mod daily_loss;
pub mod suitability;
pub mod execution_venue;

pub use daily_loss::{DailyLossScope, LossCheck};
pub use eligibility::EligibilityScope;
pub use execution_venue::{ExecutionCheck, ExecutionScope};
pub use market_conditions::MarketScope;
pub use order_validation::{OrderCheck, OrderScope};
pub use portfolio_risk::{PortfolioCheck, PortfolioScope};
pub use suitability::{SuitabilityCheck, SuitabilityScope};

/// Formats a currency amount for rule messages.
pub(crate) fn money(amount: f64) -> String {
    format!("${amount:.2}")
}
