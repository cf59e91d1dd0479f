//! Portfolio snapshot source port trait.

use crate::domain::error::RiskGateError;
use crate::domain::position::PortfolioPosition;
use crate::domain::trader::TraderId;

/// Supplies a read-only snapshot of a trader's open positions.
pub trait PositionPort {
    fn load_positions(&self, trader: TraderId) -> Result<Vec<PortfolioPosition>, RiskGateError>;
}
