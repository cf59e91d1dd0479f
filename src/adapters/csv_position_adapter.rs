//! CSV portfolio snapshot adapter.
//!
//! Columns are located by header name:
//! `symbol,current_value,unrealized_pnl,sector_exposure,risk_category`, plus an
//! optional `trader_id`. Without `trader_id` every row belongs to whichever
//! trader asks.

use crate::domain::error::RiskGateError;
use crate::domain::position::{PortfolioPosition, RiskCategory};
use crate::domain::trader::TraderId;
use crate::ports::position_port::PositionPort;
use std::fs;
use std::path::PathBuf;

const REQUIRED: [&str; 5] = [
    "symbol",
    "current_value",
    "unrealized_pnl",
    "sector_exposure",
    "risk_category",
];

enum Source {
    File(PathBuf),
    Text(String),
}

pub struct CsvPositionAdapter {
    source: Source,
}

struct Columns {
    symbol: usize,
    current_value: usize,
    unrealized_pnl: usize,
    sector_exposure: usize,
    risk_category: usize,
    trader_id: Option<usize>,
}

impl CsvPositionAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            source: Source::File(path),
        }
    }

    pub fn from_string(content: &str) -> Self {
        Self {
            source: Source::Text(content.to_string()),
        }
    }

    fn content(&self) -> Result<String, RiskGateError> {
        match &self.source {
            Source::File(path) => {
                fs::read_to_string(path).map_err(|e| RiskGateError::PositionData {
                    reason: format!("failed to read {}: {}", path.display(), e),
                })
            }
            Source::Text(text) => Ok(text.clone()),
        }
    }

    fn columns(headers: &csv::StringRecord) -> Result<Columns, RiskGateError> {
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let require = |name: &str| {
            find(name).ok_or_else(|| RiskGateError::PositionData {
                reason: format!("missing {name} column"),
            })
        };
        Ok(Columns {
            symbol: require(REQUIRED[0])?,
            current_value: require(REQUIRED[1])?,
            unrealized_pnl: require(REQUIRED[2])?,
            sector_exposure: require(REQUIRED[3])?,
            risk_category: require(REQUIRED[4])?,
            trader_id: find("trader_id"),
        })
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'r str, RiskGateError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| RiskGateError::PositionData {
            reason: format!("line {line}: missing {name} value"),
        })
}

fn number(record: &csv::StringRecord, index: usize, name: &str, line: u64) -> Result<f64, RiskGateError> {
    field(record, index, name, line)?
        .parse()
        .map_err(|e| RiskGateError::PositionData {
            reason: format!("line {line}: invalid {name} value: {e}"),
        })
}

impl PositionPort for CsvPositionAdapter {
    fn load_positions(&self, trader: TraderId) -> Result<Vec<PortfolioPosition>, RiskGateError> {
        let content = self.content()?;
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| RiskGateError::PositionData {
            reason: format!("CSV header error: {e}"),
        })?;
        let cols = Self::columns(headers)?;

        let mut positions = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| RiskGateError::PositionData {
                reason: format!("CSV parse error: {e}"),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            if let Some(idx) = cols.trader_id {
                let owner: u64 = field(&record, idx, "trader_id", line)?
                    .parse()
                    .map_err(|e| RiskGateError::PositionData {
                        reason: format!("line {line}: invalid trader_id value: {e}"),
                    })?;
                if owner != trader.0 {
                    continue;
                }
            }

            let risk_category: RiskCategory = field(&record, cols.risk_category, "risk_category", line)?
                .parse()
                .map_err(|e| RiskGateError::PositionData {
                    reason: format!("line {line}: {e}"),
                })?;

            positions.push(PortfolioPosition {
                symbol: field(&record, cols.symbol, "symbol", line)?.to_string(),
                current_value: number(&record, cols.current_value, "current_value", line)?,
                unrealized_pnl: number(&record, cols.unrealized_pnl, "unrealized_pnl", line)?,
                sector_exposure: number(&record, cols.sector_exposure, "sector_exposure", line)?,
                risk_category,
            });
        }

        tracing::debug!(%trader, count = positions.len(), "positions loaded");
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "symbol,current_value,unrealized_pnl,sector_exposure,risk_category\n\
        AAPL,500000,-25000,0.15,MEDIUM_RISK\n\
        TSLA,300000,15000,0.10,HIGH_RISK\n";

    #[test]
    fn loads_positions_in_file_order() {
        let positions = CsvPositionAdapter::from_string(SAMPLE)
            .load_positions(TraderId(123))
            .unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].symbol, "AAPL");
        assert_eq!(positions[0].current_value, 500_000.0);
        assert_eq!(positions[0].unrealized_pnl, -25_000.0);
        assert_eq!(positions[1].risk_category, RiskCategory::HighRisk);
    }

    #[test]
    fn reads_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("positions.csv");
        fs::write(&path, SAMPLE).unwrap();
        let positions = CsvPositionAdapter::new(path)
            .load_positions(TraderId(1))
            .unwrap();
        assert_eq!(positions.len(), 2);
    }

    #[test]
    fn header_only_is_empty_portfolio() {
        let adapter = CsvPositionAdapter::from_string(
            "symbol,current_value,unrealized_pnl,sector_exposure,risk_category\n",
        );
        assert!(adapter.load_positions(TraderId(1)).unwrap().is_empty());
    }

    #[test]
    fn columns_found_by_name_and_filtered_by_trader() {
        let content = "risk_category,trader_id,symbol,sector_exposure,unrealized_pnl,current_value\n\
            low_risk,1,MSFT,0.2,0,1000\n\
            high_risk,2,GME,0.5,-10,200\n";
        let positions = CsvPositionAdapter::from_string(content)
            .load_positions(TraderId(2))
            .unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].symbol, "GME");
        assert_eq!(positions[0].current_value, 200.0);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = CsvPositionAdapter::from_string("symbol,current_value\nAAPL,1\n")
            .load_positions(TraderId(1))
            .unwrap_err();
        assert!(
            matches!(err, RiskGateError::PositionData { ref reason } if reason.contains("unrealized_pnl"))
        );
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn bad_number_is_reported_with_line() {
        let content = "symbol,current_value,unrealized_pnl,sector_exposure,risk_category\n\
            AAPL,lots,0,0.1,LOW_RISK\n";
        let err = CsvPositionAdapter::from_string(content)
            .load_positions(TraderId(1))
            .unwrap_err();
        assert!(
            matches!(err, RiskGateError::PositionData { ref reason } if reason.contains("line 2") && reason.contains("current_value"))
        );
    }

    #[test]
    fn unknown_category_is_reported() {
        let content = "symbol,current_value,unrealized_pnl,sector_exposure,risk_category\n\
            AAPL,1,0,0.1,EXTREME\n";
        assert!(CsvPositionAdapter::from_string(content)
            .load_positions(TraderId(1))
            .is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = CsvPositionAdapter::new(PathBuf::from("/nonexistent/positions.csv"))
            .load_positions(TraderId(1))
            .unwrap_err();
        assert!(matches!(err, RiskGateError::PositionData { .. }));
    }
}
