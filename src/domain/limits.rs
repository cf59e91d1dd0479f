//! Risk limits: every threshold the rule groups compare against.
//!
//! Defaults reproduce the legacy desk constants. [`RiskLimits::from_config`]
//! overlays an INI file, section per rule group, after validating it.

use crate::domain::config_validation::validate_limits_config;
use crate::domain::error::RiskGateError;
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EligibilityLimits {
    pub min_experience_years: u32,
    pub min_account_balance: f64,
    pub restricted_jurisdictions: Vec<String>,
    /// Retail balance below which pattern-day-trader restrictions apply.
    pub pdt_min_balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderLimits {
    pub max_order_value: f64,
    /// Volatility above which LOW risk-tolerance traders are refused.
    pub low_risk_max_volatility: f64,
    pub max_retail_short_value: f64,
    /// Fraction of order value that must be covered by available margin.
    pub margin_requirement: f64,
    pub max_trades_per_day: u32,
    pub diversified_sector: String,
    pub extended_hours_min_experience: u32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioLimits {
    pub max_unrealized_loss_ratio: f64,
    pub max_position_value: f64,
    pub max_position_concentration: f64,
    pub max_sector_exposure: f64,
    pub max_high_risk_ratio: f64,
    pub max_leverage: f64,
    pub margin_call_ratio: f64,
    pub forced_liquidation_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketLimits {
    pub vix_halt_threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyLossLimits {
    pub max_daily_loss: f64,
    /// Fraction of the daily limit at which a warning is raised.
    pub warning_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuitabilityLimits {
    pub international_min_experience: u32,
    pub crypto_restricted_jurisdictions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionLimits {
    pub large_order_value: f64,
    pub block_venues: Vec<String>,
    pub market_impact_quantity: f64,
    pub retail_venue: String,
    pub max_retail_venue_quantity: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringWeights {
    pub junior_experience_years: u32,
    pub junior_experience_weight: f64,
    pub small_account_balance: f64,
    pub small_account_weight: f64,
    pub large_order_ratio: f64,
    pub large_order_weight: f64,
    pub volatility_weight: f64,
    pub risky_sectors: Vec<String>,
    pub risky_sector_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskLimits {
    pub eligibility: EligibilityLimits,
    pub order: OrderLimits,
    pub portfolio: PortfolioLimits,
    pub market: MarketLimits,
    pub daily_loss: DailyLossLimits,
    pub suitability: SuitabilityLimits,
    pub execution: ExecutionLimits,
    pub scoring: ScoringWeights,
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for EligibilityLimits {
    fn default() -> Self {
        Self {
            min_experience_years: 2,
            min_account_balance: 50_000.0,
            restricted_jurisdictions: labels(&["RESTRICTED", "SANCTIONED"]),
            pdt_min_balance: 25_000.0,
        }
    }
}

impl Default for OrderLimits {
    fn default() -> Self {
        Self {
            max_order_value: 1_000_000.0,
            low_risk_max_volatility: 0.8,
            max_retail_short_value: 100_000.0,
            margin_requirement: 0.5,
            max_trades_per_day: 100,
            diversified_sector: "DIVERSIFIED".to_string(),
            extended_hours_min_experience: 5,
        }
    }
}

impl Default for PortfolioLimits {
    fn default() -> Self {
        Self {
            max_unrealized_loss_ratio: 0.20,
            max_position_value: 10_000_000.0,
            max_position_concentration: 0.20,
            max_sector_exposure: 0.30,
            max_high_risk_ratio: 0.75,
            max_leverage: 10.0,
            margin_call_ratio: 0.25,
            forced_liquidation_ratio: 0.10,
        }
    }
}

impl Default for MarketLimits {
    fn default() -> Self {
        Self {
            vix_halt_threshold: 40.0,
        }
    }
}

impl Default for DailyLossLimits {
    fn default() -> Self {
        Self {
            max_daily_loss: 500_000.0,
            warning_ratio: 0.75,
        }
    }
}

impl Default for SuitabilityLimits {
    fn default() -> Self {
        Self {
            international_min_experience: 5,
            crypto_restricted_jurisdictions: labels(&["NY", "RESTRICTED_CRYPTO"]),
        }
    }
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            large_order_value: 500_000.0,
            block_venues: labels(&["DARK_POOL", "INSTITUTIONAL_NETWORK"]),
            market_impact_quantity: 10_000.0,
            retail_venue: "RETAIL_VENUE".to_string(),
            max_retail_venue_quantity: 100_000.0,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            junior_experience_years: 3,
            junior_experience_weight: 0.3,
            small_account_balance: 100_000.0,
            small_account_weight: 0.2,
            large_order_ratio: 0.1,
            large_order_weight: 0.4,
            volatility_weight: 0.5,
            risky_sectors: labels(&["BIOTECH", "CRYPTO"]),
            risky_sector_weight: 0.3,
        }
    }
}

impl RiskLimits {
    /// Validates `config` and overlays it on the defaults.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, RiskGateError> {
        validate_limits_config(config)?;
        let d = RiskLimits::default();

        let years = |section: &str, key: &str, default: u32| -> u32 {
            // Range already checked by validation.
            u32::try_from(config.get_int(section, key, i64::from(default))).unwrap_or(default)
        };
        let list = |section: &str, key: &str, default: &[String]| -> Vec<String> {
            config
                .get_list(section, key)
                .unwrap_or_else(|| default.to_vec())
        };
        let label = |section: &str, key: &str, default: &str| -> String {
            config
                .get_string(section, key)
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(RiskLimits {
            eligibility: EligibilityLimits {
                min_experience_years: years(
                    "eligibility",
                    "min_experience_years",
                    d.eligibility.min_experience_years,
                ),
                min_account_balance: config.get_double(
                    "eligibility",
                    "min_account_balance",
                    d.eligibility.min_account_balance,
                ),
                restricted_jurisdictions: list(
                    "eligibility",
                    "restricted_jurisdictions",
                    &d.eligibility.restricted_jurisdictions,
                ),
                pdt_min_balance: config.get_double(
                    "eligibility",
                    "pdt_min_balance",
                    d.eligibility.pdt_min_balance,
                ),
            },
            order: OrderLimits {
                max_order_value: config.get_double(
                    "order",
                    "max_order_value",
                    d.order.max_order_value,
                ),
                low_risk_max_volatility: config.get_double(
                    "order",
                    "low_risk_max_volatility",
                    d.order.low_risk_max_volatility,
                ),
                max_retail_short_value: config.get_double(
                    "order",
                    "max_retail_short_value",
                    d.order.max_retail_short_value,
                ),
                margin_requirement: config.get_double(
                    "order",
                    "margin_requirement",
                    d.order.margin_requirement,
                ),
                max_trades_per_day: years(
                    "order",
                    "max_trades_per_day",
                    d.order.max_trades_per_day,
                ),
                diversified_sector: label(
                    "order",
                    "diversified_sector",
                    &d.order.diversified_sector,
                ),
                extended_hours_min_experience: years(
                    "order",
                    "extended_hours_min_experience",
                    d.order.extended_hours_min_experience,
                ),
            },
            portfolio: PortfolioLimits {
                max_unrealized_loss_ratio: config.get_double(
                    "portfolio",
                    "max_unrealized_loss_ratio",
                    d.portfolio.max_unrealized_loss_ratio,
                ),
                max_position_value: config.get_double(
                    "portfolio",
                    "max_position_value",
                    d.portfolio.max_position_value,
                ),
                max_position_concentration: config.get_double(
                    "portfolio",
                    "max_position_concentration",
                    d.portfolio.max_position_concentration,
                ),
                max_sector_exposure: config.get_double(
                    "portfolio",
                    "max_sector_exposure",
                    d.portfolio.max_sector_exposure,
                ),
                max_high_risk_ratio: config.get_double(
                    "portfolio",
                    "max_high_risk_ratio",
                    d.portfolio.max_high_risk_ratio,
                ),
                max_leverage: config.get_double(
                    "portfolio",
                    "max_leverage",
                    d.portfolio.max_leverage,
                ),
                margin_call_ratio: config.get_double(
                    "portfolio",
                    "margin_call_ratio",
                    d.portfolio.margin_call_ratio,
                ),
                forced_liquidation_ratio: config.get_double(
                    "portfolio",
                    "forced_liquidation_ratio",
                    d.portfolio.forced_liquidation_ratio,
                ),
            },
            market: MarketLimits {
                vix_halt_threshold: config.get_double(
                    "market",
                    "vix_halt_threshold",
                    d.market.vix_halt_threshold,
                ),
            },
            daily_loss: DailyLossLimits {
                max_daily_loss: config.get_double(
                    "daily_loss",
                    "max_daily_loss",
                    d.daily_loss.max_daily_loss,
                ),
                warning_ratio: config.get_double(
                    "daily_loss",
                    "warning_ratio",
                    d.daily_loss.warning_ratio,
                ),
            },
            suitability: SuitabilityLimits {
                international_min_experience: years(
                    "suitability",
                    "international_min_experience",
                    d.suitability.international_min_experience,
                ),
                crypto_restricted_jurisdictions: list(
                    "suitability",
                    "crypto_restricted_jurisdictions",
                    &d.suitability.crypto_restricted_jurisdictions,
                ),
            },
            execution: ExecutionLimits {
                large_order_value: config.get_double(
                    "execution",
                    "large_order_value",
                    d.execution.large_order_value,
                ),
                block_venues: list("execution", "block_venues", &d.execution.block_venues),
                market_impact_quantity: config.get_double(
                    "execution",
                    "market_impact_quantity",
                    d.execution.market_impact_quantity,
                ),
                retail_venue: label("execution", "retail_venue", &d.execution.retail_venue),
                max_retail_venue_quantity: config.get_double(
                    "execution",
                    "max_retail_venue_quantity",
                    d.execution.max_retail_venue_quantity,
                ),
            },
            scoring: ScoringWeights {
                junior_experience_years: years(
                    "scoring",
                    "junior_experience_years",
                    d.scoring.junior_experience_years,
                ),
                junior_experience_weight: config.get_double(
                    "scoring",
                    "junior_experience_weight",
                    d.scoring.junior_experience_weight,
                ),
                small_account_balance: config.get_double(
                    "scoring",
                    "small_account_balance",
                    d.scoring.small_account_balance,
                ),
                small_account_weight: config.get_double(
                    "scoring",
                    "small_account_weight",
                    d.scoring.small_account_weight,
                ),
                large_order_ratio: config.get_double(
                    "scoring",
                    "large_order_ratio",
                    d.scoring.large_order_ratio,
                ),
                large_order_weight: config.get_double(
                    "scoring",
                    "large_order_weight",
                    d.scoring.large_order_weight,
                ),
                volatility_weight: config.get_double(
                    "scoring",
                    "volatility_weight",
                    d.scoring.volatility_weight,
                ),
                risky_sectors: list("scoring", "risky_sectors", &d.scoring.risky_sectors),
                risky_sector_weight: config.get_double(
                    "scoring",
                    "risky_sector_weight",
                    d.scoring.risky_sector_weight,
                ),
            },
        })
    }

    /// Every effective threshold as `(section, key, value)`, in config file
    /// order.
    pub fn entries(&self) -> Vec<(&'static str, &'static str, String)> {
        let num = |v: f64| v.to_string();
        let list = |v: &[String]| v.join(",");
        let e = &self.eligibility;
        let o = &self.order;
        let p = &self.portfolio;
        let x = &self.execution;
        let s = &self.scoring;
        vec![
            ("eligibility", "min_experience_years", e.min_experience_years.to_string()),
            ("eligibility", "min_account_balance", num(e.min_account_balance)),
            ("eligibility", "restricted_jurisdictions", list(&e.restricted_jurisdictions)),
            ("eligibility", "pdt_min_balance", num(e.pdt_min_balance)),
            ("order", "max_order_value", num(o.max_order_value)),
            ("order", "low_risk_max_volatility", num(o.low_risk_max_volatility)),
            ("order", "max_retail_short_value", num(o.max_retail_short_value)),
            ("order", "margin_requirement", num(o.margin_requirement)),
            ("order", "max_trades_per_day", o.max_trades_per_day.to_string()),
            ("order", "diversified_sector", o.diversified_sector.clone()),
            ("order", "extended_hours_min_experience", o.extended_hours_min_experience.to_string()),
            ("portfolio", "max_unrealized_loss_ratio", num(p.max_unrealized_loss_ratio)),
            ("portfolio", "max_position_value", num(p.max_position_value)),
            ("portfolio", "max_position_concentration", num(p.max_position_concentration)),
            ("portfolio", "max_sector_exposure", num(p.max_sector_exposure)),
            ("portfolio", "max_high_risk_ratio", num(p.max_high_risk_ratio)),
            ("portfolio", "max_leverage", num(p.max_leverage)),
            ("portfolio", "margin_call_ratio", num(p.margin_call_ratio)),
            ("portfolio", "forced_liquidation_ratio", num(p.forced_liquidation_ratio)),
            ("market", "vix_halt_threshold", num(self.market.vix_halt_threshold)),
            ("daily_loss", "max_daily_loss", num(self.daily_loss.max_daily_loss)),
            ("daily_loss", "warning_ratio", num(self.daily_loss.warning_ratio)),
            (
                "suitability",
                "international_min_experience",
                self.suitability.international_min_experience.to_string(),
            ),
            (
                "suitability",
                "crypto_restricted_jurisdictions",
                list(&self.suitability.crypto_restricted_jurisdictions),
            ),
            ("execution", "large_order_value", num(x.large_order_value)),
            ("execution", "block_venues", list(&x.block_venues)),
            ("execution", "market_impact_quantity", num(x.market_impact_quantity)),
            ("execution", "retail_venue", x.retail_venue.clone()),
            ("execution", "max_retail_venue_quantity", num(x.max_retail_venue_quantity)),
            ("scoring", "junior_experience_years", s.junior_experience_years.to_string()),
            ("scoring", "junior_experience_weight", num(s.junior_experience_weight)),
            ("scoring", "small_account_balance", num(s.small_account_balance)),
            ("scoring", "small_account_weight", num(s.small_account_weight)),
            ("scoring", "large_order_ratio", num(s.large_order_ratio)),
            ("scoring", "large_order_weight", num(s.large_order_weight)),
            ("scoring", "volatility_weight", num(s.volatility_weight)),
            ("scoring", "risky_sectors", list(&s.risky_sectors)),
            ("scoring", "risky_sector_weight", num(s.risky_sector_weight)),
        ]
    }
}
