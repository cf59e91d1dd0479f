//! Risk limits configuration validation.
//!
//! Validates every present key before limits are built; absent keys fall back
//! to defaults and are not checked.

use crate::domain::error::RiskGateError;
use crate::domain::limits::RiskLimits;
use crate::ports::config_port::ConfigPort;

const AMOUNT_KEYS: &[(&str, &str)] = &[
    ("eligibility", "min_account_balance"),
    ("eligibility", "pdt_min_balance"),
    ("order", "max_order_value"),
    ("order", "max_retail_short_value"),
    ("order", "low_risk_max_volatility"),
    ("portfolio", "max_position_value"),
    ("portfolio", "max_leverage"),
    ("market", "vix_halt_threshold"),
    ("daily_loss", "max_daily_loss"),
    ("execution", "large_order_value"),
    ("execution", "market_impact_quantity"),
    ("execution", "max_retail_venue_quantity"),
    ("scoring", "small_account_balance"),
];

const RATIO_KEYS: &[(&str, &str)] = &[
    ("order", "margin_requirement"),
    ("portfolio", "max_unrealized_loss_ratio"),
    ("portfolio", "max_position_concentration"),
    ("portfolio", "max_sector_exposure"),
    ("portfolio", "max_high_risk_ratio"),
    ("portfolio", "margin_call_ratio"),
    ("portfolio", "forced_liquidation_ratio"),
    ("daily_loss", "warning_ratio"),
    ("scoring", "large_order_ratio"),
];

const COUNT_KEYS: &[(&str, &str)] = &[
    ("eligibility", "min_experience_years"),
    ("order", "max_trades_per_day"),
    ("order", "extended_hours_min_experience"),
    ("suitability", "international_min_experience"),
    ("scoring", "junior_experience_years"),
];

const WEIGHT_KEYS: &[(&str, &str)] = &[
    ("scoring", "junior_experience_weight"),
    ("scoring", "small_account_weight"),
    ("scoring", "large_order_weight"),
    ("scoring", "volatility_weight"),
    ("scoring", "risky_sector_weight"),
];

const LIST_KEYS: &[(&str, &str)] = &[
    ("eligibility", "restricted_jurisdictions"),
    ("suitability", "crypto_restricted_jurisdictions"),
    ("execution", "block_venues"),
    ("scoring", "risky_sectors"),
];

pub fn validate_limits_config(config: &dyn ConfigPort) -> Result<(), RiskGateError> {
    for (section, key) in AMOUNT_KEYS {
        validate_amount(config, section, key)?;
    }
    for (section, key) in RATIO_KEYS {
        validate_ratio(config, section, key)?;
    }
    for (section, key) in COUNT_KEYS {
        validate_count(config, section, key)?;
    }
    for (section, key) in WEIGHT_KEYS {
        validate_weight(config, section, key)?;
    }
    for (section, key) in LIST_KEYS {
        validate_list(config, section, key)?;
    }
    validate_liquidation_below_margin_call(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> RiskGateError {
    RiskGateError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses a present key as a finite float. `Ok(None)` when absent.
fn read_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, RiskGateError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(invalid(section, key, &format!("{key} must be a number"))),
    }
}

fn validate_amount(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), RiskGateError> {
    if let Some(v) = read_number(config, section, key)? {
        if v <= 0.0 {
            return Err(invalid(section, key, &format!("{key} must be positive")));
        }
    }
    Ok(())
}

fn validate_ratio(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), RiskGateError> {
    if let Some(v) = read_number(config, section, key)? {
        if v <= 0.0 || v > 1.0 {
            return Err(invalid(
                section,
                key,
                &format!("{key} must be between 0 and 1"),
            ));
        }
    }
    Ok(())
}

fn validate_count(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), RiskGateError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if (0..=i64::from(u32::MAX)).contains(&v) => Ok(()),
        _ => Err(invalid(
            section,
            key,
            &format!("{key} must be a non-negative integer"),
        )),
    }
}

fn validate_weight(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), RiskGateError> {
    if let Some(v) = read_number(config, section, key)? {
        if v < 0.0 {
            return Err(invalid(section, key, &format!("{key} must be non-negative")));
        }
    }
    Ok(())
}

fn validate_list(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), RiskGateError> {
    match config.get_list(section, key) {
        Some(items) if items.is_empty() => {
            Err(invalid(section, key, &format!("{key} must list at least one value")))
        }
        _ => Ok(()),
    }
}

fn validate_liquidation_below_margin_call(config: &dyn ConfigPort) -> Result<(), RiskGateError> {
    let defaults = RiskLimits::default().portfolio;
    let margin_call = config.get_double("portfolio", "margin_call_ratio", defaults.margin_call_ratio);
    let liquidation = config.get_double(
        "portfolio",
        "forced_liquidation_ratio",
        defaults.forced_liquidation_ratio,
    );
    if liquidation >= margin_call {
        return Err(invalid(
            "portfolio",
            "forced_liquidation_ratio",
            "forced_liquidation_ratio must be below margin_call_ratio",
        ));
    }
    Ok(())
}
