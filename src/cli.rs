//! CLI definition and dispatch.
//!
//! Scenario files are INI with `[trader]`, `[order]` and optional `[market]`,
//! `[request]` and `[session]` sections. Decisions go to stdout; progress and
//! errors go to stderr.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use crate::adapters::csv_position_adapter::CsvPositionAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_limits_config;
use crate::domain::counters::{DailyCounters, TraderCounters};
use crate::domain::decision::Decision;
use crate::domain::error::RiskGateError;
use crate::domain::limits::RiskLimits;
use crate::domain::market::MarketSnapshot;
use crate::domain::order::{OrderId, OrderType, TimeInForce, TradeOrder};
use crate::domain::pipeline::{RiskGate, TradeRequest};
use crate::domain::scorer::RiskScore;
use crate::domain::trader::{TraderId, TraderProfile};
use crate::ports::config_port::ConfigPort;
use crate::ports::position_port::PositionPort;

/// Exit status for an order the gate rejected.
pub const EXIT_REJECTED: u8 = 10;

/// Sections that describe the trade itself. A value there that fails to
/// parse is caller input, not configuration.
const INPUT_SECTIONS: [&str; 2] = ["trader", "order"];

#[derive(Parser, Debug)]
#[command(name = "riskgate", about = "Pre-trade risk and compliance gate")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a trade scenario against every applicable rule group
    Evaluate {
        #[arg(short, long)]
        scenario: PathBuf,
        #[arg(short, long)]
        limits: Option<PathBuf>,
        /// Portfolio snapshot CSV for the scenario's trader
        #[arg(short, long)]
        positions: Option<PathBuf>,
    },
    /// Print the risk score breakdown for a scenario
    Score {
        #[arg(short, long)]
        scenario: PathBuf,
        #[arg(short, long)]
        limits: Option<PathBuf>,
    },
    /// Validate a limits file
    CheckConfig {
        #[arg(short, long)]
        limits: PathBuf,
    },
    /// Print the effective limits
    Limits {
        #[arg(short, long)]
        limits: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Evaluate {
            scenario,
            limits,
            positions,
        } => run_evaluate(&scenario, limits.as_ref(), positions.as_ref()),
        Command::Score { scenario, limits } => run_score(&scenario, limits.as_ref()),
        Command::CheckConfig { limits } => run_check_config(&limits),
        Command::Limits { limits } => run_limits(limits.as_ref()),
    }
}

fn fail(err: &RiskGateError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

/// Defaults when no file is given.
pub fn load_limits(path: Option<&PathBuf>) -> Result<RiskLimits, RiskGateError> {
    match path {
        Some(p) => {
            eprintln!("Loading limits from {}", p.display());
            RiskLimits::from_config(&FileConfigAdapter::from_file(p)?)
        }
        None => Ok(RiskLimits::default()),
    }
}

fn run_evaluate(
    scenario_path: &PathBuf,
    limits_path: Option<&PathBuf>,
    positions_path: Option<&PathBuf>,
) -> ExitCode {
    match evaluate_scenario(scenario_path, limits_path, positions_path) {
        Ok((decision, score)) => {
            println!("{decision}");
            println!("Risk score: {:.3}", score.total());
            if decision.is_approved() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_REJECTED)
            }
        }
        Err(e) => fail(&e),
    }
}

/// Loads everything the `evaluate` command needs and runs the full request
/// pipeline. Returns the decision and the informational score.
pub fn evaluate_scenario(
    scenario_path: &PathBuf,
    limits_path: Option<&PathBuf>,
    positions_path: Option<&PathBuf>,
) -> Result<(Decision, RiskScore), RiskGateError> {
    let limits = load_limits(limits_path)?;
    eprintln!("Loading scenario from {}", scenario_path.display());
    let scenario = FileConfigAdapter::from_file(scenario_path)?;

    let positions = positions_path.map(|p| CsvPositionAdapter::new(p.clone()));
    let request = build_request(
        &scenario,
        positions.as_ref().map(|p| p as &dyn PositionPort),
    )?;
    let counters = build_counters(&scenario, request.trader.id)?;

    let gate = RiskGate::new(limits);
    let decision = gate.evaluate_request(&request, &counters)?;
    let score = gate.risk_breakdown(&request.trader, &request.order)?;
    Ok((decision, score))
}

fn run_score(scenario_path: &PathBuf, limits_path: Option<&PathBuf>) -> ExitCode {
    let limits = match load_limits(limits_path) {
        Ok(l) => l,
        Err(e) => return fail(&e),
    };
    let scenario = match load_config(scenario_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let gate = RiskGate::new(limits);
    let score = build_trader(&scenario).and_then(|trader| {
        let order = build_order(&scenario)?;
        gate.risk_breakdown(&trader, &order)
    });
    match score {
        Ok(score) => {
            println!("Risk score breakdown:");
            println!("{score}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_check_config(limits_path: &PathBuf) -> ExitCode {
    eprintln!("Validating limits: {}", limits_path.display());
    let adapter = match load_config(limits_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_limits_config(&adapter) {
        return fail(&e);
    }
    println!("Limits file OK");
    ExitCode::SUCCESS
}

fn run_limits(limits_path: Option<&PathBuf>) -> ExitCode {
    let limits = match load_limits(limits_path) {
        Ok(l) => l,
        Err(e) => return fail(&e),
    };
    let mut section = "";
    for (sec, key, value) in limits.entries() {
        if sec != section {
            if !section.is_empty() {
                println!();
            }
            println!("[{sec}]");
            section = sec;
        }
        println!("{key} = {value}");
    }
    ExitCode::SUCCESS
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, RiskGateError> {
    config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RiskGateError::ConfigMissing {
            section: section.into(),
            key: key.into(),
        })
}

/// Parses a present value; `Ok(None)` when the key is absent or blank.
fn optional<T>(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<T>, RiskGateError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if !config.has_key(section, key) {
        return Ok(None);
    }
    let raw = require(config, section, key)?;
    raw.parse::<T>().map(Some).map_err(|e| {
        if INPUT_SECTIONS.contains(&section) {
            RiskGateError::invalid_input(format!("{section}.{key}"), e.to_string())
        } else {
            RiskGateError::ConfigInvalid {
                section: section.into(),
                key: key.into(),
                reason: e.to_string(),
            }
        }
    })
}

fn required<T>(config: &dyn ConfigPort, section: &str, key: &str) -> Result<T, RiskGateError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(config, section, key)?.ok_or_else(|| RiskGateError::ConfigMissing {
        section: section.into(),
        key: key.into(),
    })
}

/// Enum-valued keys keep their `UnknownVariant` error so a bad label is an
/// input error rather than a config error.
fn label<T>(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<T>, RiskGateError>
where
    T: FromStr<Err = RiskGateError>,
{
    if !config.has_key(section, key) {
        return Ok(None);
    }
    require(config, section, key)?.parse::<T>().map(Some)
}

fn required_label<T>(config: &dyn ConfigPort, section: &str, key: &str) -> Result<T, RiskGateError>
where
    T: FromStr<Err = RiskGateError>,
{
    label(config, section, key)?.ok_or_else(|| RiskGateError::ConfigMissing {
        section: section.into(),
        key: key.into(),
    })
}

pub fn build_trader(config: &dyn ConfigPort) -> Result<TraderProfile, RiskGateError> {
    Ok(TraderProfile {
        id: TraderId(required(config, "trader", "id")?),
        name: config.get_string("trader", "name").unwrap_or_default(),
        experience_years: required(config, "trader", "experience_years")?,
        risk_tolerance: required_label(config, "trader", "risk_tolerance")?,
        account_balance: required(config, "trader", "account_balance")?,
        available_margin: optional(config, "trader", "available_margin")?.unwrap_or(0.0),
        category: required_label(config, "trader", "category")?,
        accredited: config.get_bool("trader", "accredited", false),
        jurisdiction: require(config, "trader", "jurisdiction")?,
    })
}

pub fn build_order(config: &dyn ConfigPort) -> Result<TradeOrder, RiskGateError> {
    Ok(TradeOrder {
        id: OrderId(optional(config, "order", "id")?.unwrap_or(0)),
        symbol: require(config, "order", "symbol")?,
        side: required_label(config, "order", "side")?,
        order_type: label(config, "order", "order_type")?.unwrap_or(OrderType::Limit),
        quantity: required(config, "order", "quantity")?,
        price: required(config, "order", "price")?,
        time_in_force: label(config, "order", "time_in_force")?.unwrap_or(TimeInForce::Day),
        margin: config.get_bool("order", "margin", false),
        sector: require(config, "order", "sector")?,
        volatility: optional(config, "order", "volatility")?.unwrap_or(0.0),
    })
}

/// `None` unless the scenario has a `[market]` section with a `vix` key.
pub fn build_market(config: &dyn ConfigPort) -> Result<Option<MarketSnapshot>, RiskGateError> {
    let Some(vix) = optional::<f64>(config, "market", "vix")? else {
        return Ok(None);
    };
    let status = required_label(config, "market", "status")?;
    Ok(Some(MarketSnapshot::new(vix, status)))
}

pub fn build_request(
    config: &dyn ConfigPort,
    positions: Option<&dyn PositionPort>,
) -> Result<TradeRequest, RiskGateError> {
    let trader = build_trader(config)?;
    let order = build_order(config)?;
    let mut request = TradeRequest::new(trader, order);

    if let Some(port) = positions {
        request.positions = Some(port.load_positions(request.trader.id)?);
    }
    request.market = build_market(config)?;
    request.product = label(config, "request", "product")?;
    request.venue = label(config, "request", "venue")?;
    Ok(request)
}

/// Counters for a one-shot evaluation, seeded from the optional `[session]`
/// section (`trading_day`, `trades_today`, `loss_today`).
pub fn build_counters(
    config: &dyn ConfigPort,
    trader: TraderId,
) -> Result<DailyCounters, RiskGateError> {
    let day = match config.get_string("session", "trading_day") {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            RiskGateError::ConfigInvalid {
                section: "session".into(),
                key: "trading_day".into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }
        })?,
        None => today(),
    };
    let counters = DailyCounters::new(day);
    let seeded = TraderCounters {
        trades_today: optional(config, "session", "trades_today")?.unwrap_or(0),
        loss_today: optional(config, "session", "loss_today")?.unwrap_or(0.0),
    };
    if seeded != TraderCounters::default() {
        counters.seed(trader, seeded);
    }
    Ok(counters)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
