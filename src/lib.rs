//! riskgate: pre-trade risk and compliance gate.
//!
//! Hexagonal architecture: rules, counters and the pipeline live in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;

pub use domain::decision::{Decision, Outcome, Severity};
pub use domain::error::RiskGateError;
pub use domain::pipeline::{RiskGate, TradeRequest};
