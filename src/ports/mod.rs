//! Port traits implemented by adapters.

pub mod config_port;
pub mod position_port;
