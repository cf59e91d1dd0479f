//! Concrete adapter implementations for ports.

pub mod csv_position_adapter;
pub mod file_config_adapter;
