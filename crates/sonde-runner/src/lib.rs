//! Sonde runner library: the probe runs behind each CLI subcommand, plus the
//! environment contract and console-report helpers they share.

pub mod commands;
pub mod env;
pub mod report;
