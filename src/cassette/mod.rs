//! Record and replay of port traffic as YAML cassettes.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
