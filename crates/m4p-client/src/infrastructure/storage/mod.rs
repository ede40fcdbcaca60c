//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads the TOML file from the platform config
//! directory (or an explicit path) and falls back to defaults on first run.

pub mod config;
