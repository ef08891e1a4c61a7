//! Configuration module for a console's chip set
//!
//! Provides types and parsing for `chips.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::{
    find_config, find_config_from, load_config, merge_cli_overrides, CliOverrides, ConfigError,
};
pub use schema::*;
