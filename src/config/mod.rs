//! Configuration module for hops.
//!
//! Handles the config file, environment overrides and command-line overrides.

mod settings;

pub use settings::{expand_env_vars, Settings, SettingsError};
