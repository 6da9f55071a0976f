//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{GateDelayTable, RawConfig, StaConfig, TimingConfig};
use std::path::Path;

/// Loads and validates a `slacktime.toml` configuration from a project directory.
///
/// Reads `<project_dir>/slacktime.toml`, parses it, and merges it onto the
/// built-in defaults.
pub fn load_config(project_dir: &Path) -> Result<StaConfig, ConfigError> {
    let config_path = project_dir.join("slacktime.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `slacktime.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<StaConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    resolve(raw)
}

/// Merges a parsed [`RawConfig`] onto the built-in defaults, validating
/// gate delay overrides along the way.
fn resolve(raw: RawConfig) -> Result<StaConfig, ConfigError> {
    let defaults = TimingConfig::default();
    let timing = TimingConfig {
        tclk_ns: raw.timing.tclk_ns.unwrap_or(defaults.tclk_ns),
        setup_ns: raw.timing.setup_ns.unwrap_or(defaults.setup_ns),
        clock_to_q_ns: raw.timing.clock_to_q_ns.unwrap_or(defaults.clock_to_q_ns),
    };
    if timing.tclk_ns <= 0.0 {
        return Err(ConfigError::ValidationError(
            "timing.tclk_ns must be positive".to_string(),
        ));
    }

    let mut gate_delays = GateDelayTable::defaults();
    gate_delays.merge_overrides(&raw.gate_delays)?;

    Ok(StaConfig {
        timing,
        kpath: raw.kpath,
        gate_delays,
    })
}
