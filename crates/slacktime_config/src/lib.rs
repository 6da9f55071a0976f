//! Parsing and validation of `slacktime.toml` static timing analysis configuration.
//!
//! This crate reads the scalar configuration surface described for a static
//! timing analysis run — the clock period, setup time, clock-to-Q penalty,
//! K-path extraction settings, and per-gate-tag delay overrides — and
//! produces a strongly-typed [`StaConfig`] with the defaults already merged
//! in.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{
    default_gate_delay, GateDelayTable, KPathConfig, RawConfig, StaConfig, TimingConfig,
    TimingConfigPartial, KNOWN_GATE_TAGS,
};
