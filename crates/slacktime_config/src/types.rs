//! Strongly-typed configuration for a static timing analysis run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default propagation delay, in nanoseconds, for each gate-type tag.
///
/// These are the values an [`StaConfig`] starts from before any
/// `[gate_delays]` overrides from the configuration file are applied.
pub fn default_gate_delay(tag: &str) -> Option<f64> {
    let ns = match tag {
        "ASSIGN" => 0.001,
        "NOT" => 0.01,
        "AND" => 0.02,
        "OR" => 0.04,
        "XOR" | "XNOR" => 0.03,
        "NAND" => 0.025,
        "NOR" => 0.045,
        "MUX2_NOT" => 0.05,
        "MUX2_AND" => 0.09,
        "MUX2_OR" => 0.08,
        "BUF" => 0.01,
        "DFF" => 0.0,
        "PRIMARY" => 0.0,
        "UNKNOWN" => 0.0,
        _ => return None,
    };
    Some(ns)
}

/// The full set of gate-type tags the loader can assign to a vertex.
///
/// An override table may not add tags beyond this set — see
/// [`GateDelayTable::merge_overrides`].
pub const KNOWN_GATE_TAGS: &[&str] = &[
    "ASSIGN", "NOT", "AND", "OR", "XOR", "XNOR", "NAND", "NOR", "MUX2_NOT", "MUX2_AND",
    "MUX2_OR", "BUF", "DFF", "PRIMARY", "UNKNOWN",
];

/// Per-tag gate delay table, seeded with the default values and overridable
/// per entry from a `[gate_delays]` table in the configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateDelayTable {
    delays: BTreeMap<String, f64>,
}

impl GateDelayTable {
    /// Builds the default gate delay table.
    pub fn defaults() -> Self {
        let delays = KNOWN_GATE_TAGS
            .iter()
            .map(|tag| (tag.to_string(), default_gate_delay(tag).unwrap()))
            .collect();
        Self { delays }
    }

    /// Looks up the delay, in nanoseconds, for a gate-type tag.
    pub fn get(&self, tag: &str) -> Option<f64> {
        self.delays.get(tag).copied()
    }

    /// Merges caller-supplied overrides onto the default table.
    ///
    /// Returns a [`crate::ConfigError::ValidationError`] if an override
    /// names a tag outside [`KNOWN_GATE_TAGS`].
    pub fn merge_overrides(
        &mut self,
        overrides: &BTreeMap<String, f64>,
    ) -> Result<(), crate::ConfigError> {
        for (tag, ns) in overrides {
            if !self.delays.contains_key(tag) {
                return Err(crate::ConfigError::ValidationError(format!(
                    "unknown gate delay tag '{tag}' (no matching loader rule)"
                )));
            }
            self.delays.insert(tag.clone(), *ns);
        }
        Ok(())
    }
}

impl Default for GateDelayTable {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Timing constants shared by the forward and backward passes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Clock period, in nanoseconds.
    pub tclk_ns: f64,
    /// Setup time at capturing endpoints, in nanoseconds.
    pub setup_ns: f64,
    /// Clock-to-Q delay at flip-flop Q-side startpoints, in nanoseconds.
    pub clock_to_q_ns: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        // Matches the concrete scenarios used as acceptance tests.
        Self {
            tclk_ns: 2.0,
            setup_ns: 0.05,
            clock_to_q_ns: 0.08,
        }
    }
}

/// Settings controlling K-worst-path extraction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KPathConfig {
    /// Maximum number of edge-disjoint paths to extract.
    pub k: usize,
    /// When `true`, stop once no endpoint has negative slack (after the
    /// first path). When `false`, keep extracting up to `k` paths
    /// regardless of slack sign.
    pub violating_only: bool,
}

impl Default for KPathConfig {
    fn default() -> Self {
        Self {
            k: 3,
            violating_only: false,
        }
    }
}

/// Raw, on-disk shape of a `slacktime.toml` configuration file.
///
/// `gate_delays` entries are optional overrides layered on top of
/// [`GateDelayTable::defaults`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawConfig {
    /// Timing constants. Missing entries fall back to [`TimingConfig::default`].
    #[serde(default)]
    pub timing: TimingConfigPartial,
    /// K-path extraction settings.
    #[serde(default)]
    pub kpath: KPathConfig,
    /// Per-tag gate delay overrides, in nanoseconds.
    #[serde(default)]
    pub gate_delays: BTreeMap<String, f64>,
}

/// [`TimingConfig`] with every field optional, for partial overrides from TOML.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct TimingConfigPartial {
    /// See [`TimingConfig::tclk_ns`].
    pub tclk_ns: Option<f64>,
    /// See [`TimingConfig::setup_ns`].
    pub setup_ns: Option<f64>,
    /// See [`TimingConfig::clock_to_q_ns`].
    pub clock_to_q_ns: Option<f64>,
}

/// A fully resolved STA configuration: timing constants, K-path settings,
/// and the merged gate delay table.
#[derive(Clone, Debug, PartialEq)]
pub struct StaConfig {
    /// Timing constants.
    pub timing: TimingConfig,
    /// K-path extraction settings.
    pub kpath: KPathConfig,
    /// The merged gate delay table (defaults plus overrides).
    pub gate_delays: GateDelayTable,
}

impl Default for StaConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            kpath: KPathConfig::default(),
            gate_delays: GateDelayTable::defaults(),
        }
    }
}
