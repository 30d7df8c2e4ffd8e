//! Configuration system for the simulator and its debugger.
//!
//! This module defines the configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** Baseline constants (reset vector, RAM window, monitor toggles).
//! 2. **Structures:** Hierarchical config for general, memory, and monitor settings.
//! 3. **Loading:** JSON deserialization where every missing field falls back to its default.
//!
//! Configuration is supplied as JSON (the CLI's `--config` file), or use
//! `Config::default()`.

use serde::Deserialize;

/// Default configuration constants for the simulator.
mod defaults {
    /// Base address of main system RAM and the reset vector.
    pub const RAM_BASE: u32 = 0x8000_0000;

    /// Total size of main system RAM (128 MiB).
    ///
    /// Gives the inclusive window `[0x8000_0000, 0x87ff_ffff]`.
    pub const RAM_SIZE: usize = 128 * 1024 * 1024;
}

/// Root configuration structure for the simulator.
///
/// # Examples
///
/// ```
/// use rvsdb_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_instructions": true },
///     "monitor": { "watchpoints_enabled": false }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_instructions);
/// assert_eq!(config.general.start_pc, 0x8000_0000);
/// assert_eq!(config.memory.ram_size, 128 * 1024 * 1024);
/// assert!(!config.monitor.watchpoints_enabled);
/// assert!(!config.monitor.batch_mode);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings
    pub general: GeneralConfig,
    /// Main memory configuration
    pub memory: MemoryConfig,
    /// Debugger monitor configuration
    pub monitor: MonitorConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    ///
    /// Missing sections and fields take their defaults; unknown fields are ignored.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON document text.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or the `serde_json` parse error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Emit every executed instruction at `trace` level
    pub trace_instructions: bool,

    /// Initial PC value (defaults to RAM base)
    pub start_pc: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            start_pc: defaults::RAM_BASE,
        }
    }
}

/// Main memory configuration.
///
/// Specifies where the flat physical window starts and how large it is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Physical address of the first RAM byte
    pub ram_base: u32,

    /// RAM size in bytes
    pub ram_size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_base: defaults::RAM_BASE,
            ram_size: defaults::RAM_SIZE,
        }
    }
}

/// Debugger monitor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Initial state of the watchpoint toggle
    pub watchpoints_enabled: bool,

    /// Run to completion without entering the command loop
    pub batch_mode: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            watchpoints_enabled: true,
            batch_mode: false,
        }
    }
}
