//! TOML machine configuration
//!
//! Host tooling and simulators describe the machine in TOML; missing keys
//! fall back to the reference machine.
//!
//! ```toml
//! feed_rate_letter = "F"
//! gcode_dir = "jobs/"
//! stack_depth = 5
//!
//! [[axes]]
//! letter = "X"
//! length_mm = 300
//! home_feed_rate_mm_min = 3000
//! max_feed_rate_mm_s = 300
//! ```

use super::{ConfigError, MachineConfig};

impl MachineConfig {
    /// Parse and validate a TOML machine description
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: MachineConfig = ::toml::from_str(text).map_err(|_| ConfigError::Toml)?;
        config.validate()?;
        Ok(config)
    }
}
