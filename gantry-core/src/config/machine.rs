//! Machine configuration types
//!
//! These types define the axes, extruder drives and command letters the
//! interpreter works with. Capacities are compile-time bounds; the
//! configuration picks sizes within them.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum positioning axes
pub const MAX_AXES: usize = 4;

/// Maximum extruder drives
pub const MAX_EXTRUDERS: usize = 4;

/// Maximum drives of any kind (axes + extruders)
pub const MAX_DRIVES: usize = MAX_AXES + MAX_EXTRUDERS;

/// Upper bound on the operation stack depth
pub const MAX_STACK_DEPTH: usize = 8;

/// Maximum job directory path length
pub const MAX_PATH_LEN: usize = 32;

/// Millimetres per inch (G20)
pub const INCH_TO_MM: f32 = 25.4;

/// Letters with a fixed meaning in the command grammar
///
/// G/M/T select the command family; P, R and S carry parameters for
/// dwell, offsets and temperatures.
pub const RESERVED_LETTERS: &[char] = &['G', 'M', 'T', 'P', 'R', 'S'];

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// At least one axis is required
    NoAxes,
    /// Letter used by more than one drive, or by a drive and the feed rate
    DuplicateLetter(char),
    /// Letter is not an uppercase ASCII letter, or has a fixed meaning
    InvalidLetter(char),
    /// Axis length or feed rate is not a positive number
    InvalidLimit,
    /// Stack depth is zero or above [`MAX_STACK_DEPTH`]
    InvalidStackDepth,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Binary configuration could not be encoded or decoded
    Encoding,
    /// TOML text could not be parsed
    Toml,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::NoAxes => f.write_str("no axes configured"),
            ConfigError::DuplicateLetter(c) => write!(f, "letter '{}' used twice", c),
            ConfigError::InvalidLetter(c) => write!(f, "letter '{}' cannot name a drive", c),
            ConfigError::InvalidLimit => f.write_str("lengths and feed rates must be positive"),
            ConfigError::InvalidStackDepth => {
                write!(f, "stack depth must be 1..={}", MAX_STACK_DEPTH)
            }
            ConfigError::TooManyItems => f.write_str("too many axes or extruders"),
            ConfigError::Encoding => f.write_str("binary configuration is corrupt"),
            ConfigError::Toml => f.write_str("TOML configuration could not be parsed"),
        }
    }
}

/// Positioning axis configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisConfig {
    /// Command letter (e.g., 'X')
    pub letter: char,
    /// Travel length in mm
    pub length_mm: f32,
    /// Homing feed rate in mm/min
    pub home_feed_rate_mm_min: f32,
    /// Maximum feed rate in mm/s
    pub max_feed_rate_mm_s: f32,
}

impl AxisConfig {
    /// Create an axis config
    pub const fn new(
        letter: char,
        length_mm: f32,
        home_feed_rate_mm_min: f32,
        max_feed_rate_mm_s: f32,
    ) -> Self {
        Self {
            letter,
            length_mm,
            home_feed_rate_mm_min,
            max_feed_rate_mm_s,
        }
    }
}

/// Extruder drive configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtruderConfig {
    /// Command letter (e.g., 'E')
    pub letter: char,
    /// Maximum feed rate in mm/s
    pub max_feed_rate_mm_s: f32,
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MachineConfig {
    /// Positioning axes, in homing order
    pub axes: Vec<AxisConfig, MAX_AXES>,
    /// Extruder drives; tool N drives extruder N
    pub extruders: Vec<ExtruderConfig, MAX_EXTRUDERS>,
    /// Letter carrying the feed rate on moves
    pub feed_rate_letter: char,
    /// Directory job files are opened from (with trailing separator)
    pub gcode_dir: String<MAX_PATH_LEN>,
    /// Depth of the mode/feed-rate save stack
    pub stack_depth: u8,
}

impl Default for MachineConfig {
    fn default() -> Self {
        let mut axes = Vec::new();
        let _ = axes.push(AxisConfig::new('X', 210.0, 3000.0, 300.0));
        let _ = axes.push(AxisConfig::new('Y', 200.0, 3000.0, 300.0));
        let _ = axes.push(AxisConfig::new('Z', 120.0, 60.0, 3.0));

        let mut extruders = Vec::new();
        let _ = extruders.push(ExtruderConfig {
            letter: 'E',
            max_feed_rate_mm_s: 45.0,
        });

        let mut gcode_dir = String::new();
        let _ = gcode_dir.push_str("gcodes/");

        Self {
            axes,
            extruders,
            feed_rate_letter: 'F',
            gcode_dir,
            stack_depth: 5,
        }
    }
}

impl MachineConfig {
    /// Create the reference machine configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positioning axes
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Number of extruder drives
    pub fn extruder_count(&self) -> usize {
        self.extruders.len()
    }

    /// Slowest maximum feed rate across the axes (mm/s)
    ///
    /// Used as the power-on feed rate so the first move can never be too
    /// fast for any axis.
    pub fn slowest_axis_feed_rate(&self) -> f32 {
        self.axes
            .iter()
            .map(|a| a.max_feed_rate_mm_s)
            .fold(f32::INFINITY, f32::min)
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.axes.is_empty() {
            return Err(ConfigError::NoAxes);
        }

        if self.stack_depth == 0 || self.stack_depth as usize > MAX_STACK_DEPTH {
            return Err(ConfigError::InvalidStackDepth);
        }

        for axis in &self.axes {
            if !(axis.length_mm > 0.0
                && axis.home_feed_rate_mm_min > 0.0
                && axis.max_feed_rate_mm_s > 0.0)
            {
                return Err(ConfigError::InvalidLimit);
            }
        }

        if self.extruders.iter().any(|e| !(e.max_feed_rate_mm_s > 0.0)) {
            return Err(ConfigError::InvalidLimit);
        }

        let mut seen: Vec<char, { MAX_DRIVES + 1 }> = Vec::new();
        let letters = self
            .axes
            .iter()
            .map(|a| a.letter)
            .chain(self.extruders.iter().map(|e| e.letter))
            .chain(core::iter::once(self.feed_rate_letter));

        for letter in letters {
            if !letter.is_ascii_uppercase() || RESERVED_LETTERS.contains(&letter) {
                return Err(ConfigError::InvalidLetter(letter));
            }
            if seen.contains(&letter) {
                return Err(ConfigError::DuplicateLetter(letter));
            }
            seen.push(letter).map_err(|_| ConfigError::TooManyItems)?;
        }

        Ok(())
    }

    /// Encode as postcard binary into `buf`
    ///
    /// Returns the used prefix of `buf`.
    #[cfg(feature = "serde")]
    pub fn to_postcard<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encoding)
    }

    /// Decode and validate a postcard binary configuration
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: MachineConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Encoding)?;
        config.validate()?;
        Ok(config)
    }
}
