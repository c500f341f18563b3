//! Mode and feed-rate state owned by the interpreter

use crate::config::{MachineConfig, INCH_TO_MM, MAX_EXTRUDERS};

/// Coordinate and unit state carried across commands
///
/// Mutated only while a completed command is being interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterpreterState {
    /// Axis targets are relative to the last resolved position (G91)
    pub axes_relative: bool,
    /// Extruder targets are deltas (M83 / G91)
    pub drives_relative: bool,
    /// Unit multiplier: 1.0 for mm, [`INCH_TO_MM`] for inches
    pub distance_scale: f32,
    /// Last absolute position per extruder drive
    pub last_extruder_pos: [f32; MAX_EXTRUDERS],
    /// Current feed rate in mm/s
    pub feed_rate: f32,
    /// Selected tool, if any
    pub selected_tool: Option<u8>,
    /// Trace level set by M111; non-zero echoes completed lines
    pub debug_level: u8,
}

impl InterpreterState {
    /// Power-on state for a machine
    pub fn new(config: &MachineConfig) -> Self {
        Self {
            axes_relative: false,
            drives_relative: true,
            distance_scale: 1.0,
            last_extruder_pos: [0.0; MAX_EXTRUDERS],
            feed_rate: config.slowest_axis_feed_rate(),
            selected_tool: None,
            debug_level: 0,
        }
    }

    /// Select millimetres (G21) or inches (G20)
    pub fn set_inches(&mut self, inches: bool) {
        self.distance_scale = if inches { INCH_TO_MM } else { 1.0 };
    }

    /// Set both coordinate modes at once (G90 / G91)
    pub fn set_relative(&mut self, relative: bool) {
        self.axes_relative = relative;
        self.drives_relative = relative;
    }

    /// Feed rate in mm/s for a command value in distance units per minute
    pub fn feed_rate_per_minute(&self, value: f32) -> f32 {
        value * self.distance_scale / 60.0
    }

    /// Whether M111 tracing is on
    pub fn tracing(&self) -> bool {
        self.debug_level != 0
    }
}
