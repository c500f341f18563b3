//! Move request payload

use crate::config::{MachineConfig, MAX_AXES, MAX_DRIVES, MAX_EXTRUDERS};

/// Position snapshot reported by the motion subsystem
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    /// Absolute axis positions in mm
    pub axes: [f32; MAX_AXES],
    /// Absolute extruder positions in mm
    pub extruders: [f32; MAX_EXTRUDERS],
    /// Feed rate of the last executed move in mm/s
    pub feed_rate: f32,
}

impl Position {
    /// All drives at zero
    pub const fn origin(feed_rate: f32) -> Self {
        Self {
            axes: [0.0; MAX_AXES],
            extruders: [0.0; MAX_EXTRUDERS],
            feed_rate,
        }
    }
}

/// One fully-resolved move for the motion subsystem
///
/// Layout: absolute target per axis, then a relative delta per extruder
/// drive, then the feed rate in mm/s.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionRequest {
    drives: [f32; MAX_DRIVES],
    feed_rate: f32,
    axes: u8,
    extruders: u8,
    check_endstops: bool,
}

impl MotionRequest {
    /// A request that holds every axis at `position` and moves no drive
    pub fn hold(position: &Position, config: &MachineConfig) -> Self {
        let axes = config.axis_count();
        let mut drives = [0.0; MAX_DRIVES];
        drives[..axes].copy_from_slice(&position.axes[..axes]);

        Self {
            drives,
            feed_rate: position.feed_rate,
            axes: axes as u8,
            extruders: config.extruder_count() as u8,
            check_endstops: false,
        }
    }

    /// Absolute axis targets
    pub fn axes(&self) -> &[f32] {
        &self.drives[..self.axes as usize]
    }

    /// Extruder deltas
    pub fn extruder_deltas(&self) -> &[f32] {
        let start = self.axes as usize;
        &self.drives[start..start + self.extruders as usize]
    }

    /// Absolute target of one axis
    pub fn axis(&self, index: usize) -> Option<f32> {
        self.axes().get(index).copied()
    }

    /// Delta of one extruder drive
    pub fn extruder_delta(&self, index: usize) -> Option<f32> {
        self.extruder_deltas().get(index).copied()
    }

    /// Set the absolute target of one axis; out-of-range indices are ignored
    pub fn set_axis(&mut self, index: usize, value: f32) {
        if index < self.axes as usize {
            self.drives[index] = value;
        }
    }

    /// Set the delta of one extruder drive; out-of-range indices are ignored
    pub fn set_extruder_delta(&mut self, index: usize, value: f32) {
        if index < self.extruders as usize {
            self.drives[self.axes as usize + index] = value;
        }
    }

    /// Feed rate in mm/s
    pub fn feed_rate(&self) -> f32 {
        self.feed_rate
    }

    pub fn set_feed_rate(&mut self, feed_rate: f32) {
        self.feed_rate = feed_rate;
    }

    /// Abort and report when a limit switch trips (homing moves)
    pub fn check_endstops(&self) -> bool {
        self.check_endstops
    }

    pub fn set_check_endstops(&mut self, check: bool) {
        self.check_endstops = check;
    }

    /// All fields in wire order: axes, extruder deltas, feed rate
    pub fn fields(&self) -> impl Iterator<Item = f32> + '_ {
        self.axes()
            .iter()
            .chain(self.extruder_deltas())
            .copied()
            .chain(core::iter::once(self.feed_rate))
    }
}
