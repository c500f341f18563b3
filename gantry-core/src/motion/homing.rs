//! Homing sequencer state
//!
//! Each axis runs `Idle -> Requested -> Queued -> Idle`. Axes are handled
//! strictly one at a time in configuration order, so at most one axis is
//! ever `Queued`. The interpreter drives the transitions; this type only
//! records them.

use crate::config::MAX_AXES;

/// Homing state of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisHoming {
    #[default]
    Idle,
    /// Waiting for its turn
    Requested,
    /// Homing move handed off, waiting to restore state
    Queued,
}

/// Per-axis homing states
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HomingSequence {
    axes: [AxisHoming; MAX_AXES],
}

impl HomingSequence {
    pub const fn new() -> Self {
        Self {
            axes: [AxisHoming::Idle; MAX_AXES],
        }
    }

    /// Any axis requested or queued
    pub fn is_active(&self) -> bool {
        self.axes.iter().any(|a| *a != AxisHoming::Idle)
    }

    /// State of one axis (`Idle` for out-of-range indices)
    pub fn state(&self, axis: usize) -> AxisHoming {
        self.axes.get(axis).copied().unwrap_or_default()
    }

    /// Request homing of `axes`
    ///
    /// Refused while a sequence is running. Indices beyond
    /// [`MAX_AXES`] are ignored.
    pub fn request<I>(&mut self, axes: I) -> bool
    where
        I: IntoIterator<Item = usize>,
    {
        if self.is_active() {
            return false;
        }
        for axis in axes {
            if let Some(state) = self.axes.get_mut(axis) {
                *state = AxisHoming::Requested;
            }
        }
        true
    }

    /// The axis being worked on: the first one not idle
    pub fn current(&self) -> Option<(usize, AxisHoming)> {
        self.axes
            .iter()
            .copied()
            .enumerate()
            .find(|(_, state)| *state != AxisHoming::Idle)
    }

    /// The homing move of `axis` has been handed off
    pub fn mark_queued(&mut self, axis: usize) {
        if let Some(state) = self.axes.get_mut(axis) {
            if *state == AxisHoming::Requested {
                *state = AxisHoming::Queued;
            }
        }
    }

    /// `axis` is homed and its saved state restored
    pub fn mark_homed(&mut self, axis: usize) {
        if let Some(state) = self.axes.get_mut(axis) {
            *state = AxisHoming::Idle;
        }
    }

    /// Drop every pending request
    pub fn abort(&mut self) {
        self.axes = [AxisHoming::Idle; MAX_AXES];
    }
}
