//! Mode/feed-rate save stack
//!
//! Compound operations (homing, M120/M121 blocks) save the coordinate
//! modes and feed rate, change them, and later restore them exactly. The
//! stack itself is plain data; waiting for motion to drain before a push or
//! pop is the interpreter's job.

use heapless::Vec;

use crate::config::MAX_STACK_DEPTH;
use crate::state::{Fault, InterpreterState};

/// One saved frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SavedState {
    pub drives_relative: bool,
    pub axes_relative: bool,
    pub feed_rate: f32,
}

impl SavedState {
    /// Snapshot the parts of the interpreter state the stack preserves
    pub fn capture(state: &InterpreterState) -> Self {
        Self {
            drives_relative: state.drives_relative,
            axes_relative: state.axes_relative,
            feed_rate: state.feed_rate,
        }
    }

    /// Write the snapshot back
    pub fn restore(&self, state: &mut InterpreterState) {
        state.drives_relative = self.drives_relative;
        state.axes_relative = self.axes_relative;
        state.feed_rate = self.feed_rate;
    }
}

/// Bounded stack of [`SavedState`] frames
#[derive(Debug, Clone)]
pub struct OperationStack {
    frames: Vec<SavedState, MAX_STACK_DEPTH>,
    limit: usize,
}

impl OperationStack {
    /// Create a stack holding at most `limit` frames
    ///
    /// `limit` is clamped to `1..=MAX_STACK_DEPTH`.
    pub fn new(limit: usize) -> Self {
        Self {
            frames: Vec::new(),
            limit: limit.clamp(1, MAX_STACK_DEPTH),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.limit
    }

    /// Save a frame; a full stack is left untouched
    pub fn push(&mut self, frame: SavedState) -> Result<(), Fault> {
        if self.is_full() {
            return Err(Fault::StackOverflow);
        }
        self.frames.push(frame).map_err(|_| Fault::StackOverflow)
    }

    /// Most recent frame, left in place
    pub fn top(&self) -> Option<&SavedState> {
        self.frames.last()
    }

    /// Remove the most recent frame
    pub fn pop(&mut self) -> Result<SavedState, Fault> {
        self.frames.pop().ok_or(Fault::StackUnderflow)
    }
}
