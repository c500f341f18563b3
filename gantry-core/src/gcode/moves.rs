//! Move building and the save stack, as seen from the dispatcher

use super::buffer::GCodeBuffer;
use super::interpreter::{Interpreter, Machine};
use crate::diagnostics::Diagnostic;
use crate::motion::{MotionRequest, Position, SavedState};
use crate::state::{Fault, Progress};

impl Interpreter {
    /// Position to build on, once the slot is free and motion has drained
    fn drained_position(&self, m: &mut Machine<'_>) -> Option<Position> {
        if !m.slot.is_empty() || !m.motion.all_moves_finished() {
            return None;
        }
        m.motion.current_position()
    }

    /// Publish a request, reporting a slot taken by someone else
    fn send(&self, request: MotionRequest, m: &mut Machine<'_>) -> bool {
        match m.slot.try_send(request) {
            Ok(()) => true,
            Err(_) => {
                warn!("move slot taken behind the interpreter's back");
                m.diagnostics.report(&Diagnostic::Fault(Fault::HandoffBusy));
                false
            }
        }
    }

    /// G0/G1: overlay the command's fields on the last resolved position
    pub(super) fn set_up_move(&mut self, gb: &mut GCodeBuffer, m: &mut Machine<'_>) -> Progress {
        if !m.slot.is_empty() {
            return Progress::Pending;
        }
        let Some(position) = m.motion.current_position() else {
            return Progress::Pending;
        };

        let mut request = MotionRequest::hold(&position, &self.config);
        let scale = self.state.distance_scale;

        for (index, axis) in self.config.axes.iter().enumerate() {
            if let Some(value) = gb.float_field(axis.letter) {
                let value = value * scale;
                let target = if self.state.axes_relative {
                    request.axis(index).unwrap_or(0.0) + value
                } else {
                    value
                };
                request.set_axis(index, target);
            }
        }

        let mut extruder_pos = self.state.last_extruder_pos;
        for (index, extruder) in self.config.extruders.iter().enumerate() {
            if let Some(value) = gb.float_field(extruder.letter) {
                let value = value * scale;
                let delta = if self.state.drives_relative {
                    value
                } else {
                    value - extruder_pos[index]
                };
                extruder_pos[index] += delta;
                request.set_extruder_delta(index, delta);
            }
        }

        let feed_rate = match gb.float_field(self.config.feed_rate_letter) {
            Some(value) => self.state.feed_rate_per_minute(value),
            None => self.state.feed_rate,
        };
        request.set_feed_rate(feed_rate);

        if !self.send(request, m) {
            return Progress::Pending;
        }

        self.state.last_extruder_pos = extruder_pos;
        self.state.feed_rate = feed_rate;
        trace!("move queued");
        Progress::Done
    }

    /// Save modes and feed rate once motion has drained
    ///
    /// `Ok(Some(position))` carries the drained position the caller may
    /// build on; `Ok(None)` means not yet.
    pub(super) fn push(&mut self, m: &mut Machine<'_>) -> Result<Option<Position>, Fault> {
        if self.stack.is_full() {
            return Err(Fault::StackOverflow);
        }
        let Some(position) = self.drained_position(m) else {
            return Ok(None);
        };
        self.stack.push(SavedState::capture(&self.state))?;
        Ok(Some(position))
    }

    /// M120
    pub(super) fn push_command(&mut self, m: &mut Machine<'_>) -> Progress {
        match self.push(m) {
            Ok(Some(_)) => Progress::Done,
            Ok(None) => Progress::Pending,
            Err(fault) => Progress::Failed(fault),
        }
    }

    /// M121, and the end of each homed axis
    ///
    /// Restores the saved frame once motion has drained, takes the drained
    /// extruder positions as the new bookkeeping, and sends a null move
    /// carrying the restored feed rate.
    pub(super) fn pop(&mut self, m: &mut Machine<'_>) -> Progress {
        let Some(frame) = self.stack.top().copied() else {
            return Progress::Failed(Fault::StackUnderflow);
        };
        let Some(position) = self.drained_position(m) else {
            return Progress::Pending;
        };

        let mut request = MotionRequest::hold(&position, &self.config);
        request.set_feed_rate(frame.feed_rate);
        if !self.send(request, m) {
            return Progress::Pending;
        }

        if let Err(fault) = self.stack.pop() {
            return Progress::Failed(fault);
        }
        frame.restore(&mut self.state);

        let extruders = self.config.extruder_count();
        self.state.last_extruder_pos[..extruders].copy_from_slice(&position.extruders[..extruders]);
        Progress::Done
    }

    /// Push, then send the homing move for `axis`
    ///
    /// Returns `Ok(true)` once the move is handed off.
    pub(super) fn start_homing_move(
        &mut self,
        axis: usize,
        m: &mut Machine<'_>,
    ) -> Result<bool, Fault> {
        let Some(axis_config) = self.config.axes.get(axis).copied() else {
            return Ok(false);
        };
        let Some(position) = self.push(m)? else {
            return Ok(false);
        };

        let mut request = MotionRequest::hold(&position, &self.config);
        request.set_axis(axis, -2.0 * axis_config.length_mm);
        request.set_feed_rate(axis_config.home_feed_rate_mm_min / 60.0);
        request.set_check_endstops(true);

        if !self.send(request, m) {
            // Undo so the next attempt starts from the same stack
            self.stack.pop()?;
            return Ok(false);
        }
        Ok(true)
    }
}
