//! Motion subsystem interface

use crate::motion::{MotionRequest, Position};

/// Trait for the motion-execution subsystem, as seen by the interpreter
///
/// The motion subsystem runs on its own timing domain and drains the
/// [`MoveSlot`](crate::motion::MoveSlot) by itself; the interpreter only
/// polls it.
pub trait MotionSystem {
    /// All queued motion has been executed
    fn all_moves_finished(&mut self) -> bool;

    /// Last resolved position and feed rate
    ///
    /// Returns `None` if the position cannot be read right now; the caller
    /// retries on a later tick.
    fn current_position(&mut self) -> Option<Position>;

    /// Turn the drive motors off (M18/M84)
    fn disable_drives(&mut self) {}
}

/// Trait for a consumer that takes requests pushed out of a move slot
pub trait MotionSink {
    /// Offer a request; `false` leaves it in the slot for a later attempt
    fn accept(&mut self, request: &MotionRequest) -> bool;
}
