//! Motion sequencing
//!
//! Everything between a parsed move command and the motion subsystem:
//!
//! - [`request`]: the fully-resolved move payload
//! - [`handoff`]: the single-slot mailbox the motion subsystem drains
//! - [`stack`]: mode/feed-rate save stack for compound operations
//! - [`homing`], [`dwell`]: multi-tick sequencers built on the above

pub mod dwell;
pub mod handoff;
pub mod homing;
pub mod request;
pub mod stack;

pub use dwell::{DwellState, DwellTimer};
pub use handoff::{MoveSlot, SlotBusy};
pub use homing::{AxisHoming, HomingSequence};
pub use request::{MotionRequest, Position};
pub use stack::{OperationStack, SavedState};
