//! Collaborator traits
//!
//! These traits define the interface between the interpreter and the
//! subsystems it drives: motion execution and temperature control.
//! Byte sources and the job-file store live in `gantry-hal`.

pub mod heat;
pub mod motion;

pub use heat::{tool_heater, HeatSystem, BED_HEATER};
pub use motion::{MotionSink, MotionSystem};
