//! Board-agnostic core logic for the Gantry printer controller
//!
//! This crate contains the command-interpretation and motion-sequencing
//! core, with no dependency on specific hardware:
//!
//! - Line tokenizer reconstructing G-code lines from byte streams
//! - Command dispatcher for G, M and T codes
//! - Cooperative source scheduler (network, serial, job file)
//! - Single-slot motion handoff to the motion subsystem
//! - Mode/feed-rate save stack, homing and dwell sequencers
//! - Configuration and diagnostics types
//!
//! Every operation is non-blocking. A command that cannot finish in one
//! control-loop tick reports [`state::Progress::Pending`] and is driven
//! again on the next tick.

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub mod config;
pub mod diagnostics;
pub mod gcode;
pub mod motion;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use config::MachineConfig;
pub use diagnostics::{Diagnostic, DiagnosticLog, Diagnostics};
pub use gcode::{GCodeBuffer, Interpreter, Machine, Source};
pub use motion::{MotionRequest, MoveSlot, Position};
pub use scheduler::{Scheduler, Sources};
pub use state::{Fault, InterpreterState, Progress};
pub use traits::{HeatSystem, MotionSink, MotionSystem};
