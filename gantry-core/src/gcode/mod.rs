//! G-code handling
//!
//! - [`buffer`]: line tokenizer and field lookup
//! - [`number`]: numeric field parsing
//! - [`interpreter`]: command dispatch for the G, M and T families
//! - [`source`]: input source identities

pub mod buffer;
pub mod interpreter;
mod moves;
pub mod number;
pub mod source;

pub use buffer::{GCodeBuffer, GCodeError, GCODE_LENGTH};
pub use interpreter::{Interpreter, Machine};
pub use source::Source;
