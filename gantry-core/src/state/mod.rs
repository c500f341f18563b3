//! Interpreter state and operation outcomes

pub mod interpreter;
pub mod progress;

pub use interpreter::*;
pub use progress::*;
