//! Operator-facing diagnostics
//!
//! Everything the interpreter wants a human to see (malformed commands,
//! stack discipline violations, acknowledgements, status reports) goes
//! through a [`Diagnostics`] sink as a typed [`Diagnostic`]. Sinks render
//! them with `Display` wherever they like: a serial console, a web log, a
//! ring buffer.

use core::fmt::{self, Write};

use heapless::{Deque, String};

use gantry_hal::StorageError;

use crate::gcode::{GCodeError, Source};
use crate::state::Fault;

/// Job file progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobState {
    /// No job file open
    Idle,
    /// A file is selected but not started (or paused)
    Queued,
    /// A file is being printed
    Printing,
}

/// Interpreter snapshot reported by M122
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub axes_relative: bool,
    pub drives_relative: bool,
    pub distance_scale: f32,
    pub feed_rate: f32,
    pub selected_tool: Option<u8>,
    pub stack_depth: usize,
    pub homing: bool,
    pub dwelling: bool,
    pub job: JobState,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = |relative: bool| if relative { "rel" } else { "abs" };
        write!(
            f,
            "axes {} drives {} scale {} feed {}mm/s tool ",
            mode(self.axes_relative),
            mode(self.drives_relative),
            self.distance_scale,
            self.feed_rate,
        )?;
        match self.selected_tool {
            Some(tool) => write!(f, "{}", tool)?,
            None => f.write_str("none")?,
        }
        write!(f, " stack {}", self.stack_depth)?;
        if self.homing {
            f.write_str(" homing")?;
        }
        if self.dwelling {
            f.write_str(" dwelling")?;
        }
        f.write_str(match self.job {
            JobState::Idle => " job idle",
            JobState::Queued => " job queued",
            JobState::Printing => " job printing",
        })
    }
}

/// One diagnostic message
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic<'a> {
    /// Completed line echoed while tracing (M111)
    Echo { source: Source, line: &'a str },
    /// Tokenizer error on a source
    GCode { source: Source, error: GCodeError },
    /// Unknown code in a known family
    InvalidCode { family: char, line: &'a str },
    /// Recognised code with no implementation
    NotImplemented { family: char, code: i32 },
    /// Tool index with no matching extruder
    InvalidTool { tool: i32 },
    /// Protocol-discipline violation
    Fault(Fault),
    /// Job file could not be opened
    Storage { name: &'a str, error: StorageError },
    /// Acknowledgement of a command with nothing else to do
    Notice(&'static str),
    /// M122 status
    Status(StatusReport),
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Echo { source, line } => write!(f, "{}{}", source.prefix(), line),
            Diagnostic::GCode { source, error } => write!(f, "{}{}", source.prefix(), error),
            Diagnostic::InvalidCode { family, line } => {
                write!(f, "invalid {}-code: {}", family, line)
            }
            Diagnostic::NotImplemented { family, code } => {
                write!(f, "{}{} not implemented", family, code)
            }
            Diagnostic::InvalidTool { tool } => write!(f, "no drive for tool {}", tool),
            Diagnostic::Fault(fault) => write!(f, "{}", fault),
            Diagnostic::Storage { name, error } => write!(f, "cannot open {}: {}", name, error),
            Diagnostic::Notice(text) => f.write_str(text),
            Diagnostic::Status(report) => write!(f, "status: {}", report),
        }
    }
}

/// Trait for diagnostics sinks
///
/// Reporting never fails and never blocks; a sink that runs out of room
/// drops messages.
pub trait Diagnostics {
    fn report(&mut self, diagnostic: &Diagnostic<'_>);
}

/// Longest rendered message kept by [`DiagnosticLog`]
pub const MESSAGE_LENGTH: usize = 128;

/// Ring buffer of rendered messages, oldest dropped first
#[derive(Debug, Default)]
pub struct DiagnosticLog<const N: usize> {
    messages: Deque<String<MESSAGE_LENGTH>, N>,
    dropped: usize,
}

impl<const N: usize> DiagnosticLog<N> {
    pub const fn new() -> Self {
        Self {
            messages: Deque::new(),
            dropped: 0,
        }
    }

    /// Remove and return the oldest message
    pub fn pop(&mut self) -> Option<String<MESSAGE_LENGTH>> {
        self.messages.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|m| m.as_str())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages pushed out by newer ones
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl<const N: usize> Diagnostics for DiagnosticLog<N> {
    fn report(&mut self, diagnostic: &Diagnostic<'_>) {
        let mut text = String::new();
        // Over-long messages are kept truncated
        let _ = write!(text, "{}", diagnostic);

        if self.messages.is_full() {
            self.messages.pop_front();
            self.dropped += 1;
        }
        let _ = self.messages.push_back(text);
    }
}
