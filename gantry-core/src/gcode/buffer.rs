//! Line tokenizer
//!
//! A [`GCodeBuffer`] rebuilds one command line from a byte stream, drops
//! comments, and offers letter-keyed field lookup on the completed line.
//!
//! ```
//! use gantry_core::{GCodeBuffer, Source};
//!
//! let mut gb = GCodeBuffer::new(Source::Serial);
//! let mut complete = false;
//! for byte in b"G1 X12.5 F300 ; travel\n" {
//!     complete = gb.put(*byte).unwrap();
//! }
//! assert!(complete);
//! assert_eq!(gb.line(), "G1 X12.5 F300 ");
//! assert_eq!(gb.float_field('X'), Some(12.5));
//! ```

use heapless::Vec;

use super::number::{parse_float, parse_int};
use super::source::Source;

/// Longest command line, comment excluded
pub const GCODE_LENGTH: usize = 100;

const COMMENT: u8 = b';';

/// Tokenizer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GCodeError {
    /// Line longer than [`GCODE_LENGTH`]; what was collected is discarded
    Overflow,
    /// Value read without a successful field lookup
    ReadBeforeSeen,
}

impl core::fmt::Display for GCodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GCodeError::Overflow => f.write_str("G-code buffer length overflow"),
            GCodeError::ReadBeforeSeen => f.write_str("value read before a field search"),
        }
    }
}

/// Command buffer for one input source
#[derive(Debug, Clone)]
pub struct GCodeBuffer {
    source: Source,
    line: Vec<u8, GCODE_LENGTH>,
    in_comment: bool,
    /// Dropping the rest of an over-long line
    discarding: bool,
    complete: bool,
    read_pos: Option<usize>,
    finished: bool,
}

impl GCodeBuffer {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            line: Vec::new(),
            in_comment: false,
            discarding: false,
            complete: false,
            read_pos: None,
            finished: true,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Forget the current line
    pub fn init(&mut self) {
        self.line.clear();
        self.in_comment = false;
        self.complete = false;
        self.read_pos = None;
    }

    /// Feed one byte
    ///
    /// Returns `Ok(true)` when the byte completes a line (newline or NUL).
    /// The completed line stays readable until the next byte arrives.
    pub fn put(&mut self, byte: u8) -> Result<bool, GCodeError> {
        if self.complete {
            self.init();
        }

        match byte {
            b'\n' | 0 if self.discarding => {
                self.discarding = false;
                self.init();
                Ok(false)
            }
            b'\n' | 0 => {
                if self.line.last() == Some(&b'\r') {
                    self.line.pop();
                }
                self.in_comment = false;
                self.complete = true;
                Ok(true)
            }
            _ if self.discarding => Ok(false),
            COMMENT => {
                self.in_comment = true;
                Ok(false)
            }
            _ if self.in_comment => Ok(false),
            _ => {
                if self.line.push(byte).is_err() {
                    warn!("{}: line overflow", self.source.prefix());
                    self.init();
                    self.discarding = true;
                    return Err(GCodeError::Overflow);
                }
                Ok(false)
            }
        }
    }

    /// A completed line is held
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Current line text
    ///
    /// Invalid UTF-8 is cut at the first bad byte.
    pub fn line(&self) -> &str {
        match core::str::from_utf8(&self.line) {
            Ok(text) => text,
            Err(e) => core::str::from_utf8(&self.line[..e.valid_up_to()]).unwrap_or(""),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.line
    }

    /// Line holds no command text
    pub fn is_blank(&self) -> bool {
        self.line.iter().all(|b| b.is_ascii_whitespace())
    }

    /// Look for a field letter
    ///
    /// On a match the read position is left just after the letter for the
    /// next value read. On a miss the read position is cleared.
    pub fn seen(&mut self, letter: char) -> bool {
        self.read_pos = if letter.is_ascii() {
            let wanted = letter as u8;
            self.line
                .iter()
                .position(|b| *b == wanted)
                .map(|pos| pos + 1)
        } else {
            None
        };
        self.read_pos.is_some()
    }

    /// Read a float after a successful [`seen`](Self::seen)
    pub fn float_value(&mut self) -> Result<f32, GCodeError> {
        let pos = self.value_start()?;
        Ok(parse_float(&self.line[pos..]))
    }

    /// Read an integer after a successful [`seen`](Self::seen)
    pub fn int_value(&mut self) -> Result<i32, GCodeError> {
        let pos = self.value_start()?;
        Ok(parse_int(&self.line[pos..]))
    }

    fn value_start(&mut self) -> Result<usize, GCodeError> {
        self.read_pos.take().ok_or_else(|| {
            warn!("{}value read before field lookup", self.source.prefix());
            GCodeError::ReadBeforeSeen
        })
    }

    /// Look up a field and read it as a float
    pub fn float_field(&mut self, letter: char) -> Option<f32> {
        if self.seen(letter) {
            self.float_value().ok()
        } else {
            None
        }
    }

    /// Look up a field and read it as an integer
    pub fn int_field(&mut self, letter: char) -> Option<i32> {
        if self.seen(letter) {
            self.int_value().ok()
        } else {
            None
        }
    }

    /// Text after the command word, trimmed (`M23 job.g` gives `job.g`)
    pub fn argument_text(&self) -> &str {
        let line = self.line().trim_start();
        match line.find(|c: char| c.is_ascii_whitespace()) {
            Some(split) => line[split..].trim(),
            None => "",
        }
    }

    /// No command is waiting for more ticks on this buffer
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }
}
