//! Source scheduler
//!
//! One [`Scheduler::spin`] call is one control-loop tick. It does at most
//! one unit of work, picked in strict priority order:
//!
//! 1. Advance an unfinished command: network, then serial, then file
//! 2. Feed one network byte
//! 3. Feed one serial byte
//! 4. Feed one byte of the job file being printed
//!
//! A command that needs several ticks therefore runs to completion before
//! its source is read again, and interactive sources are never starved by
//! a long job file.

use gantry_hal::{ByteSource, FileStore, StorageError};

use crate::config::MachineConfig;
use crate::diagnostics::Diagnostic;
use crate::gcode::{GCodeBuffer, Interpreter, Machine, Source};

/// Interactive byte sources, borrowed for one tick
pub struct Sources<'a> {
    pub network: &'a mut dyn ByteSource,
    pub serial: &'a mut dyn ByteSource,
}

/// Multiplexes the input sources onto one interpreter
#[derive(Debug, Clone)]
pub struct Scheduler {
    interpreter: Interpreter,
    network: GCodeBuffer,
    serial: GCodeBuffer,
    file: GCodeBuffer,
    active: bool,
}

impl Scheduler {
    pub fn new(config: MachineConfig) -> Self {
        Self {
            interpreter: Interpreter::new(config),
            network: GCodeBuffer::new(Source::Network),
            serial: GCodeBuffer::new(Source::Serial),
            file: GCodeBuffer::new(Source::File),
            active: true,
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Command buffer of one source
    pub fn buffer(&self, source: Source) -> &GCodeBuffer {
        match source {
            Source::Network => &self.network,
            Source::Serial => &self.serial,
            Source::File => &self.file,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop servicing sources; later ticks do nothing
    pub fn exit(&mut self) {
        info!("scheduler stopped");
        self.active = false;
    }

    /// Select the job file the next M24 prints
    pub fn queue_file_to_print(
        &mut self,
        name: &str,
        files: &mut dyn FileStore,
    ) -> Result<(), StorageError> {
        self.interpreter.queue_file_to_print(name, files)
    }

    /// Run one control-loop tick
    ///
    /// Returns the source that was serviced, if any.
    pub fn spin(&mut self, sources: &mut Sources<'_>, m: &mut Machine<'_>) -> Option<Source> {
        if !self.active {
            return None;
        }

        let Self {
            interpreter,
            network,
            serial,
            file,
            ..
        } = self;

        for gb in [&mut *network, &mut *serial, &mut *file] {
            if !gb.is_finished() {
                advance(interpreter, gb, m);
                return Some(gb.source());
            }
        }

        if sources.network.available() {
            if let Some(byte) = sources.network.read_byte() {
                feed(interpreter, network, byte, m);
            }
            return Some(Source::Network);
        }

        if sources.serial.available() {
            if let Some(byte) = sources.serial.read_byte() {
                feed(interpreter, serial, byte, m);
            }
            return Some(Source::Serial);
        }

        let handle = interpreter.printing_file()?;
        match m.files.read_byte(handle) {
            Some(byte) => feed(interpreter, file, byte, m),
            None => {
                // Flush a last line with no newline
                feed(interpreter, file, b'\n', m);
                interpreter.finish_print(&mut *m.files);
            }
        }
        Some(Source::File)
    }
}

/// Give an unfinished command one more step
fn advance(interpreter: &mut Interpreter, gb: &mut GCodeBuffer, m: &mut Machine<'_>) {
    let finished = interpreter.process(gb, m);
    gb.set_finished(finished);
}

/// Tokenize one byte; dispatch once if it completes a line
fn feed(interpreter: &mut Interpreter, gb: &mut GCodeBuffer, byte: u8, m: &mut Machine<'_>) {
    match gb.put(byte) {
        Ok(true) => {
            if interpreter.state().tracing() && !gb.is_blank() {
                m.diagnostics.report(&Diagnostic::Echo {
                    source: gb.source(),
                    line: gb.line(),
                });
            }
            advance(interpreter, gb, m);
        }
        Ok(false) => {}
        Err(error) => m.diagnostics.report(&Diagnostic::GCode {
            source: gb.source(),
            error,
        }),
    }
}
