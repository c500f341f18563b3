//! Byte-stream command sources
//!
//! The control loop pulls at most one byte per tick from a source, so the
//! trait is deliberately poll-shaped: ask whether a byte is waiting, then
//! take it. Nothing here may block.

use embedded_io::{Read, ReadReady};

/// Non-blocking byte source
///
/// Implemented by the serial port, by the network command queue, and by
/// anything else that produces G-code text one byte at a time.
pub trait ByteSource {
    /// Check whether a byte can be read without blocking
    fn available(&mut self) -> bool;

    /// Take the next byte
    ///
    /// Returns `None` when nothing is waiting (or the read failed).
    fn read_byte(&mut self) -> Option<u8>;
}

/// Adapter exposing an `embedded-io` reader as a [`ByteSource`]
///
/// Read errors are reported as "nothing available"; the interpreter has no
/// way to recover a half-received byte anyway.
#[derive(Debug)]
pub struct IoSource<T> {
    inner: T,
}

impl<T> IoSource<T> {
    /// Wrap a reader
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Give the reader back
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + ReadReady> ByteSource for IoSource<T> {
    fn available(&mut self) -> bool {
        self.inner.read_ready().unwrap_or(false)
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }
}

/// Byte source over an in-memory slice
///
/// Used for canned command text (start-up macros, host-side tests).
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Create a source that yields `data` once
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl ByteSource for SliceSource<'_> {
    fn available(&mut self) -> bool {
        self.pos < self.data.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }
}

/// A source that never has anything to say
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl ByteSource for Silent {
    fn available(&mut self) -> bool {
        false
    }

    fn read_byte(&mut self) -> Option<u8> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_drains_once() {
        let mut src = SliceSource::new(b"G1");
        assert!(src.available());
        assert_eq!(src.read_byte(), Some(b'G'));
        assert_eq!(src.remaining(), 1);
        assert_eq!(src.read_byte(), Some(b'1'));
        assert!(!src.available());
        assert_eq!(src.read_byte(), None);
    }

    #[test]
    fn test_silent_source() {
        let mut src = Silent;
        assert!(!src.available());
        assert_eq!(src.read_byte(), None);
    }

    struct Loopback {
        byte: Option<u8>,
    }

    impl embedded_io::ErrorType for Loopback {
        type Error = core::convert::Infallible;
    }

    impl Read for Loopback {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            match self.byte.take() {
                Some(b) if !buf.is_empty() => {
                    buf[0] = b;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    impl ReadReady for Loopback {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(self.byte.is_some())
        }
    }

    #[test]
    fn test_io_source_adapter() {
        let mut src = IoSource::new(Loopback { byte: Some(b'M') });
        assert!(src.available());
        assert_eq!(src.read_byte(), Some(b'M'));
        assert!(!src.available());
        assert_eq!(src.read_byte(), None);
    }
}
