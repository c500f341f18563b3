//! Gantry Hardware Abstraction Layer
//!
//! This crate defines the traits through which the command interpreter
//! reaches the outside world: byte-at-a-time command sources (network,
//! serial) and the job-file store. Board support crates implement them;
//! the interpreter core only ever sees the traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  gantry-core (tokenizer, scheduler...)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gantry-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  UART / USB   │       │   SD card     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::ByteSource`] - Non-blocking byte stream (serial, network)
//! - [`storage::FileStore`] - Job files opened by name within a directory

#![no_std]
#![deny(unsafe_code)]

pub mod serial;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use serial::{ByteSource, IoSource, Silent, SliceSource};
pub use storage::{FileHandle, FileStore, NoStorage, StorageError};
