//! Host-side collaborators for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use gantry_core::config::MAX_EXTRUDERS;
use gantry_core::{
    DiagnosticLog, HeatSystem, MachineConfig, Machine, MotionRequest, MotionSystem, MoveSlot,
    Position, Scheduler, Source, Sources,
};
use gantry_hal::{ByteSource, FileHandle, FileStore, StorageError};

/// Motion subsystem that executes whatever it takes from the slot
pub struct MockMotion {
    pub position: Position,
    /// Moves taken but not finished
    pub in_flight: usize,
    pub executed: Vec<MotionRequest>,
    pub disabled: bool,
}

impl MockMotion {
    pub fn new() -> Self {
        Self {
            position: Position::origin(3.0),
            in_flight: 0,
            executed: Vec::new(),
            disabled: false,
        }
    }

    /// Take the pending request, if any, and resolve its end position
    pub fn take(&mut self, slot: &MoveSlot) -> Option<MotionRequest> {
        let request = slot.try_receive()?;
        for (index, target) in request.axes().iter().enumerate() {
            if request.check_endstops() && *target != self.position.axes[index] {
                // Stopped by the endstop
                self.position.axes[index] = 0.0;
            } else {
                self.position.axes[index] = *target;
            }
        }
        for (index, delta) in request.extruder_deltas().iter().enumerate() {
            self.position.extruders[index] += delta;
        }
        self.position.feed_rate = request.feed_rate();
        self.in_flight += 1;
        self.executed.push(request);
        Some(request)
    }

    pub fn finish_all(&mut self) {
        self.in_flight = 0;
    }

    pub fn extruder_deltas(&self) -> Vec<f32> {
        self.executed
            .iter()
            .map(|r| r.extruder_delta(0).unwrap_or(0.0))
            .collect()
    }

    pub fn axis_targets(&self, axis: usize) -> Vec<f32> {
        self.executed
            .iter()
            .map(|r| r.axis(axis).unwrap_or(0.0))
            .collect()
    }
}

impl MotionSystem for MockMotion {
    fn all_moves_finished(&mut self) -> bool {
        self.in_flight == 0
    }

    fn current_position(&mut self) -> Option<Position> {
        Some(self.position)
    }

    fn disable_drives(&mut self) {
        self.disabled = true;
    }
}

/// Heater targets by heater index
#[derive(Default)]
pub struct MockHeat {
    pub active: HashMap<usize, f32>,
    pub standby: HashMap<usize, f32>,
    pub on: HashMap<usize, bool>,
    /// Heaters passed to `activate`, in call order
    pub activations: Vec<usize>,
    /// Heaters passed to `standby`, in call order
    pub standbys: Vec<usize>,
}

impl HeatSystem for MockHeat {
    fn set_active_temperature(&mut self, heater: usize, celsius: f32) {
        self.active.insert(heater, celsius);
    }

    fn set_standby_temperature(&mut self, heater: usize, celsius: f32) {
        self.standby.insert(heater, celsius);
    }

    fn activate(&mut self, heater: usize) {
        self.activations.push(heater);
        self.on.insert(heater, true);
    }

    fn standby(&mut self, heater: usize) {
        self.standbys.push(heater);
        self.on.insert(heater, false);
    }
}

/// In-memory file store keyed by full path
pub struct MockFiles {
    pub files: HashMap<String, Vec<u8>>,
    pub open: HashMap<u8, (String, usize)>,
    pub max_open: usize,
    next: u8,
}

impl MockFiles {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            open: HashMap::new(),
            max_open: gantry_hal::storage::MAX_FILES,
            next: 0,
        }
    }

    pub fn add(&mut self, path: &str, text: &str) {
        self.files.insert(path.to_string(), text.as_bytes().to_vec());
    }
}

impl FileStore for MockFiles {
    fn open(&mut self, directory: &str, name: &str) -> Result<FileHandle, StorageError> {
        let path = format!("{}{}", directory, name);
        if !self.files.contains_key(&path) {
            return Err(StorageError::NotFound);
        }
        if self.open.len() >= self.max_open {
            return Err(StorageError::NoFreeHandle);
        }
        let handle = self.next;
        self.next = self.next.wrapping_add(1);
        self.open.insert(handle, (path, 0));
        Ok(FileHandle(handle))
    }

    fn read_byte(&mut self, file: FileHandle) -> Option<u8> {
        let (path, pos) = self.open.get_mut(&file.0)?;
        let byte = *self.files.get(path)?.get(*pos)?;
        *pos += 1;
        Some(byte)
    }

    fn close(&mut self, file: FileHandle) {
        self.open.remove(&file.0);
    }
}

/// Byte source fed by the test
#[derive(Default)]
pub struct Script {
    bytes: VecDeque<u8>,
}

impl Script {
    pub fn send(&mut self, text: &str) {
        self.bytes.extend(text.bytes());
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl ByteSource for Script {
    fn available(&mut self) -> bool {
        !self.bytes.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }
}

/// A scheduler wired to mocks
pub struct Rig {
    pub scheduler: Scheduler,
    pub motion: MockMotion,
    pub heat: MockHeat,
    pub files: MockFiles,
    pub log: DiagnosticLog<32>,
    pub slot: MoveSlot,
    pub network: Script,
    pub serial: Script,
    pub now_ms: u64,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            scheduler: Scheduler::new(config),
            motion: MockMotion::new(),
            heat: MockHeat::default(),
            files: MockFiles::new(),
            log: DiagnosticLog::new(),
            slot: MoveSlot::new(),
            network: Script::default(),
            serial: Script::default(),
            now_ms: 0,
        }
    }

    /// One scheduler tick; the motion side does nothing
    pub fn tick(&mut self) -> Option<Source> {
        let mut sources = Sources {
            network: &mut self.network,
            serial: &mut self.serial,
        };
        let mut m = Machine {
            motion: &mut self.motion,
            heat: &mut self.heat,
            files: &mut self.files,
            diagnostics: &mut self.log,
            slot: &self.slot,
            now_ms: self.now_ms,
        };
        self.scheduler.spin(&mut sources, &mut m)
    }

    /// Motion takes the pending request and finishes everything
    pub fn drain(&mut self) {
        self.motion.take(&self.slot);
        self.motion.finish_all();
    }

    /// Alternate ticks and drains until nothing is left to do
    pub fn settle(&mut self) {
        for _ in 0..10_000 {
            let serviced = self.tick();
            self.drain();
            if serviced.is_none() && self.slot.is_empty() {
                return;
            }
        }
        panic!("rig did not settle");
    }

    /// Every source buffer is idle
    pub fn all_finished(&self) -> bool {
        Source::ALL
            .iter()
            .all(|s| self.scheduler.buffer(*s).is_finished())
    }

    pub fn messages(&self) -> Vec<String> {
        self.log.iter().map(str::to_string).collect()
    }

    pub fn last_extruder_pos(&self) -> [f32; MAX_EXTRUDERS] {
        self.scheduler.interpreter().state().last_extruder_pos
    }
}
