//! Command dispatcher
//!
//! [`Interpreter::act_on`] is called on the same completed line once per
//! tick until it stops returning [`Progress::Pending`]. Handlers never
//! wait: anything that depends on the motion subsystem draining, a free
//! handoff slot or a timer reports `Pending` and is re-entered later.

use heapless::Vec;

use gantry_hal::{FileHandle, FileStore, StorageError};

use super::buffer::GCodeBuffer;
use crate::config::{MachineConfig, MAX_AXES};
use crate::diagnostics::{Diagnostic, Diagnostics, JobState, StatusReport};
use crate::motion::{AxisHoming, DwellTimer, HomingSequence, MoveSlot, OperationStack};
use crate::state::{InterpreterState, Progress};
use crate::traits::{tool_heater, HeatSystem, MotionSystem, BED_HEATER};

/// Collaborators borrowed for one tick
pub struct Machine<'a> {
    pub motion: &'a mut dyn MotionSystem,
    pub heat: &'a mut dyn HeatSystem,
    pub files: &'a mut dyn FileStore,
    pub diagnostics: &'a mut dyn Diagnostics,
    /// Handoff slot drained by the motion subsystem
    pub slot: &'a MoveSlot,
    /// Monotonic time in milliseconds
    pub now_ms: u64,
}

/// Job file handles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct PrintJob {
    pub(super) queued: Option<FileHandle>,
    pub(super) printing: Option<FileHandle>,
}

/// G/M/T command interpreter
///
/// Owns all mode state, the operation stack and the compound-command
/// sequencers.
#[derive(Debug, Clone)]
pub struct Interpreter {
    pub(super) config: MachineConfig,
    pub(super) state: InterpreterState,
    pub(super) stack: OperationStack,
    pub(super) homing: HomingSequence,
    pub(super) dwell: DwellTimer,
    pub(super) job: PrintJob,
}

impl Interpreter {
    pub fn new(config: MachineConfig) -> Self {
        let state = InterpreterState::new(&config);
        let stack = OperationStack::new(config.stack_depth as usize);

        Self {
            config,
            state,
            stack,
            homing: HomingSequence::new(),
            dwell: DwellTimer::new(),
            job: PrintJob::default(),
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn stack(&self) -> &OperationStack {
        &self.stack
    }

    pub fn homing(&self) -> &HomingSequence {
        &self.homing
    }

    pub fn dwell(&self) -> &DwellTimer {
        &self.dwell
    }

    /// File currently being printed
    pub fn printing_file(&self) -> Option<FileHandle> {
        self.job.printing
    }

    pub fn job_state(&self) -> JobState {
        match (self.job.printing, self.job.queued) {
            (Some(_), _) => JobState::Printing,
            (None, Some(_)) => JobState::Queued,
            (None, None) => JobState::Idle,
        }
    }

    /// Open `name` in the job directory as the next job
    ///
    /// A previously queued job that never started is closed.
    pub fn queue_file_to_print(
        &mut self,
        name: &str,
        files: &mut dyn FileStore,
    ) -> Result<(), StorageError> {
        let handle = files.open(self.config.gcode_dir.as_str(), name)?;
        if let Some(old) = self.job.queued.replace(handle) {
            files.close(old);
        }
        info!("queued job file {}", name);
        Ok(())
    }

    /// The printing job hit end of file
    pub fn finish_print(&mut self, files: &mut dyn FileStore) {
        if let Some(file) = self.job.printing.take() {
            files.close(file);
            info!("job file finished");
        }
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            axes_relative: self.state.axes_relative,
            drives_relative: self.state.drives_relative,
            distance_scale: self.state.distance_scale,
            feed_rate: self.state.feed_rate,
            selected_tool: self.state.selected_tool,
            stack_depth: self.stack.depth(),
            homing: self.homing.is_active(),
            dwelling: self.dwell.is_waiting(),
            job: self.job_state(),
        }
    }

    /// Run one step of the command held in `gb`
    ///
    /// Faults are reported and count as finished. Returns whether the
    /// command is finished.
    pub fn process(&mut self, gb: &mut GCodeBuffer, m: &mut Machine<'_>) -> bool {
        match self.act_on(gb, m) {
            Progress::Failed(fault) => {
                warn!("command failed: {}", fault);
                m.diagnostics.report(&Diagnostic::Fault(fault));
                true
            }
            progress => progress.is_finished(),
        }
    }

    /// Run one step of the command held in `gb`
    pub fn act_on(&mut self, gb: &mut GCodeBuffer, m: &mut Machine<'_>) -> Progress {
        if let Some(code) = gb.int_field('G') {
            return self.act_on_g(code, gb, m);
        }
        if let Some(code) = gb.int_field('M') {
            return self.act_on_m(code, gb, m);
        }
        if let Some(tool) = gb.int_field('T') {
            self.change_tool(tool, m);
            return Progress::Done;
        }

        if !gb.is_blank() {
            trace!("ignoring line without a command");
        }
        Progress::Done
    }

    fn act_on_g(&mut self, code: i32, gb: &mut GCodeBuffer, m: &mut Machine<'_>) -> Progress {
        match code {
            0 | 1 => self.set_up_move(gb, m),
            4 => self.do_dwell(gb, m),
            10 => {
                self.set_offsets(gb, m);
                Progress::Done
            }
            20 => {
                self.state.set_inches(true);
                Progress::Done
            }
            21 => {
                self.state.set_inches(false);
                Progress::Done
            }
            28 => self.do_home(gb, m),
            90 => {
                self.state.set_relative(false);
                Progress::Done
            }
            91 => {
                self.state.set_relative(true);
                Progress::Done
            }
            92 => notice(m, "Set position received"),
            _ => invalid(m, 'G', gb),
        }
    }

    fn act_on_m(&mut self, code: i32, gb: &mut GCodeBuffer, m: &mut Machine<'_>) -> Progress {
        match code {
            0 | 1 => notice(m, "Stop/sleep received"),
            18 | 84 => {
                m.motion.disable_drives();
                notice(m, "Motors off received")
            }
            23 => {
                self.select_file(gb, m);
                Progress::Done
            }
            24 => {
                self.start_print(m);
                Progress::Done
            }
            25 => {
                self.pause_print(m);
                Progress::Done
            }
            82 => {
                self.state.drives_relative = false;
                Progress::Done
            }
            83 => {
                self.state.drives_relative = true;
                Progress::Done
            }
            104 => {
                self.set_tool_temperature(gb, m);
                Progress::Done
            }
            106 => notice(m, "Fan on received"),
            107 => notice(m, "Fan off received"),
            111 => {
                if let Some(level) = gb.int_field('S') {
                    self.state.debug_level = level.clamp(0, u8::MAX as i32) as u8;
                    debug!("debug level {}", self.state.debug_level);
                }
                Progress::Done
            }
            116 => notice(m, "Wait for all temperatures received"),
            120 => self.push_command(m),
            121 => self.pop(m),
            122 => {
                m.diagnostics.report(&Diagnostic::Status(self.status()));
                Progress::Done
            }
            126 | 127 | 141 => {
                m.diagnostics
                    .report(&Diagnostic::NotImplemented { family: 'M', code });
                Progress::Done
            }
            140 => {
                if let Some(celsius) = gb.float_field('S') {
                    m.heat.set_active_temperature(BED_HEATER, celsius);
                    m.heat.activate(BED_HEATER);
                }
                Progress::Done
            }
            _ => invalid(m, 'M', gb),
        }
    }

    /// T code: swap the active tool head
    fn change_tool(&mut self, tool: i32, m: &mut Machine<'_>) {
        if self.state.selected_tool.map(i32::from) == Some(tool) {
            return;
        }

        // The old head idles even when the new one turns out not to exist
        if let Some(old) = self.state.selected_tool {
            m.heat.standby(tool_heater(old));
        }

        let Some(new_tool) = self.tool_index(tool) else {
            m.diagnostics.report(&Diagnostic::InvalidTool { tool });
            return;
        };

        m.heat.activate(tool_heater(new_tool));
        self.state.selected_tool = Some(new_tool);
        debug!("selected tool {}", new_tool);
    }

    /// Tool number backed by an extruder drive
    fn tool_index(&self, tool: i32) -> Option<u8> {
        u8::try_from(tool)
            .ok()
            .filter(|t| (*t as usize) < self.config.extruder_count())
    }

    /// G10: tool temperatures
    fn set_offsets(&mut self, gb: &mut GCodeBuffer, m: &mut Machine<'_>) {
        let Some(tool) = gb.int_field('P') else {
            return;
        };
        let Some(tool) = self.tool_index(tool) else {
            m.diagnostics.report(&Diagnostic::InvalidTool { tool });
            return;
        };
        let heater = tool_heater(tool);

        if let Some(celsius) = gb.float_field('R') {
            m.heat.set_standby_temperature(heater, celsius);
        }
        if let Some(celsius) = gb.float_field('S') {
            m.heat.set_active_temperature(heater, celsius);
        }

        let offsets = self
            .config
            .axes
            .iter()
            .any(|axis| gb.seen(axis.letter));
        if offsets {
            m.diagnostics
                .report(&Diagnostic::NotImplemented { family: 'G', code: 10 });
        }
    }

    /// M104: active temperature of the given or selected tool
    fn set_tool_temperature(&mut self, gb: &mut GCodeBuffer, m: &mut Machine<'_>) {
        let Some(celsius) = gb.float_field('S') else {
            return;
        };

        let tool = match gb.int_field('T') {
            Some(tool) => match self.tool_index(tool) {
                Some(tool) => tool,
                None => {
                    m.diagnostics.report(&Diagnostic::InvalidTool { tool });
                    return;
                }
            },
            None => match self.state.selected_tool {
                Some(tool) => tool,
                None => {
                    m.diagnostics.report(&Diagnostic::Notice("M104: no tool selected"));
                    return;
                }
            },
        };

        m.heat.set_active_temperature(tool_heater(tool), celsius);
    }

    /// G4: pause for P milliseconds or S seconds once motion has drained
    fn do_dwell(&mut self, gb: &mut GCodeBuffer, m: &mut Machine<'_>) -> Progress {
        let millis = match (gb.float_field('P'), gb.float_field('S')) {
            (Some(ms), _) => ms,
            (None, Some(seconds)) => seconds * 1000.0,
            (None, None) => return Progress::Done,
        };
        // Negative and NaN durations saturate to zero
        let duration_ms = millis as u64;

        let drained = self.dwell.is_waiting() || (m.slot.is_empty() && m.motion.all_moves_finished());
        self.dwell.poll(m.now_ms, duration_ms, drained)
    }

    /// G28: home the named axes (all if none named), one at a time
    fn do_home(&mut self, gb: &mut GCodeBuffer, m: &mut Machine<'_>) -> Progress {
        if !self.homing.is_active() {
            let mut axes: Vec<usize, MAX_AXES> = Vec::new();
            for (index, axis) in self.config.axes.iter().enumerate() {
                if gb.seen(axis.letter) {
                    let _ = axes.push(index);
                }
            }
            if axes.is_empty() {
                self.homing.request(0..self.config.axis_count());
            } else {
                self.homing.request(axes);
            }
        }

        let Some((axis, state)) = self.homing.current() else {
            return Progress::Done;
        };
        if axis >= self.config.axis_count() {
            self.homing.mark_homed(axis);
            return Progress::Pending;
        }

        match state {
            AxisHoming::Requested => match self.start_homing_move(axis, m) {
                Ok(true) => {
                    self.homing.mark_queued(axis);
                    debug!("homing axis {}", axis);
                    Progress::Pending
                }
                Ok(false) => Progress::Pending,
                Err(fault) => {
                    self.homing.abort();
                    Progress::Failed(fault)
                }
            },
            AxisHoming::Queued => match self.pop(m) {
                Progress::Done => {
                    self.homing.mark_homed(axis);
                    if self.homing.is_active() {
                        Progress::Pending
                    } else {
                        Progress::Done
                    }
                }
                Progress::Pending => Progress::Pending,
                Progress::Failed(fault) => {
                    self.homing.abort();
                    Progress::Failed(fault)
                }
            },
            AxisHoming::Idle => Progress::Done,
        }
    }

    /// M23: select a job file
    fn select_file(&mut self, gb: &mut GCodeBuffer, m: &mut Machine<'_>) {
        let name = gb.argument_text();
        if name.is_empty() {
            m.diagnostics.report(&Diagnostic::Notice("M23: no file name"));
            return;
        }
        if let Err(error) = self.queue_file_to_print(name, &mut *m.files) {
            m.diagnostics.report(&Diagnostic::Storage { name, error });
        }
    }

    /// M24: start or resume the queued job
    fn start_print(&mut self, m: &mut Machine<'_>) {
        let Some(file) = self.job.queued.take() else {
            m.diagnostics.report(&Diagnostic::Notice("M24: no file selected"));
            return;
        };
        if let Some(old) = self.job.printing.replace(file) {
            m.files.close(old);
        }
    }

    /// M25: pause the printing job, keeping it queued
    fn pause_print(&mut self, m: &mut Machine<'_>) {
        let Some(file) = self.job.printing.take() else {
            return;
        };
        if let Some(old) = self.job.queued.replace(file) {
            m.files.close(old);
        }
    }
}

fn notice(m: &mut Machine<'_>, text: &'static str) -> Progress {
    m.diagnostics.report(&Diagnostic::Notice(text));
    Progress::Done
}

fn invalid(m: &mut Machine<'_>, family: char, gb: &GCodeBuffer) -> Progress {
    m.diagnostics.report(&Diagnostic::InvalidCode {
        family,
        line: gb.line(),
    });
    Progress::Done
}
