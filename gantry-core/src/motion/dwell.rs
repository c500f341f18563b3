//! Dwell timer

use crate::state::Progress;

/// Dwell timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DwellState {
    #[default]
    Idle,
    /// Pausing until `deadline_ms`
    Waiting { deadline_ms: u64 },
}

/// Non-blocking pause of a fixed duration
///
/// The pause only starts once queued motion has drained; until then, and
/// until the deadline passes, [`poll`](Self::poll) reports
/// [`Progress::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DwellTimer {
    state: DwellState,
}

impl DwellTimer {
    pub const fn new() -> Self {
        Self {
            state: DwellState::Idle,
        }
    }

    pub fn state(&self) -> DwellState {
        self.state
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.state, DwellState::Waiting { .. })
    }

    /// Advance the dwell
    ///
    /// `drained` is only consulted before the pause has started.
    pub fn poll(&mut self, now_ms: u64, duration_ms: u64, drained: bool) -> Progress {
        match self.state {
            DwellState::Waiting { deadline_ms } => {
                if now_ms >= deadline_ms {
                    self.state = DwellState::Idle;
                    Progress::Done
                } else {
                    Progress::Pending
                }
            }
            DwellState::Idle => {
                if drained {
                    self.state = DwellState::Waiting {
                        deadline_ms: now_ms.saturating_add(duration_ms),
                    };
                }
                Progress::Pending
            }
        }
    }
}
