//! Outcome of a non-blocking operation

/// Faults an operation can end in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Push onto a full operation stack
    StackOverflow,
    /// Pop from an empty operation stack
    StackUnderflow,
    /// Motion slot was occupied when a request was published
    HandoffBusy,
}

impl Fault {
    /// Short human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Fault::StackOverflow => "Push(): stack overflow",
            Fault::StackUnderflow => "Pop(): stack underflow",
            Fault::HandoffBusy => "motion slot busy",
        }
    }
}

impl core::fmt::Display for Fault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tri-state result of a command or sub-operation
///
/// `Pending` means "call me again next tick with the same input"; it never
/// means failure. The dispatcher reports `Failed` and then treats the
/// command as finished so a bad line cannot stall its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// Completed
    Done,
    /// Not yet possible, retry later
    Pending,
    /// Ended in a fault
    Failed(Fault),
}

impl Progress {
    /// Completed (successfully or not); the source may move on
    pub fn is_finished(&self) -> bool {
        !matches!(self, Progress::Pending)
    }
}
