//! Single-slot motion handoff
//!
//! The interpreter publishes at most one [`MotionRequest`] at a time; the
//! motion subsystem (usually interrupt-driven) takes it. The slot is a
//! critical-section mutex around a `Cell`, so it can live in a `static`
//! shared between the two execution contexts:
//!
//! ```
//! use gantry_core::MoveSlot;
//!
//! static MOVES: MoveSlot = MoveSlot::new();
//!
//! assert!(MOVES.is_empty());
//! assert!(MOVES.try_receive().is_none());
//! ```

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::request::MotionRequest;
use crate::traits::MotionSink;

/// The previous request has not been taken yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotBusy;

/// Single-item mailbox between interpretation and motion execution
pub struct MoveSlot {
    slot: Mutex<CriticalSectionRawMutex, Cell<Option<MotionRequest>>>,
}

impl MoveSlot {
    /// Create an empty slot
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Publish a request
    ///
    /// Fails without touching the slot if the previous request is still
    /// there.
    pub fn try_send(&self, request: MotionRequest) -> Result<(), SlotBusy> {
        self.slot.lock(|slot| {
            if slot.get().is_some() {
                return Err(SlotBusy);
            }
            slot.set(Some(request));
            Ok(())
        })
    }

    /// Take the pending request, leaving the slot empty
    ///
    /// The endstop flag travels with the request and is gone from the slot
    /// once taken.
    pub fn try_receive(&self) -> Option<MotionRequest> {
        self.slot.lock(|slot| slot.take())
    }

    /// No request is waiting
    pub fn is_empty(&self) -> bool {
        self.slot.lock(|slot| slot.get().is_none())
    }

    /// Offer the pending request to `sink`
    ///
    /// The slot is cleared only if the sink accepts. Returns whether a
    /// request was handed over. The sink runs inside the critical section.
    pub fn forward<S: MotionSink + ?Sized>(&self, sink: &mut S) -> bool {
        self.slot.lock(|slot| match slot.get() {
            Some(request) if sink.accept(&request) => {
                slot.set(None);
                true
            }
            _ => false,
        })
    }
}

impl Default for MoveSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;
    use crate::motion::Position;

    fn request(x: f32) -> MotionRequest {
        let mut req = MotionRequest::hold(&Position::origin(5.0), &MachineConfig::default());
        req.set_axis(0, x);
        req
    }

    struct Picky {
        accept: bool,
        taken: Option<MotionRequest>,
    }

    impl MotionSink for Picky {
        fn accept(&mut self, request: &MotionRequest) -> bool {
            if self.accept {
                self.taken = Some(*request);
            }
            self.accept
        }
    }

    #[test]
    fn test_send_receive() {
        let slot = MoveSlot::new();
        assert!(slot.is_empty());
        assert_eq!(slot.try_send(request(1.0)), Ok(()));
        assert!(!slot.is_empty());
        assert_eq!(slot.try_receive(), Some(request(1.0)));
        assert!(slot.is_empty());
        assert_eq!(slot.try_receive(), None);
    }

    #[test]
    fn test_second_send_rejected() {
        let slot = MoveSlot::new();
        slot.try_send(request(1.0)).unwrap();
        assert_eq!(slot.try_send(request(2.0)), Err(SlotBusy));
        assert_eq!(slot.try_receive(), Some(request(1.0)));
    }

    #[test]
    fn test_endstop_flag_cleared_on_receive() {
        let slot = MoveSlot::new();
        let mut homing = request(-420.0);
        homing.set_check_endstops(true);
        slot.try_send(homing).unwrap();

        assert!(slot.try_receive().unwrap().check_endstops());
        slot.try_send(request(0.0)).unwrap();
        assert!(!slot.try_receive().unwrap().check_endstops());
    }

    #[test]
    fn test_forward_only_clears_when_accepted() {
        let slot = MoveSlot::new();
        slot.try_send(request(7.0)).unwrap();

        let mut sink = Picky {
            accept: false,
            taken: None,
        };
        assert!(!slot.forward(&mut sink));
        assert!(!slot.is_empty());

        sink.accept = true;
        assert!(slot.forward(&mut sink));
        assert!(slot.is_empty());
        assert_eq!(sink.taken, Some(request(7.0)));
        assert!(!slot.forward(&mut sink));
    }
}
