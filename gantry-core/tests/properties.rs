//! Property tests for the tokenizer, handoff slot, save stack and homing

mod common;

use common::Rig;
use gantry_core::gcode::GCODE_LENGTH;
use gantry_core::motion::{AxisHoming, SlotBusy};
use gantry_core::{GCodeBuffer, MachineConfig, MotionRequest, MoveSlot, Position, Source};
use proptest::prelude::*;

fn line_byte() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("line terminators", |b| !matches!(b, b'\n' | b'\r' | 0))
}

fn request(x: f32) -> MotionRequest {
    let mut request = MotionRequest::hold(&Position::origin(1.0), &MachineConfig::default());
    request.set_axis(0, x);
    request
}

#[derive(Debug, Clone)]
enum SlotOp {
    Send(i16),
    Receive,
}

fn slot_op() -> impl Strategy<Value = SlotOp> {
    prop_oneof![any::<i16>().prop_map(SlotOp::Send), Just(SlotOp::Receive)]
}

/// Commands that change what the save stack preserves
fn mode_command() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("G90".to_string()),
        Just("G91".to_string()),
        Just("M82".to_string()),
        Just("M83".to_string()),
        (1u16..20000).prop_map(|f| format!("G1 F{}", f)),
    ]
}

proptest! {
    #[test]
    fn prop_tokenizer_yields_non_comment_prefix(
        bytes in proptest::collection::vec(line_byte(), 0..GCODE_LENGTH)
    ) {
        let mut gb = GCodeBuffer::new(Source::Serial);
        for byte in &bytes {
            prop_assert_eq!(gb.put(*byte), Ok(false));
        }
        prop_assert_eq!(gb.put(b'\n'), Ok(true));

        let prefix = match bytes.iter().position(|b| *b == b';') {
            Some(end) => &bytes[..end],
            None => &bytes[..],
        };
        prop_assert_eq!(gb.bytes(), prefix);
    }

    #[test]
    fn prop_field_round_trip(x in -100_000i32..100_000, f in 1i32..1_000_000) {
        let x = x as f32 / 100.0;
        let f = f as f32 / 100.0;
        let mut gb = GCodeBuffer::new(Source::Network);
        for byte in format!("G1 X{} F{}\n", x, f).bytes() {
            gb.put(byte).unwrap();
        }

        prop_assert!(gb.seen('X'));
        prop_assert_eq!(gb.float_value(), Ok(x));
        prop_assert!(!gb.seen('Y'));
        prop_assert!(gb.seen('F'));
        prop_assert_eq!(gb.float_value(), Ok(f));
    }

    #[test]
    fn prop_at_most_one_outstanding(ops in proptest::collection::vec(slot_op(), 1..64)) {
        let slot = MoveSlot::new();
        let mut model: Option<MotionRequest> = None;

        for op in ops {
            match op {
                SlotOp::Send(x) => {
                    let result = slot.try_send(request(x as f32));
                    if model.is_some() {
                        prop_assert_eq!(result, Err(SlotBusy));
                    } else {
                        prop_assert_eq!(result, Ok(()));
                        model = Some(request(x as f32));
                    }
                }
                SlotOp::Receive => {
                    prop_assert_eq!(slot.try_receive(), model.take());
                }
            }
            prop_assert_eq!(slot.is_empty(), model.is_none());
        }
    }

    #[test]
    fn prop_stack_balance(
        setup in proptest::collection::vec(mode_command(), 0..4),
        frames in proptest::collection::vec(
            proptest::collection::vec(mode_command(), 0..3),
            1..=5,
        ),
    ) {
        let mut rig = Rig::new();
        for command in &setup {
            rig.serial.send(command);
            rig.serial.send("\n");
        }
        rig.settle();
        let before = *rig.scheduler.interpreter().state();

        for changes in &frames {
            rig.serial.send("M120\n");
            for command in changes {
                rig.serial.send(command);
                rig.serial.send("\n");
            }
        }
        for _ in &frames {
            rig.serial.send("M121\n");
        }
        rig.settle();

        let after = rig.scheduler.interpreter().state();
        prop_assert_eq!(after.axes_relative, before.axes_relative);
        prop_assert_eq!(after.drives_relative, before.drives_relative);
        prop_assert_eq!(after.feed_rate, before.feed_rate);
        prop_assert_eq!(rig.scheduler.interpreter().stack().depth(), 0);
        prop_assert!(rig.messages().is_empty());
    }

    #[test]
    fn prop_homing_is_sequential(motion_steps in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..200)) {
        let mut rig = Rig::new();
        rig.serial.send("G28 X Z\n");

        let mut x_queued = false;
        let mut steps = motion_steps.into_iter();
        for _ in 0..2_000 {
            rig.tick();
            let (take, finish) = steps.next().unwrap_or((true, true));
            if take {
                rig.motion.take(&rig.slot);
            }
            if finish {
                rig.motion.finish_all();
            }

            let homing = rig.scheduler.interpreter().homing();
            let queued = (0..3).filter(|a| homing.state(*a) == AxisHoming::Queued).count();
            prop_assert!(queued <= 1);
            prop_assert_eq!(homing.state(1), AxisHoming::Idle);

            if homing.state(0) == AxisHoming::Queued {
                x_queued = true;
            }
            if homing.state(2) == AxisHoming::Queued {
                prop_assert!(x_queued);
                prop_assert_eq!(homing.state(0), AxisHoming::Idle);
            }
            if rig.all_finished() && rig.serial.is_empty() {
                break;
            }
        }

        prop_assert!(rig.all_finished());
        prop_assert!(x_queued);
        let homes: Vec<_> = rig.motion.executed.iter().filter(|r| r.check_endstops()).collect();
        prop_assert_eq!(homes.len(), 2);
        prop_assert_eq!(homes[0].axis(0), Some(-420.0));
        prop_assert_eq!(homes[1].axis(2), Some(-240.0));
    }
}
