use drcontrol::relay_ctl::InitialState;
use drcontrol::relay_ctl::RelayControlError;
use drcontrol::relay_ctl::RelayController;
use drcontrol::relay_types::InvalidRelayIndex;
use drcontrol::sim_port::SimulatedPort;

fn controller(initial: u8) -> RelayController<SimulatedPort> {
    RelayController::open(SimulatedPort::with_value(initial), InitialState::Resync).unwrap()
}

#[test]
fn turn_on_one_then_five() {
    let mut ctl = controller(0x00);
    ctl.turn_on(1).unwrap();
    ctl.turn_on(5).unwrap();
    assert_eq!(ctl.device().writes().last(), Some(&0x11));
    assert_eq!(ctl.current_state(), 0x11);
}

#[test]
fn turn_off_eight_from_all_on() {
    let mut ctl = controller(0xFF);
    ctl.turn_off(8).unwrap();
    assert_eq!(ctl.device().writes().last(), Some(&0x7F));
    assert_eq!(ctl.current_state(), 0x7F);
}

#[test]
fn out_of_range_relay_touches_nothing() {
    let mut ctl = controller(0x00);
    let writes = ctl.device().writes().len();

    for index in [0, 9] {
        match ctl.turn_on(index) {
            Err(RelayControlError::InvalidRelayIndex(InvalidRelayIndex(n))) => assert_eq!(n, index),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(matches!(
            ctl.turn_off(index),
            Err(RelayControlError::InvalidRelayIndex(_))
        ));
    }

    assert_eq!(ctl.current_state(), 0x00);
    assert_eq!(ctl.device().writes().len(), writes);
}

#[test]
fn failed_write_keeps_cached_state() {
    let mut ctl = controller(0x00);
    ctl.device_mut().fail_writes(true);

    match ctl.turn_on(3) {
        Err(RelayControlError::DeviceWriteError(e)) => assert_eq!(e.value(), 0x04),
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(ctl.current_state(), 0x00);

    ctl.device_mut().fail_writes(false);
    ctl.turn_on(3).unwrap();
    assert_eq!(ctl.current_state(), 0x04);
}

#[test]
fn repeated_commands_write_the_same_byte() {
    let mut ctl = controller(0x00);
    ctl.turn_on(2).unwrap();
    ctl.turn_on(2).unwrap();
    ctl.turn_off(7).unwrap();
    assert_eq!(ctl.device().writes(), &[0x00, 0x02, 0x02, 0x02]);
}

#[test]
fn commands_before_initialize_are_refused() {
    let mut ctl = RelayController::new(SimulatedPort::new());
    assert!(!ctl.is_initialized());
    assert!(matches!(ctl.turn_on(1), Err(RelayControlError::NotInitialized)));
    assert!(ctl.device().writes().is_empty());
}
