use std::io::BufRead;
use std::io::Lines;
use std::io::Write;

use anyhow::Result;
use log::debug;

use crate::port::PortDevice;
use crate::relay_ctl::RelayControlError;
use crate::relay_ctl::RelayController;
use crate::relay_types::RelayIndex;
use crate::relay_types::RelayState;

const ASK_RELAY: &str = "Which relay do you want to control? (1-8): ";
const ASK_ACTION: &str = "Do you want to turn it ON or OFF? (on/off): ";
const ASK_CONTINUE: &str = "Do you want to control another relay? (yes/no): ";

pub fn run<D, R, W>(ctl: &mut RelayController<D>, input: R, out: &mut W) -> Result<()>
where
    D: PortDevice,
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        let answer = match prompt(&mut lines, out, ASK_RELAY)? {
            Some(answer) => answer,
            None => return Ok(()),
        };
        let relay = match answer.trim().parse::<i64>() {
            Ok(relay) => relay,
            Err(_) => {
                writeln!(
                    out,
                    "Invalid input. Please enter a number for the relay and 'on' or 'off' for the action."
                )?;
                continue;
            }
        };
        let relay = match u8::try_from(relay).ok().and_then(|r| RelayIndex::new(r).ok()) {
            Some(relay) => relay,
            None => {
                writeln!(out, "Please enter a valid relay number between 1 and 8.")?;
                continue;
            }
        };

        let answer = match prompt(&mut lines, out, ASK_ACTION)? {
            Some(answer) => answer,
            None => return Ok(()),
        };
        let state = match answer.parse::<RelayState>() {
            Ok(state) => state,
            Err(_) => {
                writeln!(out, "Invalid action. Please type 'on' or 'off'.")?;
                continue;
            }
        };

        match ctl.set(relay, state) {
            Ok(()) => writeln!(
                out,
                "Relay {} has been turned {}.",
                relay.get(),
                state.to_string().to_uppercase()
            )?,
            Err(RelayControlError::DeviceWriteError(e)) => {
                writeln!(out, "Error: {:#}", anyhow::Error::new(e))?;
                writeln!(out, "The relay was not switched, you can repeat the command.")?;
            }
            Err(e) => return Err(e.into()),
        }

        let answer = match prompt(&mut lines, out, ASK_CONTINUE)? {
            Some(answer) => answer,
            None => return Ok(()),
        };
        if answer.trim().to_lowercase() != "yes" {
            writeln!(out, "Exiting the control script.")?;
            return Ok(());
        }
    }
}

fn prompt<B, W>(lines: &mut Lines<B>, out: &mut W, question: &str) -> Result<Option<String>>
where
    B: BufRead,
    W: Write,
{
    write!(out, "{}", question)?;
    out.flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => {
            debug!("Input closed");
            writeln!(out)?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay_ctl::InitialState;
    use crate::sim_port::SimulatedPort;

    fn session(input: &str) -> (RelayController<SimulatedPort>, String) {
        let mut ctl = RelayController::open(SimulatedPort::new(), InitialState::AllOff).unwrap();
        let mut out = Vec::new();
        run(&mut ctl, input.as_bytes(), &mut out).unwrap();
        (ctl, String::from_utf8(out).unwrap())
    }

    #[test]
    fn switches_relays_until_user_stops() {
        let (ctl, out) = session("1\non\nyes\n5\nON\nno\n");
        assert_eq!(ctl.current_state(), 0x11);
        assert!(out.contains("Relay 1 has been turned ON."));
        assert!(out.contains("Relay 5 has been turned ON."));
        assert!(out.ends_with("Exiting the control script.\n"));
    }

    #[test]
    fn bad_input_reprompts_without_touching_the_port() {
        let (ctl, out) = session("abc\n9\n0\n3\ntoggle\n");
        assert!(out.contains("Invalid input."));
        assert!(out.contains("Please enter a valid relay number between 1 and 8."));
        assert!(out.contains("Invalid action."));
        assert_eq!(ctl.device().writes(), &[0x00]);
    }

    #[test]
    fn write_failure_is_reported_and_state_kept() {
        let mut ctl = RelayController::open(SimulatedPort::new(), InitialState::AllOff).unwrap();
        ctl.device_mut().fail_writes(true);
        let mut out = Vec::new();
        run(&mut ctl, "3\non\nno\n".as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Failed to write 0x04 to the relay port"));
        assert!(out.contains("you can repeat the command"));
        assert_eq!(ctl.current_state(), 0x00);
    }

    #[test]
    fn end_of_input_ends_the_session() {
        let (ctl, _) = session("2\noff\n");
        assert_eq!(ctl.current_state(), 0x00);
        assert_eq!(ctl.device().writes(), &[0x00, 0x00]);
    }
}
