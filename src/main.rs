use std::io;
use std::io::Write;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use drcontrol::banner;
use drcontrol::menu;
use drcontrol::port::PortDevice;
use drcontrol::relay_ctl::InitialState;
use drcontrol::relay_ctl::RelayController;
use drcontrol::relay_types::RelayIndex;
use drcontrol::relay_types::RelayState;
use drcontrol::sim_port::SimulatedPort;
use log::info;

/// Switch the relays of an 8 channel USB relay board
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// More log output, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Port backend driving the board
    #[arg(long, value_enum, default_value_t = default_device(), global = true)]
    device: DeviceKind,

    /// USB vendor id of the bit-bang chip (hex)
    #[arg(long, value_parser = parse_usb_id, default_value = "0403", global = true)]
    vendor_id: u16,

    /// USB product id of the bit-bang chip (hex)
    #[arg(long, value_parser = parse_usb_id, default_value = "6001", global = true)]
    product_id: u16,

    /// Serial number of the board, needed when several chips share the USB ids
    #[arg(long, global = true)]
    serial: Option<String>,

    /// Relay state assumed at startup: switch all off, or keep what the port latches
    #[arg(long, value_enum, default_value_t = InitialStateArg::Off, global = true)]
    initial_state: InitialStateArg,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Ask for relay commands on the terminal (default)
    Interactive,

    /// Switch one relay on
    On {
        /// Relay number (1-8)
        relay: u8,
    },

    /// Switch one relay off
    Off {
        /// Relay number (1-8)
        relay: u8,
    },

    /// Switch every relay at once
    All {
        #[arg(value_enum)]
        state: StateArg,
    },

    /// Show the relay states read from the port
    Status,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DeviceKind {
    Sim,
    Ftdi,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum InitialStateArg {
    Off,
    Resync,
}

impl From<InitialStateArg> for InitialState {
    fn from(arg: InitialStateArg) -> Self {
        match arg {
            InitialStateArg::Off => InitialState::AllOff,
            InitialStateArg::Resync => InitialState::Resync,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StateArg {
    On,
    Off,
}

impl From<StateArg> for RelayState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::On => RelayState::On,
            StateArg::Off => RelayState::Off,
        }
    }
}

/// Which chip to open when the FTDI backend is selected.
struct UsbSelector {
    vendor_id: u16,
    product_id: u16,
    serial: Option<String>,
}

fn default_device() -> DeviceKind {
    match cfg!(feature = "ftdi") {
        true => DeviceKind::Ftdi,
        false => DeviceKind::Sim,
    }
}

fn parse_usb_id(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches("0x");
    u16::from_str_radix(digits, 16).map_err(|e| format!("Invalid USB id '{}': {}", s, e))
}

fn main() -> Result<()> {
    let args = Args::parse();

    stderrlog::new()
        .module(module_path!())
        .quiet(args.quiet)
        .verbosity(args.verbose as usize + 1)
        .timestamp(stderrlog::Timestamp::Off)
        .init()?;

    let command = args.command.unwrap_or(Command::Interactive);

    // status must not switch anything, so it always starts from the latched byte
    let initial_state = match command {
        Command::Status => InitialState::Resync,
        _ => args.initial_state.into(),
    };

    let selector = UsbSelector {
        vendor_id: args.vendor_id,
        product_id: args.product_id,
        serial: args.serial,
    };
    let device = open_device(args.device, &selector)?;
    let mut ctl = RelayController::open(device, initial_state)
        .context("Failed to set up the relay board")?;

    match command {
        Command::Interactive => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            banner::write_banner(&mut out)?;
            menu::run(&mut ctl, io::stdin().lock(), &mut out)?;
        }
        Command::On { relay } => ctl.turn_on(relay)?,
        Command::Off { relay } => ctl.turn_off(relay)?,
        Command::All { state } => ctl.set_all(state.into())?,
        Command::Status => print_status(&ctl, &mut io::stdout().lock())?,
    }

    Ok(())
}

fn open_device(kind: DeviceKind, selector: &UsbSelector) -> Result<Box<dyn PortDevice>> {
    match kind {
        DeviceKind::Sim => {
            info!("Using simulated relay port");
            Ok(Box::new(SimulatedPort::new()))
        }
        DeviceKind::Ftdi => open_ftdi(selector),
    }
}

#[cfg(feature = "ftdi")]
fn open_ftdi(selector: &UsbSelector) -> Result<Box<dyn PortDevice>> {
    let port = drcontrol::ftdi_port::FtdiPort::open(
        selector.vendor_id,
        selector.product_id,
        selector.serial.as_deref(),
    )
    .with_context(|| {
        format!(
            "Failed to open FTDI device {:04x}:{:04x}",
            selector.vendor_id, selector.product_id
        )
    })?;
    Ok(Box::new(port))
}

#[cfg(not(feature = "ftdi"))]
fn open_ftdi(_selector: &UsbSelector) -> Result<Box<dyn PortDevice>> {
    anyhow::bail!("Built without FTDI support, rebuild with '--features ftdi'")
}

fn print_status<D: PortDevice, W: Write>(ctl: &RelayController<D>, out: &mut W) -> Result<()> {
    writeln!(out, "Port: 0x{:02X}", ctl.current_state())?;
    for relay in RelayIndex::all() {
        writeln!(out, "{}: {}", relay, ctl.relay_state(relay))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_selects_the_board() {
        let args =
            Args::try_parse_from(["drcontrol", "--serial", "AQ03BK0Q", "on", "3"]).unwrap();
        assert_eq!(args.serial.as_deref(), Some("AQ03BK0Q"));
        assert_eq!(args.command, Some(Command::On { relay: 3 }));
    }

    #[test]
    fn serial_is_global_and_optional() {
        let args = Args::try_parse_from(["drcontrol", "status", "--serial", "AQ03BK0Q"]).unwrap();
        assert_eq!(args.serial.as_deref(), Some("AQ03BK0Q"));

        let args = Args::try_parse_from(["drcontrol", "all", "off"]).unwrap();
        assert_eq!(args.serial, None);
        assert_eq!(args.command, Some(Command::All { state: StateArg::Off }));
    }

    #[test]
    fn usb_ids_parse_as_hex() {
        assert_eq!(parse_usb_id("0403"), Ok(0x0403));
        assert_eq!(parse_usb_id("0x6001"), Ok(0x6001));
        assert!(parse_usb_id("zz").is_err());
    }

    #[test]
    fn status_lists_every_relay() {
        let mut ctl =
            RelayController::open(SimulatedPort::with_value(0x11), InitialState::Resync).unwrap();
        ctl.turn_on(8).unwrap();
        let mut out = Vec::new();
        print_status(&ctl, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Port: 0x91\n"));
        assert!(out.contains("Relay 1: On\n"));
        assert!(out.contains("Relay 2: Off\n"));
        assert!(out.contains("Relay 8: On\n"));
    }
}
