use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io;

use log::debug;
use log::info;
use log::warn;
use thiserror::Error;

use crate::port::PortDevice;
use crate::relay_bank;
use crate::relay_types::InvalidRelayIndex;
use crate::relay_types::PortByte;
use crate::relay_types::RelayIndex;
use crate::relay_types::RelayState;
use crate::relay_types::RELAY_COUNT;

/// Direction mask making all 8 port pins outputs.
pub const ALL_OUTPUTS: PortByte = 0xFF;

/// Where the cached port byte comes from when the controller starts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InitialState {
    /// Switch every relay off.
    #[default]
    AllOff,
    /// Keep whatever the port currently latches.
    Resync,
}

#[derive(Debug, Error)]
#[error("Failed to write 0x{value:02X} to the relay port")]
pub struct DeviceWriteError {
    value: PortByte,
    #[source]
    source: io::Error,
}

impl DeviceWriteError {
    /// The port byte that was rejected.
    pub fn value(&self) -> PortByte {
        self.value
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitStage {
    Direction,
    Resync,
    InitialWrite,
}

impl Display for InitStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            InitStage::Direction => write!(f, "setting port direction"),
            InitStage::Resync => write!(f, "reading current port state"),
            InitStage::InitialWrite => write!(f, "writing initial port state"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to initialize the relay port while {stage}")]
pub struct DeviceInitError {
    stage: InitStage,
    #[source]
    source: io::Error,
}

impl DeviceInitError {
    pub fn stage(&self) -> InitStage {
        self.stage
    }
}

#[derive(Debug, Error)]
pub enum RelayControlError {
    #[error(transparent)]
    InvalidRelayIndex(#[from] InvalidRelayIndex),

    #[error(transparent)]
    DeviceWriteError(#[from] DeviceWriteError),

    #[error("Failed to read the relay port")]
    DeviceReadError(#[source] io::Error),

    #[error("Relay port is not initialized")]
    NotInitialized,
}

/// Owns the port device together with the last byte written to it.
///
/// The cached byte is trusted instead of reading the port back before every
/// write, which holds as long as nothing else drives the same device. Callers
/// sharing a controller between threads put the whole controller behind one
/// mutex so the cache and the device are never guarded separately.
pub struct RelayController<D> {
    device: D,
    state: PortByte,
    initial_state: InitialState,
    initialized: bool,
}

impl<D: PortDevice> RelayController<D> {
    pub fn new(device: D) -> RelayController<D> {
        RelayController::with_initial_state(device, InitialState::default())
    }

    pub fn with_initial_state(device: D, initial_state: InitialState) -> RelayController<D> {
        RelayController {
            device,
            state: relay_bank::all(RelayState::Off),
            initial_state,
            initialized: false,
        }
    }

    /// Creates and initializes a controller in one go.
    pub fn open(
        device: D,
        initial_state: InitialState,
    ) -> Result<RelayController<D>, DeviceInitError> {
        let mut ctl = RelayController::with_initial_state(device, initial_state);
        ctl.initialize()?;
        Ok(ctl)
    }

    pub fn initialize(&mut self) -> Result<(), DeviceInitError> {
        self.initialized = false;

        debug!("Configuring relay port direction 0x{:02X}", ALL_OUTPUTS);
        self.device
            .set_direction(ALL_OUTPUTS)
            .map_err(|source| DeviceInitError {
                stage: InitStage::Direction,
                source,
            })?;

        let initial = match self.initial_state {
            InitialState::AllOff => relay_bank::all(RelayState::Off),
            InitialState::Resync => self.device.read().map_err(|source| DeviceInitError {
                stage: InitStage::Resync,
                source,
            })?,
        };

        self.device
            .write(initial)
            .map_err(|source| DeviceInitError {
                stage: InitStage::InitialWrite,
                source,
            })?;

        self.state = initial;
        self.initialized = true;
        info!("Relay port initialized with 0x{:02X}", initial);
        Ok(())
    }

    pub fn turn_on(&mut self, index: u8) -> Result<(), RelayControlError> {
        let index = RelayIndex::new(index)?;
        self.set(index, RelayState::On)
    }

    pub fn turn_off(&mut self, index: u8) -> Result<(), RelayControlError> {
        let index = RelayIndex::new(index)?;
        self.set(index, RelayState::Off)
    }

    pub fn set(&mut self, relay: RelayIndex, state: RelayState) -> Result<(), RelayControlError> {
        let value = relay_bank::apply(self.state, relay, state);
        self.write(value)?;
        info!("Set '{}' to '{}'", relay, state);
        Ok(())
    }

    pub fn set_all(&mut self, state: RelayState) -> Result<(), RelayControlError> {
        self.write(relay_bank::all(state))?;
        info!("Set all relays to '{}'", state);
        Ok(())
    }

    /// Replaces the cached byte with what the port reports.
    pub fn resync(&mut self) -> Result<PortByte, RelayControlError> {
        if !self.initialized {
            return Err(RelayControlError::NotInitialized);
        }
        let value = self
            .device
            .read()
            .map_err(RelayControlError::DeviceReadError)?;
        if value != self.state {
            warn!(
                "Relay port reads 0x{:02X} but 0x{:02X} was last written",
                value, self.state
            );
        }
        self.state = value;
        Ok(value)
    }

    pub fn current_state(&self) -> PortByte {
        self.state
    }

    pub fn relay_state(&self, relay: RelayIndex) -> RelayState {
        relay_bank::relay_state(self.state, relay)
    }

    pub fn relay_states(&self) -> [RelayState; RELAY_COUNT as usize] {
        let mut states = [RelayState::Off; RELAY_COUNT as usize];
        for relay in RelayIndex::all() {
            states[relay.bit() as usize] = self.relay_state(relay);
        }
        states
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Direct device access. Writing through it bypasses the cache.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }

    fn write(&mut self, value: PortByte) -> Result<(), RelayControlError> {
        if !self.initialized {
            return Err(RelayControlError::NotInitialized);
        }
        match self.device.write(value) {
            Ok(()) => {
                self.state = value;
                Ok(())
            }
            Err(source) => {
                warn!("Writing 0x{:02X} to the relay port failed: {}", value, source);
                Err(DeviceWriteError { value, source }.into())
            }
        }
    }
}
