use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;

use thiserror::Error;

/// Raw value of the 8 bit output port. Bit `n` drives relay `n + 1`.
pub type PortByte = u8;

pub const RELAY_COUNT: u8 = 8;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Invalid relay number '{0}', expected 1 to 8")]
pub struct InvalidRelayIndex(pub u8);

/// 1-based relay number on the board.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RelayIndex(u8);

impl RelayIndex {
    pub fn new(index: u8) -> Result<RelayIndex, InvalidRelayIndex> {
        match index {
            1..=RELAY_COUNT => Ok(RelayIndex(index)),
            _ => Err(InvalidRelayIndex(index)),
        }
    }

    pub fn all() -> impl Iterator<Item = RelayIndex> {
        (1..=RELAY_COUNT).map(RelayIndex)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Position of the port bit driving this relay.
    pub fn bit(self) -> u8 {
        self.0 - 1
    }
}

impl TryFrom<u8> for RelayIndex {
    type Error = InvalidRelayIndex;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        RelayIndex::new(index)
    }
}

impl Display for RelayIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Relay {}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelayState {
    On,
    Off,
}

impl RelayState {
    pub fn is_on(self) -> bool {
        self == RelayState::On
    }
}

impl Display for RelayState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RelayState::On => write!(f, "On"),
            RelayState::Off => write!(f, "Off"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid relay state '{0}'")]
pub struct InvalidRelayState(pub String);

impl FromStr for RelayState {
    type Err = InvalidRelayState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(RelayState::On),
            "off" => Ok(RelayState::Off),
            _ => Err(InvalidRelayState(s.to_string())),
        }
    }
}
