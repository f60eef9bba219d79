use crate::relay_types::PortByte;
use crate::relay_types::RelayIndex;
use crate::relay_types::RelayState;

pub fn bit_mask_on(index: RelayIndex) -> PortByte {
    1 << index.bit()
}

pub fn bit_mask_off(index: RelayIndex) -> PortByte {
    !bit_mask_on(index)
}

/// Energize `index`, leaving the other bits of `current` as they are.
pub fn apply_on(current: PortByte, index: RelayIndex) -> PortByte {
    current | bit_mask_on(index)
}

/// De-energize `index`, leaving the other bits of `current` as they are.
pub fn apply_off(current: PortByte, index: RelayIndex) -> PortByte {
    current & bit_mask_off(index)
}

pub fn apply(current: PortByte, index: RelayIndex, state: RelayState) -> PortByte {
    match state {
        RelayState::On => apply_on(current, index),
        RelayState::Off => apply_off(current, index),
    }
}

pub fn relay_state(current: PortByte, index: RelayIndex) -> RelayState {
    match current & bit_mask_on(index) {
        0 => RelayState::Off,
        _ => RelayState::On,
    }
}

pub fn all(state: RelayState) -> PortByte {
    match state {
        RelayState::On => 0xFF,
        RelayState::Off => 0x00,
    }
}
