use std::io;

use log::debug;

use crate::port::PortDevice;
use crate::relay_types::PortByte;

#[derive(Debug, Default)]
pub struct SimulatedPort {
    direction: PortByte,
    value: PortByte,
    writes: Vec<PortByte>,
    fail_direction: bool,
    fail_writes: bool,
    fail_reads: bool,
}

impl SimulatedPort {
    pub fn new() -> SimulatedPort {
        SimulatedPort::default()
    }

    /// A port that powers up with `value` already latched.
    pub fn with_value(value: PortByte) -> SimulatedPort {
        SimulatedPort {
            value,
            ..SimulatedPort::default()
        }
    }

    pub fn direction(&self) -> PortByte {
        self.direction
    }

    pub fn value(&self) -> PortByte {
        self.value
    }

    /// Every byte accepted by `write`, oldest first.
    pub fn writes(&self) -> &[PortByte] {
        &self.writes
    }

    pub fn fail_direction(&mut self, fail: bool) {
        self.fail_direction = fail;
    }

    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }
}

fn disconnected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "simulated port disconnected")
}

impl PortDevice for SimulatedPort {
    fn set_direction(&mut self, mask: PortByte) -> io::Result<()> {
        if self.fail_direction {
            return Err(disconnected());
        }
        debug!("Simulated port direction 0x{:02X}", mask);
        self.direction = mask;
        Ok(())
    }

    fn write(&mut self, value: PortByte) -> io::Result<()> {
        if self.fail_writes {
            return Err(disconnected());
        }
        debug!("Simulated port write 0x{:02X}", value);
        self.value = value;
        self.writes.push(value);
        Ok(())
    }

    fn read(&mut self) -> io::Result<PortByte> {
        if self.fail_reads {
            return Err(disconnected());
        }
        Ok(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_write_leaves_port_untouched() {
        let mut port = SimulatedPort::with_value(0x0F);
        port.fail_writes(true);
        assert!(port.write(0xFF).is_err());
        assert_eq!(port.value(), 0x0F);
        assert!(port.writes().is_empty());

        port.fail_writes(false);
        port.write(0xF0).unwrap();
        assert_eq!(port.read().unwrap(), 0xF0);
        assert_eq!(port.writes(), &[0xF0]);
    }
}
