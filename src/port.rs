use std::io;
use std::io::Read;

use crate::relay_types::PortByte;

/// Empty transfers tolerated before a pin sample read gives up.
pub const SAMPLE_READ_ATTEMPTS: usize = 16;

/// Byte-wide bit-bang port the relay board hangs off.
pub trait PortDevice {
    /// Configure pin directions. A set bit makes the pin an output.
    fn set_direction(&mut self, mask: PortByte) -> io::Result<()>;

    fn write(&mut self, value: PortByte) -> io::Result<()>;

    fn read(&mut self) -> io::Result<PortByte>;
}

impl<D: PortDevice + ?Sized> PortDevice for Box<D> {
    fn set_direction(&mut self, mask: PortByte) -> io::Result<()> {
        (**self).set_direction(mask)
    }

    fn write(&mut self, value: PortByte) -> io::Result<()> {
        (**self).write(value)
    }

    fn read(&mut self) -> io::Result<PortByte> {
        (**self).read()
    }
}

impl<D: PortDevice + ?Sized> PortDevice for &mut D {
    fn set_direction(&mut self, mask: PortByte) -> io::Result<()> {
        (**self).set_direction(mask)
    }

    fn write(&mut self, value: PortByte) -> io::Result<()> {
        (**self).write(value)
    }

    fn read(&mut self) -> io::Result<PortByte> {
        (**self).read()
    }
}

/// Reads one pin sample from a USB bulk reader.
///
/// A transfer may carry only status bytes and yield nothing, so empty reads
/// are retried up to [`SAMPLE_READ_ATTEMPTS`] times.
pub fn read_sample<R: Read>(reader: &mut R) -> io::Result<PortByte> {
    let mut buf = [0u8; 1];
    for _ in 0..SAMPLE_READ_ATTEMPTS {
        match reader.read(&mut buf) {
            Ok(0) => continue,
            Ok(_) => return Ok(buf[0]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "no pin sample received from the port",
    ))
}
