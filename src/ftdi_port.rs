use std::io;
use std::io::Write;

use ftdi::BitMode;
use ftdi::Device;
use ftdi::Interface;
use log::debug;
use log::info;

use crate::port::read_sample;
use crate::port::PortDevice;
use crate::relay_types::PortByte;

/// FT245R style chip driven in asynchronous bit-bang mode.
pub struct FtdiPort {
    device: Device,
}

impl FtdiPort {
    /// Opens interface A of the chip matching the USB ids and, if given, the serial number.
    pub fn open(vendor_id: u16, product_id: u16, serial: Option<&str>) -> io::Result<FtdiPort> {
        info!("Opening FTDI device {:04x}:{:04x}", vendor_id, product_id);
        let mut opener = ftdi::find_by_vid_pid(vendor_id, product_id);
        if let Some(serial) = serial {
            debug!("Selecting FTDI device with serial '{}'", serial);
            opener = opener.serial(serial);
        }
        let device = opener
            .interface(Interface::A)
            .open()
            .map_err(to_io_error)?;
        Ok(FtdiPort { device })
    }
}

fn to_io_error(e: ftdi::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

impl PortDevice for FtdiPort {
    fn set_direction(&mut self, mask: PortByte) -> io::Result<()> {
        debug!("FTDI bit-bang direction 0x{:02X}", mask);
        self.device
            .set_bitmode(mask, BitMode::Bitbang)
            .map_err(to_io_error)
    }

    fn write(&mut self, value: PortByte) -> io::Result<()> {
        self.device.write_all(&[value])?;
        self.device.flush()
    }

    fn read(&mut self) -> io::Result<PortByte> {
        // drop stale samples so the byte read reflects the pins right now
        self.device.usb_purge_buffers().map_err(to_io_error)?;
        read_sample(&mut self.device)
    }
}
