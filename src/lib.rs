pub mod banner;
#[cfg(feature = "ftdi")]
pub mod ftdi_port;
pub mod menu;
pub mod port;
pub mod relay_bank;
pub mod relay_ctl;
pub mod relay_types;
pub mod sim_port;
