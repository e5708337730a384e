//! loopset-linux-spi - Linux spidev support
//!
//! This crate provides [`LinuxSpi`], an implementation of
//! [`loopset_core::SpiBus`] on top of the `/dev/spidevX.Y` device interface.
//!
//! # Overview
//!
//! The Linux SPI driver exposes SPI controllers through character devices
//! at `/dev/spidevX.Y` where X is the bus number and Y is the chip select.
//! Mode, word size and clock speed are set with ioctls, and the driver may
//! coerce each request to a value the controller supports, so every setting
//! should be read back after it is written.
//!
//! # Example
//!
//! ```no_run
//! use loopset_core::{configure, BusConfig};
//! use loopset_linux_spi::LinuxSpi;
//!
//! let config = BusConfig::new("/dev/spidev1.0").with_speed(1_000_000);
//! let mut spi = LinuxSpi::open(&config.device)?;
//! let settings = configure(&mut spi, &config)?;
//! println!("{}", settings);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with spidev support enabled (`CONFIG_SPI_SPIDEV`)
//! - Read/write access to `/dev/spidevX.Y` device
//! - May require adding user to `spi` group or using udev rules

pub mod device;
pub mod error;

// Re-exports
pub use device::LinuxSpi;
pub use error::{LinuxSpiError, Result};
