//! loopset-core - Hardware-independent core of loopset
//!
//! This crate holds everything needed to drive a 4-20 mA current-loop DAC
//! over SPI that does not depend on a particular bus implementation:
//!
//! - [`SpiMode`] and [`BusConfig`]: what we ask the bus driver for
//! - [`SpiBus`]: the control-request interface a bus must provide
//! - [`configure`]: the write/read-back configuration sequence
//! - [`LoopCurrent`] and [`DacCode`]: setpoint scaling and clamping
//! - [`Frame`]: the 2-byte wire encoding sent to the DAC
//! - [`transmit`]: the single half-duplex transfer
//!
//! # Example
//!
//! ```no_run
//! use loopset_core::{configure, transmit, BusConfig, Frame, LoopCurrent, SpiBus};
//!
//! fn set_20ma(bus: &mut impl SpiBus) -> loopset_core::Result<()> {
//!     let config = BusConfig::default();
//!     let settings = configure(bus, &config)?;
//!
//!     let (code, _clamp) = LoopCurrent::from_tenths(200).to_dac_code();
//!     let frame = Frame::encode(code);
//!     transmit(bus, &settings, config.delay_usecs, &frame)?;
//!     Ok(())
//! }
//! ```

pub mod bus;
pub mod config;
pub mod current;
pub mod error;
pub mod frame;
pub mod mode;

// Re-exports
pub use bus::{configure, transmit, SpiBus, Transfer};
pub use config::{BusConfig, BusSettings, DEFAULT_DEVICE};
pub use current::{Clamp, DacCode, LoopCurrent, ParseCurrentError};
pub use error::{Error, Result};
pub use frame::{format_hex_rows, Frame};
pub use mode::SpiMode;
