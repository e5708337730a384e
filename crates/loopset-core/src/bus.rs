//! SPI bus trait and the configure/transmit sequence
//!
//! [`SpiBus`] mirrors the control requests of a spidev-style driver: each
//! setting has a write request and a read request, and a transfer returns
//! how many bytes the driver actually clocked out. Implementations report
//! failures as `std::io::Error` so the operating system's description ends
//! up in the diagnostic.

use crate::config::{BusConfig, BusSettings};
use crate::error::{Error, Result};
use crate::mode::SpiMode;

/// A single half-duplex (transmit only) transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer<'a> {
    /// Bytes to clock out
    pub tx: &'a [u8],
    /// Delay after the last word before chip select changes, in microseconds
    pub delay_usecs: u16,
    /// Clock speed for this transfer in Hz
    pub speed_hz: u32,
    /// Bits per word for this transfer
    pub bits_per_word: u8,
}

/// Control-request interface of an SPI bus device
pub trait SpiBus {
    /// Request a mode
    fn write_mode(&mut self, mode: SpiMode) -> std::io::Result<()>;

    /// Read the mode the driver is using
    fn read_mode(&mut self) -> std::io::Result<SpiMode>;

    /// Request a word size
    fn write_bits_per_word(&mut self, bits: u8) -> std::io::Result<()>;

    /// Read the word size the driver is using
    fn read_bits_per_word(&mut self) -> std::io::Result<u8>;

    /// Request a maximum clock speed
    fn write_max_speed_hz(&mut self, speed_hz: u32) -> std::io::Result<()>;

    /// Read the maximum clock speed the driver is using
    fn read_max_speed_hz(&mut self) -> std::io::Result<u32>;

    /// Perform one transfer, returning the number of bytes transferred
    fn transfer(&mut self, transfer: &Transfer<'_>) -> std::io::Result<usize>;
}

/// Apply `config` to the bus and return the settings the driver reports
///
/// Each setting is written and then read back, in the order mode, bits per
/// word, max speed. The first failure stops the sequence; the bus is then in
/// an unknown state and must not be used for a transfer.
pub fn configure<B: SpiBus + ?Sized>(bus: &mut B, config: &BusConfig) -> Result<BusSettings> {
    log::debug!("Setting SPI mode {:#04x}", config.mode.bits());
    bus.write_mode(config.mode).map_err(Error::SetMode)?;
    let mode = bus.read_mode().map_err(Error::GetMode)?;

    log::debug!("Setting {} bits per word", config.bits_per_word);
    bus.write_bits_per_word(config.bits_per_word)
        .map_err(Error::SetBitsPerWord)?;
    let bits_per_word = bus.read_bits_per_word().map_err(Error::GetBitsPerWord)?;

    log::debug!("Setting max speed {} Hz", config.speed_hz);
    bus.write_max_speed_hz(config.speed_hz)
        .map_err(Error::SetSpeed)?;
    let speed_hz = bus.read_max_speed_hz().map_err(Error::GetSpeed)?;

    if mode != config.mode {
        log::info!(
            "Driver changed mode {} (clock mode {}) to {} (clock mode {})",
            config.mode,
            config.mode.clock_mode(),
            mode,
            mode.clock_mode()
        );
    }
    if bits_per_word != config.bits_per_word {
        log::info!(
            "Driver changed bits per word {} to {}",
            config.bits_per_word,
            bits_per_word
        );
    }
    if speed_hz != config.speed_hz {
        log::info!(
            "Driver changed max speed {} Hz to {} Hz",
            config.speed_hz,
            speed_hz
        );
    }

    Ok(BusSettings {
        mode,
        bits_per_word,
        speed_hz,
    })
}

/// Send `data` in one transfer using the effective bus settings
///
/// Fails if the driver reports fewer bytes than `data` holds.
pub fn transmit<B: SpiBus + ?Sized>(
    bus: &mut B,
    settings: &BusSettings,
    delay_usecs: u16,
    data: impl AsRef<[u8]>,
) -> Result<()> {
    let data = data.as_ref();
    let transfer = Transfer {
        tx: data,
        delay_usecs,
        speed_hz: settings.speed_hz,
        bits_per_word: settings.bits_per_word,
    };

    log::trace!("Transfer {:02X?}", data);
    let sent = bus.transfer(&transfer).map_err(Error::Transfer)?;
    if sent < data.len() {
        return Err(Error::ShortTransfer {
            sent,
            expected: data.len(),
        });
    }

    Ok(())
}
