//! Bus configuration
//!
//! [`BusConfig`] is what the user asks for. [`BusSettings`] is what the
//! driver reports back after configuration, which may differ because the
//! driver coerces requests to values the hardware supports.

use crate::mode::SpiMode;
use core::fmt;

/// Device used when none is given
pub const DEFAULT_DEVICE: &str = "/dev/spidev1.0";

/// Default bits per word
pub const DEFAULT_BITS_PER_WORD: u8 = 8;

/// Default SPI clock speed in Hz (500 kHz)
pub const DEFAULT_SPEED_HZ: u32 = 500_000;

/// Requested bus configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Device path (e.g., "/dev/spidev1.0")
    pub device: String,
    /// SPI mode flags
    pub mode: SpiMode,
    /// Bits per word
    pub bits_per_word: u8,
    /// Maximum clock speed in Hz
    pub speed_hz: u32,
    /// Delay after the transfer before chip select changes, in microseconds
    pub delay_usecs: u16,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            mode: SpiMode::empty(),
            bits_per_word: DEFAULT_BITS_PER_WORD,
            speed_hz: DEFAULT_SPEED_HZ,
            delay_usecs: 0,
        }
    }
}

impl BusConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Set the SPI mode flags
    pub fn with_mode(mut self, mode: SpiMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the bits per word
    pub fn with_bits_per_word(mut self, bits: u8) -> Self {
        self.bits_per_word = bits;
        self
    }

    /// Set the SPI clock speed in Hz
    pub fn with_speed(mut self, speed_hz: u32) -> Self {
        self.speed_hz = speed_hz;
        self
    }

    /// Set the transfer delay in microseconds
    pub fn with_delay(mut self, delay_usecs: u16) -> Self {
        self.delay_usecs = delay_usecs;
        self
    }
}

/// Effective bus settings as read back from the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusSettings {
    pub mode: SpiMode,
    pub bits_per_word: u8,
    pub speed_hz: u32,
}

impl fmt::Display for BusSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "spi mode: {}", self.mode.bits())?;
        writeln!(f, "bits per word: {}", self.bits_per_word)?;
        write!(
            f,
            "max speed: {} Hz ({} KHz)",
            self.speed_hz,
            self.speed_hz / 1000
        )
    }
}
