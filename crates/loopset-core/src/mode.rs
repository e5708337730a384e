//! SPI mode flags
//!
//! The bit values are the ones the Linux spidev driver uses for the 8-bit
//! `SPI_IOC_WR_MODE`/`SPI_IOC_RD_MODE` requests.

use bitflags::bitflags;
use core::fmt;

bitflags! {
    /// SPI bus mode bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpiMode: u8 {
        /// Clock phase (sample on trailing edge)
        const CPHA      = 0x01;
        /// Clock polarity (idle high)
        const CPOL      = 0x02;
        /// Chip select is active high
        const CS_HIGH   = 0x04;
        /// Shift out least significant bit first
        const LSB_FIRST = 0x08;
        /// SI/SO signals shared
        const THREE_WIRE = 0x10;
        /// Loopback mode
        const LOOP      = 0x20;
        /// No chip select, one device per bus
        const NO_CS     = 0x40;
        /// Slave pulls low to pause
        const READY     = 0x80;

        /// SPI mode 0: CPOL=0, CPHA=0
        const MODE_0 = 0;
        /// SPI mode 1: CPOL=0, CPHA=1
        const MODE_1 = Self::CPHA.bits();
        /// SPI mode 2: CPOL=1, CPHA=0
        const MODE_2 = Self::CPOL.bits();
        /// SPI mode 3: CPOL=1, CPHA=1
        const MODE_3 = Self::CPOL.bits() | Self::CPHA.bits();
    }
}

impl Default for SpiMode {
    fn default() -> Self {
        SpiMode::empty()
    }
}

impl SpiMode {
    /// Clock mode number (0-3) derived from CPOL and CPHA
    pub fn clock_mode(self) -> u8 {
        self.bits() & Self::MODE_3.bits()
    }
}

/// Formats as `|`-separated flag names, `MODE_0` when no bits are set
impl fmt::Display for SpiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("MODE_0");
        }

        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}
