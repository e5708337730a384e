//! Linux SPI device implementation
//!
//! This module provides the `LinuxSpi` struct that implements the `SpiBus`
//! trait using Linux's spidev interface.

use crate::error::{LinuxSpiError, Result};

use loopset_core::{SpiBus, SpiMode, Transfer};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::Path;

/// Linux spidev ioctl constants
mod ioctl {
    use nix::{ioctl_read, ioctl_write_buf, ioctl_write_ptr};

    // SPI ioctl magic number
    const SPI_IOC_MAGIC: u8 = b'k';

    // SPI ioctl type numbers
    const SPI_IOC_TYPE_MESSAGE: u8 = 0;
    const SPI_IOC_TYPE_MODE: u8 = 1;
    const SPI_IOC_TYPE_BITS_PER_WORD: u8 = 3;
    const SPI_IOC_TYPE_MAX_SPEED_HZ: u8 = 4;

    // Generate ioctl functions
    ioctl_read!(spi_ioc_rd_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
    ioctl_write_ptr!(spi_ioc_wr_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
    ioctl_read!(
        spi_ioc_rd_bits_per_word,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_BITS_PER_WORD,
        u8
    );
    ioctl_write_ptr!(
        spi_ioc_wr_bits_per_word,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_BITS_PER_WORD,
        u8
    );
    ioctl_read!(
        spi_ioc_rd_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );
    ioctl_write_ptr!(
        spi_ioc_wr_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );

    // SPI_IOC_MESSAGE(n) = _IOW(SPI_IOC_MAGIC, 0, char[n * sizeof(struct spi_ioc_transfer)])
    ioctl_write_buf!(
        spi_ioc_message,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MESSAGE,
        SpiIocTransfer
    );

    /// SPI transfer structure for ioctl
    /// This must match the kernel's struct spi_ioc_transfer layout
    #[repr(C)]
    #[derive(Debug, Default, Clone)]
    pub struct SpiIocTransfer {
        pub tx_buf: u64,          // __u64 tx_buf
        pub rx_buf: u64,          // __u64 rx_buf
        pub len: u32,             // __u32 len
        pub speed_hz: u32,        // __u32 speed_hz
        pub delay_usecs: u16,     // __u16 delay_usecs
        pub bits_per_word: u8,    // __u8 bits_per_word
        pub cs_change: u8,        // __u8 cs_change
        pub tx_nbits: u8,         // __u8 tx_nbits
        pub rx_nbits: u8,         // __u8 rx_nbits
        pub word_delay_usecs: u8, // __u8 word_delay_usecs
        pub _pad: u8,             // padding
    }
}

use ioctl::SpiIocTransfer;

impl SpiIocTransfer {
    /// Transmit-only transfer; the receive buffer stays null
    fn write(transfer: &Transfer<'_>) -> Self {
        Self {
            tx_buf: transfer.tx.as_ptr() as u64,
            len: transfer.tx.len() as u32,
            speed_hz: transfer.speed_hz,
            delay_usecs: transfer.delay_usecs,
            bits_per_word: transfer.bits_per_word,
            ..Default::default()
        }
    }
}

fn errno_to_io(e: nix::errno::Errno) -> std::io::Error {
    std::io::Error::from_raw_os_error(e as i32)
}

/// SPI bus backed by a `/dev/spidevX.Y` character device
///
/// The device is closed when this value is dropped.
pub struct LinuxSpi {
    /// File handle for spidev device
    file: File,
    /// Path the device was opened from
    path: String,
}

impl LinuxSpi {
    /// Open a spidev device for reading and writing
    ///
    /// No configuration is applied; use [`loopset_core::configure`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(LinuxSpiError::NoDevice);
        }

        log::debug!("linux_spi: Opening device {}", path.display());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| LinuxSpiError::OpenFailed {
                path: path.display().to_string(),
                source: e,
            })?;

        Ok(Self {
            file,
            path: path.display().to_string(),
        })
    }

    /// Path of the opened device
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SpiBus for LinuxSpi {
    fn write_mode(&mut self, mode: SpiMode) -> std::io::Result<()> {
        let bits = mode.bits();
        unsafe { ioctl::spi_ioc_wr_mode(self.file.as_raw_fd(), &bits) }.map_err(errno_to_io)?;
        log::debug!("linux_spi: Wrote mode {:#04x}", bits);
        Ok(())
    }

    fn read_mode(&mut self) -> std::io::Result<SpiMode> {
        let mut bits: u8 = 0;
        unsafe { ioctl::spi_ioc_rd_mode(self.file.as_raw_fd(), &mut bits) }.map_err(errno_to_io)?;
        Ok(SpiMode::from_bits_retain(bits))
    }

    fn write_bits_per_word(&mut self, bits: u8) -> std::io::Result<()> {
        unsafe { ioctl::spi_ioc_wr_bits_per_word(self.file.as_raw_fd(), &bits) }
            .map_err(errno_to_io)?;
        log::debug!("linux_spi: Wrote bits per word {}", bits);
        Ok(())
    }

    fn read_bits_per_word(&mut self) -> std::io::Result<u8> {
        let mut bits: u8 = 0;
        unsafe { ioctl::spi_ioc_rd_bits_per_word(self.file.as_raw_fd(), &mut bits) }
            .map_err(errno_to_io)?;
        Ok(bits)
    }

    fn write_max_speed_hz(&mut self, speed_hz: u32) -> std::io::Result<()> {
        unsafe { ioctl::spi_ioc_wr_max_speed_hz(self.file.as_raw_fd(), &speed_hz) }
            .map_err(errno_to_io)?;
        log::debug!("linux_spi: Wrote max speed {} Hz", speed_hz);
        Ok(())
    }

    fn read_max_speed_hz(&mut self) -> std::io::Result<u32> {
        let mut speed_hz: u32 = 0;
        unsafe { ioctl::spi_ioc_rd_max_speed_hz(self.file.as_raw_fd(), &mut speed_hz) }
            .map_err(errno_to_io)?;
        Ok(speed_hz)
    }

    fn transfer(&mut self, transfer: &Transfer<'_>) -> std::io::Result<usize> {
        let transfers = [SpiIocTransfer::write(transfer)];

        // tx_buf points into `transfer.tx`, which outlives the ioctl call
        let ret = unsafe { ioctl::spi_ioc_message(self.file.as_raw_fd(), &transfers) }
            .map_err(errno_to_io)?;

        log::trace!(
            "linux_spi: {} transferred {} of {} bytes",
            self.path,
            ret,
            transfer.tx.len()
        );
        Ok(ret as usize)
    }
}
