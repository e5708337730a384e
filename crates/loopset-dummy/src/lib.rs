//! loopset-dummy - In-memory SPI bus emulator for testing
//!
//! This crate provides a dummy SPI bus that behaves like a spidev driver
//! without real hardware. It coerces requested settings the way a
//! controller driver would, records every transfer, and can be told to fail
//! a specific request.

use loopset_core::{SpiBus, SpiMode, Transfer};
use nix::errno::Errno;
use std::io;

/// A control request on the bus, used to select where to inject a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    WriteMode,
    ReadMode,
    WriteBitsPerWord,
    ReadBitsPerWord,
    WriteMaxSpeed,
    ReadMaxSpeed,
    Transfer,
}

/// Configuration for the dummy bus
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Mode bits the controller supports; others are dropped on write
    pub supported_modes: SpiMode,
    /// Word sizes the controller accepts; others are rejected with EINVAL
    pub supported_bits: Vec<u8>,
    /// Highest clock the controller runs at; faster requests are lowered
    pub max_speed_hz: u32,
    /// Report at most this many bytes per transfer
    pub transfer_limit: Option<usize>,
    /// Request that fails with EIO
    pub fail_on: Option<Request>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            supported_modes: SpiMode::all(),
            supported_bits: vec![8, 16],
            max_speed_hz: 10_000_000,
            transfer_limit: None,
            fail_on: None,
        }
    }
}

/// A transfer as the bus received it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTransfer {
    pub tx: Vec<u8>,
    pub delay_usecs: u16,
    pub speed_hz: u32,
    pub bits_per_word: u8,
}

/// Dummy SPI bus
pub struct DummyBus {
    config: DummyConfig,
    mode: SpiMode,
    bits_per_word: u8,
    speed_hz: u32,
    requests: Vec<Request>,
    transfers: Vec<RecordedTransfer>,
}

impl DummyBus {
    /// Create a new dummy bus with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            mode: SpiMode::empty(),
            bits_per_word: 8,
            speed_hz: 0,
            requests: Vec::new(),
            transfers: Vec::new(),
        }
    }

    /// Create a new dummy bus taking 8 or 16 bit words at up to 10 MHz
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Every request issued so far, in order
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Every transfer received so far, in order
    pub fn transfers(&self) -> &[RecordedTransfer] {
        &self.transfers
    }

    fn request(&mut self, request: Request) -> io::Result<()> {
        self.requests.push(request);
        if self.config.fail_on == Some(request) {
            log::debug!("dummy: Failing {:?}", request);
            return Err(io::Error::from(Errno::EIO));
        }
        Ok(())
    }
}

impl SpiBus for DummyBus {
    fn write_mode(&mut self, mode: SpiMode) -> io::Result<()> {
        self.request(Request::WriteMode)?;
        self.mode = mode & self.config.supported_modes;
        Ok(())
    }

    fn read_mode(&mut self) -> io::Result<SpiMode> {
        self.request(Request::ReadMode)?;
        Ok(self.mode)
    }

    fn write_bits_per_word(&mut self, bits: u8) -> io::Result<()> {
        self.request(Request::WriteBitsPerWord)?;
        if !self.config.supported_bits.contains(&bits) {
            log::debug!("dummy: Rejecting {} bits per word", bits);
            return Err(io::Error::from(Errno::EINVAL));
        }
        self.bits_per_word = bits;
        Ok(())
    }

    fn read_bits_per_word(&mut self) -> io::Result<u8> {
        self.request(Request::ReadBitsPerWord)?;
        Ok(self.bits_per_word)
    }

    fn write_max_speed_hz(&mut self, speed_hz: u32) -> io::Result<()> {
        self.request(Request::WriteMaxSpeed)?;
        self.speed_hz = speed_hz.min(self.config.max_speed_hz);
        Ok(())
    }

    fn read_max_speed_hz(&mut self) -> io::Result<u32> {
        self.request(Request::ReadMaxSpeed)?;
        Ok(self.speed_hz)
    }

    fn transfer(&mut self, transfer: &Transfer<'_>) -> io::Result<usize> {
        self.request(Request::Transfer)?;
        self.transfers.push(RecordedTransfer {
            tx: transfer.tx.to_vec(),
            delay_usecs: transfer.delay_usecs,
            speed_hz: transfer.speed_hz,
            bits_per_word: transfer.bits_per_word,
        });

        let sent = match self.config.transfer_limit {
            Some(limit) => transfer.tx.len().min(limit),
            None => transfer.tx.len(),
        };
        log::trace!("dummy: Transferred {:02X?}", &transfer.tx[..sent]);
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopset_core::{configure, transmit, BusConfig, BusSettings, Error, Frame, LoopCurrent};

    fn failing_on(request: Request) -> DummyBus {
        DummyBus::new(DummyConfig {
            fail_on: Some(request),
            ..Default::default()
        })
    }

    #[test]
    fn test_configure_defaults() {
        let mut bus = DummyBus::new_default();
        let settings = configure(&mut bus, &BusConfig::default()).unwrap();

        assert_eq!(
            settings,
            BusSettings {
                mode: SpiMode::empty(),
                bits_per_word: 8,
                speed_hz: 500_000,
            }
        );
        assert_eq!(
            bus.requests(),
            &[
                Request::WriteMode,
                Request::ReadMode,
                Request::WriteBitsPerWord,
                Request::ReadBitsPerWord,
                Request::WriteMaxSpeed,
                Request::ReadMaxSpeed,
            ]
        );
    }

    #[test]
    fn test_configure_reports_read_back_values() {
        let mut bus = DummyBus::new(DummyConfig {
            supported_modes: SpiMode::CPOL | SpiMode::CPHA,
            max_speed_hz: 250_000,
            ..Default::default()
        });
        let config = BusConfig::default()
            .with_mode(SpiMode::LOOP | SpiMode::CPHA)
            .with_speed(1_000_000);

        let settings = configure(&mut bus, &config).unwrap();
        assert_eq!(settings.mode, SpiMode::CPHA);
        assert_eq!(settings.speed_hz, 250_000);
    }

    #[test]
    fn test_configure_unsupported_bits() {
        let mut bus = DummyBus::new_default();
        let config = BusConfig::default().with_bits_per_word(9);

        let err = configure(&mut bus, &config).unwrap_err();
        assert!(matches!(err, Error::SetBitsPerWord(_)));
        assert!(err.to_string().starts_with("can't set bits per word: "));
        match err {
            Error::SetBitsPerWord(e) => assert_eq!(e.raw_os_error(), Some(Errno::EINVAL as i32)),
            _ => unreachable!(),
        }
        // Nothing after the failed step
        assert_eq!(bus.requests().last(), Some(&Request::WriteBitsPerWord));
    }

    #[test]
    fn test_configure_failure_contexts() {
        let cases = [
            (Request::WriteMode, "can't set spi mode"),
            (Request::ReadMode, "can't get spi mode"),
            (Request::WriteBitsPerWord, "can't set bits per word"),
            (Request::ReadBitsPerWord, "can't get bits per word"),
            (Request::WriteMaxSpeed, "can't set max speed hz"),
            (Request::ReadMaxSpeed, "can't get max speed hz"),
        ];

        for (request, context) in cases {
            let mut bus = failing_on(request);
            let err = configure(&mut bus, &BusConfig::default()).unwrap_err();
            let msg = err.to_string();
            assert!(msg.starts_with(context), "{:?}: {}", request, msg);
            assert_eq!(bus.requests().last(), Some(&request));
        }
    }

    #[test]
    fn test_transmit_uses_effective_settings() {
        let mut bus = DummyBus::new(DummyConfig {
            max_speed_hz: 100_000,
            ..Default::default()
        });
        let config = BusConfig::default().with_delay(10);
        let settings = configure(&mut bus, &config).unwrap();

        let frame = Frame::encode(LoopCurrent::from_tenths(158).to_dac_code().0);
        transmit(&mut bus, &settings, config.delay_usecs, frame).unwrap();

        assert_eq!(
            bus.transfers(),
            &[RecordedTransfer {
                tx: vec![0x3C, 0x58],
                delay_usecs: 10,
                speed_hz: 100_000,
                bits_per_word: 8,
            }]
        );
    }

    #[test]
    fn test_transmit_short_transfer() {
        let mut bus = DummyBus::new(DummyConfig {
            transfer_limit: Some(1),
            ..Default::default()
        });
        let settings = configure(&mut bus, &BusConfig::default()).unwrap();

        let err = transmit(&mut bus, &settings, 0, [0x3Fu8, 0xA0]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShortTransfer {
                sent: 1,
                expected: 2
            }
        ));
        assert!(err.to_string().starts_with("can't send spi message"));
    }

    #[test]
    fn test_transmit_driver_error() {
        let mut bus = failing_on(Request::Transfer);
        let settings = configure(&mut bus, &BusConfig::default()).unwrap();

        let err = transmit(&mut bus, &settings, 0, [0x3Fu8, 0xA0]).unwrap_err();
        assert!(matches!(err, Error::Transfer(_)));
        assert!(err.to_string().starts_with("can't send spi message: "));
    }
}
