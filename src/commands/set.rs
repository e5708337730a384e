//! Configure the bus and send one loop current setpoint

use loopset_core::{
    configure, format_hex_rows, transmit, BusConfig, Clamp, Frame, LoopCurrent, SpiBus,
};
use std::io::Write;

/// Configure `bus`, then encode and send `current`
///
/// Progress goes to `out`: the effective bus settings, the requested
/// current, a notice if it had to be clamped, and the bytes sent.
pub fn run_set<B: SpiBus + ?Sized>(
    bus: &mut B,
    config: &BusConfig,
    current: LoopCurrent,
    out: &mut impl Write,
) -> Result<Frame, Box<dyn std::error::Error>> {
    let settings = configure(bus, config)?;
    log::info!(
        "Bus configured: mode {} ({}), {} bits per word, {} Hz",
        settings.mode.bits(),
        settings.mode,
        settings.bits_per_word,
        settings.speed_hz
    );
    writeln!(out, "{}", settings)?;

    writeln!(out)?;
    writeln!(out, "Setting loop current = {}", current)?;

    let (code, clamp) = current.to_dac_code();
    match clamp {
        Clamp::None => {}
        Clamp::Maximum => {
            log::warn!("{} is above the 20 mA limit", current);
            writeln!(
                out,
                "**Resetting loop current to default maximum = {}",
                code.current()
            )?;
        }
        Clamp::Minimum => {
            log::warn!("{} is below the 4 mA limit", current);
            writeln!(
                out,
                "**Resetting loop current to default minimum = {}",
                code.current()
            )?;
        }
    }

    let frame = Frame::encode(code);
    transmit(bus, &settings, config.delay_usecs, frame)?;

    writeln!(out)?;
    writeln!(out, "Sending:{}", format_hex_rows(frame.as_bytes()))?;

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopset_dummy::{DummyBus, DummyConfig, Request};

    fn run(bus: &mut DummyBus, config: &BusConfig, tenths: u16) -> (String, Option<Frame>) {
        let mut out = Vec::new();
        let frame = run_set(bus, config, LoopCurrent::from_tenths(tenths), &mut out).ok();
        (String::from_utf8(out).unwrap(), frame)
    }

    #[test]
    fn test_default_output() {
        let mut bus = DummyBus::new_default();
        let (out, frame) = run(&mut bus, &BusConfig::default(), 200);

        assert_eq!(frame.unwrap().as_bytes(), &[0x3F, 0xA0]);
        assert_eq!(
            out,
            "spi mode: 0\n\
             bits per word: 8\n\
             max speed: 500000 Hz (500 KHz)\n\
             \n\
             Setting loop current = 20.0 mA\n\
             \n\
             Sending:\n\
             3F A0\n"
        );
    }

    #[test]
    fn test_clamp_maximum_output() {
        let mut bus = DummyBus::new_default();
        let (out, frame) = run(&mut bus, &BusConfig::default(), 215);

        assert_eq!(frame.unwrap().as_bytes(), &[0x3F, 0xA0]);
        assert!(out.contains("Setting loop current = 21.5 mA\n"));
        assert!(out.contains("**Resetting loop current to default maximum = 20.0 mA\n"));
    }

    #[test]
    fn test_clamp_minimum_output() {
        let mut bus = DummyBus::new_default();
        let (out, frame) = run(&mut bus, &BusConfig::default(), 12);

        assert_eq!(frame.unwrap().as_bytes(), &[0x33, 0x20]);
        assert!(out.contains("Setting loop current = 1.2 mA\n"));
        assert!(out.contains("**Resetting loop current to default minimum = 4.0 mA\n"));
    }

    #[test]
    fn test_prints_read_back_settings() {
        let mut bus = DummyBus::new(DummyConfig {
            max_speed_hz: 125_000,
            ..Default::default()
        });
        let config = BusConfig::default().with_speed(2_000_000);
        let (out, _) = run(&mut bus, &config, 200);

        assert!(out.contains("max speed: 125000 Hz (125 KHz)\n"));
        assert_eq!(bus.transfers()[0].speed_hz, 125_000);
    }

    #[test]
    fn test_configure_failure_sends_nothing() {
        let mut bus = DummyBus::new(DummyConfig {
            fail_on: Some(Request::WriteMaxSpeed),
            ..Default::default()
        });
        let mut out = Vec::new();
        let err = run_set(
            &mut bus,
            &BusConfig::default(),
            LoopCurrent::default(),
            &mut out,
        )
        .unwrap_err();

        assert!(err.to_string().starts_with("can't set max speed hz"));
        assert!(out.is_empty());
        assert!(bus.transfers().is_empty());
    }

    #[test]
    fn test_short_transfer_fails() {
        let mut bus = DummyBus::new(DummyConfig {
            transfer_limit: Some(0),
            ..Default::default()
        });
        let (out, frame) = run(&mut bus, &BusConfig::default(), 200);

        assert!(frame.is_none());
        assert!(!out.contains("Sending:"));
    }
}
