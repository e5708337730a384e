//! CLI argument parsing

use clap::Parser;
use loopset_core::config::{DEFAULT_BITS_PER_WORD, DEFAULT_DEVICE, DEFAULT_SPEED_HZ};
use loopset_core::{BusConfig, LoopCurrent, SpiMode};

#[derive(Parser, Debug)]
#[command(name = "loopset")]
#[command(
    author,
    version,
    about = "Set a 4-20 mA loop current through an SPI DAC on spidev",
    long_about = None
)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Device to use
    #[arg(short = 'D', long, value_name = "PATH", default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// Max speed (Hz)
    #[arg(short, long, value_name = "HZ", default_value_t = DEFAULT_SPEED_HZ)]
    pub speed: u32,

    /// Delay (usec)
    #[arg(short, long, value_name = "USEC", default_value_t = 0)]
    pub delay: u16,

    /// Bits per word
    #[arg(short = 'b', long = "bpw", value_name = "BITS", default_value_t = DEFAULT_BITS_PER_WORD)]
    pub bits_per_word: u8,

    /// Loop current to set, in mA with at most one decimal
    #[arg(short, long, value_name = "MA", default_value = "20.0")]
    pub current: LoopCurrent,

    /// Loopback
    #[arg(short = 'l', long = "loop")]
    pub loopback: bool,

    /// Clock phase
    #[arg(short = 'H', long)]
    pub cpha: bool,

    /// Clock polarity
    #[arg(short = 'O', long)]
    pub cpol: bool,

    /// Least significant bit first
    #[arg(short = 'L', long)]
    pub lsb: bool,

    /// Chip select active high
    #[arg(short = 'C', long)]
    pub cs_high: bool,

    /// SI/SO signals shared
    #[arg(short = '3', long = "3wire")]
    pub three_wire: bool,

    /// No chip select
    #[arg(short = 'N', long)]
    pub no_cs: bool,

    /// Slave pulls low to pause
    #[arg(short = 'R', long)]
    pub ready: bool,
}

impl Cli {
    /// Mode flags selected on the command line
    pub fn mode(&self) -> SpiMode {
        [
            (self.loopback, SpiMode::LOOP),
            (self.cpha, SpiMode::CPHA),
            (self.cpol, SpiMode::CPOL),
            (self.lsb, SpiMode::LSB_FIRST),
            (self.cs_high, SpiMode::CS_HIGH),
            (self.three_wire, SpiMode::THREE_WIRE),
            (self.no_cs, SpiMode::NO_CS),
            (self.ready, SpiMode::READY),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(SpiMode::empty(), |mode, (_, flag)| mode | flag)
    }

    pub fn bus_config(&self) -> BusConfig {
        BusConfig::new(self.device.as_str())
            .with_mode(self.mode())
            .with_bits_per_word(self.bits_per_word)
            .with_speed(self.speed)
            .with_delay(self.delay)
    }
}
