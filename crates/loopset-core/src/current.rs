//! Loop current setpoint and DAC code conversion
//!
//! The DAC works in steps of 1/200 mA, so a setpoint given in tenths of a
//! milliamp is multiplied by 20. The result is clamped to the 4-20 mA output
//! window before it is encoded.

use core::fmt;
use core::str::FromStr;
use thiserror::Error;

/// DAC steps per tenth of a milliamp
pub const SCALE: u32 = 20;

/// DAC code for 4.0 mA
pub const MIN_CODE: u16 = 800;

/// DAC code for 20.0 mA
pub const MAX_CODE: u16 = 4000;

/// Loop current setpoint in tenths of a milliamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoopCurrent(u16);

impl Default for LoopCurrent {
    /// 20.0 mA
    fn default() -> Self {
        Self(200)
    }
}

impl LoopCurrent {
    pub const fn from_tenths(tenths: u16) -> Self {
        Self(tenths)
    }

    /// Scale to the DAC's native domain and clamp to the 4-20 mA window
    pub fn to_dac_code(self) -> (DacCode, Clamp) {
        let scaled = u32::from(self.0) * SCALE;

        if scaled > u32::from(MAX_CODE) {
            (DacCode(MAX_CODE), Clamp::Maximum)
        } else if scaled < u32::from(MIN_CODE) {
            (DacCode(MIN_CODE), Clamp::Minimum)
        } else {
            (DacCode(scaled as u16), Clamp::None)
        }
    }
}

impl fmt::Display for LoopCurrent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} mA", self.0 / 10, self.0 % 10)
    }
}

/// Error parsing a milliamp value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCurrentError {
    #[error("empty current value")]
    Empty,
    #[error("invalid current value '{0}' (expected mA with at most one decimal, e.g. 15.8)")]
    Invalid(String),
    #[error("current value '{0}' is too large")]
    TooLarge(String),
}

/// Parses milliamps with at most one decimal digit, e.g. `20`, `15.8`, `4.`
impl FromStr for LoopCurrent {
    type Err = ParseCurrentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseCurrentError::Empty);
        }

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || frac.len() > 1 || !all_digits(frac) {
            return Err(ParseCurrentError::Invalid(s.to_string()));
        }

        let whole: u32 = whole
            .parse()
            .map_err(|_| ParseCurrentError::TooLarge(s.to_string()))?;
        let frac: u32 = frac.parse().unwrap_or(0);

        whole
            .checked_mul(10)
            .and_then(|tenths| tenths.checked_add(frac))
            .and_then(|tenths| u16::try_from(tenths).ok())
            .map(Self)
            .ok_or_else(|| ParseCurrentError::TooLarge(s.to_string()))
    }
}

/// Which side of the output window a setpoint was clamped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clamp {
    /// Setpoint was within 4-20 mA
    None,
    /// Setpoint was below 4 mA and was raised
    Minimum,
    /// Setpoint was above 20 mA and was lowered
    Maximum,
}

/// DAC output code, always within `MIN_CODE..=MAX_CODE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DacCode(u16);

impl DacCode {
    pub const fn value(self) -> u16 {
        self.0
    }

    /// The loop current this code produces
    pub fn current(self) -> LoopCurrent {
        LoopCurrent((u32::from(self.0) / SCALE) as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range() {
        assert_eq!(
            LoopCurrent::from_tenths(200).to_dac_code(),
            (DacCode(4000), Clamp::None)
        );
        assert_eq!(
            LoopCurrent::from_tenths(158).to_dac_code(),
            (DacCode(3160), Clamp::None)
        );
        assert_eq!(
            LoopCurrent::from_tenths(40).to_dac_code(),
            (DacCode(800), Clamp::None)
        );
    }

    #[test]
    fn test_clamp_maximum() {
        assert_eq!(
            LoopCurrent::from_tenths(201).to_dac_code(),
            (DacCode(MAX_CODE), Clamp::Maximum)
        );
        // Would wrap if scaled in 16 bits
        assert_eq!(
            LoopCurrent::from_tenths(3300).to_dac_code(),
            (DacCode(MAX_CODE), Clamp::Maximum)
        );
        assert_eq!(
            LoopCurrent::from_tenths(u16::MAX).to_dac_code(),
            (DacCode(MAX_CODE), Clamp::Maximum)
        );
    }

    #[test]
    fn test_clamp_minimum() {
        assert_eq!(
            LoopCurrent::from_tenths(39).to_dac_code(),
            (DacCode(MIN_CODE), Clamp::Minimum)
        );
        assert_eq!(
            LoopCurrent::from_tenths(0).to_dac_code(),
            (DacCode(MIN_CODE), Clamp::Minimum)
        );
    }

    #[test]
    fn test_code_current() {
        assert_eq!(DacCode(MAX_CODE).current().to_string(), "20.0 mA");
        assert_eq!(DacCode(MIN_CODE).current().to_string(), "4.0 mA");
        assert_eq!(DacCode(3160).current().to_string(), "15.8 mA");
    }

    #[test]
    fn test_parse() {
        assert_eq!("20".parse(), Ok(LoopCurrent(200)));
        assert_eq!("15.8".parse(), Ok(LoopCurrent(158)));
        assert_eq!("4.".parse(), Ok(LoopCurrent(40)));
        assert_eq!("0.5".parse(), Ok(LoopCurrent(5)));
        assert_eq!(" 12.0 ".parse(), Ok(LoopCurrent(120)));
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!("".parse::<LoopCurrent>(), Err(ParseCurrentError::Empty));
        assert!(matches!(
            "15.85".parse::<LoopCurrent>(),
            Err(ParseCurrentError::Invalid(_))
        ));
        assert!(matches!(
            ".5".parse::<LoopCurrent>(),
            Err(ParseCurrentError::Invalid(_))
        ));
        assert!(matches!(
            "-4".parse::<LoopCurrent>(),
            Err(ParseCurrentError::Invalid(_))
        ));
        assert!(matches!(
            "abc".parse::<LoopCurrent>(),
            Err(ParseCurrentError::Invalid(_))
        ));
        assert!(matches!(
            "6553.6".parse::<LoopCurrent>(),
            Err(ParseCurrentError::TooLarge(_))
        ));
    }
}
