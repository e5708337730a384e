//! DAC control frame encoding
//!
//! A frame is two bytes, most significant first:
//!
//! ```text
//!   byte 0: 0 0 1 1 d11 d10 d9 d8    command tag 0b11 in bits 5..4
//!   byte 1: d7 d6 d5 d4 d3 d2 d1 d0
//! ```
//!
//! Only the low 12 bits of the code are carried.

use crate::current::DacCode;
use core::fmt::Write;

/// Command tag OR'd into the high byte
pub const COMMAND_TAG: u8 = 0x30;

/// Values printed per line by [`format_hex_rows`]
pub const HEX_VALUES_PER_ROW: usize = 6;

/// Encoded 2-byte control frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; 2]);

impl Frame {
    pub fn encode(code: DacCode) -> Self {
        let value = code.value();
        let high = ((value >> 8) as u8 & 0x0F) | COMMAND_TAG;
        let low = value as u8;
        Self([high, low])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Format bytes as uppercase hex, starting a new line every six values
///
/// Each row is preceded by a newline, so the result is meant to follow a
/// label such as `Sending:` on the same line.
pub fn format_hex_rows(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3 + bytes.len() / HEX_VALUES_PER_ROW + 1);
    for (i, byte) in bytes.iter().enumerate() {
        if i % HEX_VALUES_PER_ROW == 0 {
            out.push('\n');
        } else {
            out.push(' ');
        }
        // Writing to a String cannot fail
        let _ = write!(out, "{:02X}", byte);
    }
    out
}
