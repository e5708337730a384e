//! Error types for loopset-core
//!
//! Every variant's message starts with a fixed context string naming the
//! step that failed, followed by the operating system's description.

use thiserror::Error;

/// Bus configuration and transfer errors
#[derive(Debug, Error)]
pub enum Error {
    /// Driver rejected the requested mode
    #[error("can't set spi mode: {0}")]
    SetMode(#[source] std::io::Error),

    /// Failed to read back the mode
    #[error("can't get spi mode: {0}")]
    GetMode(#[source] std::io::Error),

    /// Driver rejected the requested bits per word
    #[error("can't set bits per word: {0}")]
    SetBitsPerWord(#[source] std::io::Error),

    /// Failed to read back the bits per word
    #[error("can't get bits per word: {0}")]
    GetBitsPerWord(#[source] std::io::Error),

    /// Driver rejected the requested clock speed
    #[error("can't set max speed hz: {0}")]
    SetSpeed(#[source] std::io::Error),

    /// Failed to read back the clock speed
    #[error("can't get max speed hz: {0}")]
    GetSpeed(#[source] std::io::Error),

    /// SPI transfer failed
    #[error("can't send spi message: {0}")]
    Transfer(#[source] std::io::Error),

    /// Driver transferred fewer bytes than requested
    #[error("can't send spi message: sent {sent} of {expected} bytes")]
    ShortTransfer { sent: usize, expected: usize },
}

/// Result type for loopset-core operations
pub type Result<T> = std::result::Result<T, Error>;
