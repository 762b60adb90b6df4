//! # Error Types
//!
//! Errors raised while decoding shared entities.

use thiserror::Error;

/// Errors produced when parsing a [`crate::Buf32`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Buf32ParseError {
    /// Input is not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Input decoded to the wrong number of bytes.
    #[error("expected 32 bytes, got {got}")]
    InvalidLength { got: usize },
}
