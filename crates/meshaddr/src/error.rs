//! Address derivation error types.

use thiserror::Error;

/// Address derivation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AddrError {
    /// Public key is not valid hexadecimal
    #[error("invalid public key hex: {0}")]
    InvalidKeyHex(#[from] hex::FromHexError),

    /// Public key decoded to the wrong number of bytes
    #[error("invalid public key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Network prefix is malformed or leaves no room for the run-length byte
    #[error("invalid network prefix: {0}")]
    InvalidPrefix(String),

    /// Run of leading ones does not fit the 8-bit run-length field
    #[error("run length {0} overflows the 8-bit run-length field")]
    RunLengthOverflow(u16),

    /// Run length would set the reserved node/subnet bit
    #[error("run length {0} sets the reserved node/subnet bit")]
    ReservedBitSet(u16),
}

impl AddrError {
    /// Whether the error was caused by the supplied key rather than by codec
    /// configuration or policy.
    #[must_use]
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Self::InvalidKeyHex(_) | Self::InvalidKeyLength { .. })
    }
}
