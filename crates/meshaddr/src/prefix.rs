//! Network prefix of the mesh address space
//!
//! Every derived address starts with the prefix bytes. The bit that follows
//! the prefix (the most significant bit of the run-length byte) is reserved:
//! clear for a node address, set for a routed subnet. Derivation never sets
//! that bit itself; it stays clear only while the run length is below 128.

use crate::error::AddrError;
use crate::{ADDRESS_SIZE, DEFAULT_PREFIX_HEX};
use std::fmt;

/// Longest prefix that still leaves room for the run-length byte
pub const MAX_PREFIX_LEN: usize = ADDRESS_SIZE - 1;

/// Leading byte sequence shared by all addresses derived in a deployment
///
/// Immutable once constructed. The bit length is always a multiple of 8.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkPrefix {
    bytes: [u8; MAX_PREFIX_LEN],
    len: usize,
}

impl NetworkPrefix {
    /// Create a prefix from raw bytes
    ///
    /// # Errors
    ///
    /// Returns [`AddrError::InvalidPrefix`] if `bytes` is empty or longer than
    /// [`MAX_PREFIX_LEN`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddrError> {
        if bytes.is_empty() || bytes.len() > MAX_PREFIX_LEN {
            return Err(AddrError::InvalidPrefix(format!(
                "length must be 1..={MAX_PREFIX_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut buf = [0u8; MAX_PREFIX_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: buf,
            len: bytes.len(),
        })
    }

    /// Parse a prefix from a hex literal
    ///
    /// # Errors
    ///
    /// Returns [`AddrError::InvalidPrefix`] if the literal is not hex or has an
    /// unusable length.
    ///
    /// # Examples
    ///
    /// ```
    /// use meshaddr::NetworkPrefix;
    ///
    /// let prefix = NetworkPrefix::from_hex("fd00").unwrap();
    /// assert_eq!(prefix.as_bytes(), &[0xfd, 0x00]);
    /// assert!(NetworkPrefix::from_hex("fcz").is_err());
    /// ```
    pub fn from_hex(literal: &str) -> Result<Self, AddrError> {
        let bytes = hex::decode(literal)
            .map_err(|e| AddrError::InvalidPrefix(format!("{literal:?}: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Prefix bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Prefix length in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false; a prefix has at least one byte
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Prefix length in bits
    #[must_use]
    pub const fn bit_len(&self) -> usize {
        self.len * 8
    }

    /// Number of remainder bytes an address carries under this prefix
    #[must_use]
    pub const fn remainder_len(&self) -> usize {
        ADDRESS_SIZE - self.len - 1
    }
}

impl Default for NetworkPrefix {
    fn default() -> Self {
        derive_prefix()
    }
}

impl fmt::Debug for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NetworkPrefix({})", hex::encode(self.as_bytes()))
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}

/// Build the mesh network prefix from [`DEFAULT_PREFIX_HEX`]
///
/// # Panics
///
/// Panics if the built-in literal is malformed. The literal is a compile-time
/// constant, so this is a build invariant rather than an input error.
#[must_use]
pub fn derive_prefix() -> NetworkPrefix {
    match NetworkPrefix::from_hex(DEFAULT_PREFIX_HEX) {
        Ok(prefix) => prefix,
        Err(e) => panic!("built-in network prefix is malformed: {e}"),
    }
}
